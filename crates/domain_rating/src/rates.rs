//! Coverage rate calculator
//!
//! Produces the pre-discount premium for every coverage line. Each line
//! starts from its base rate and picks up the line's own factors in a fixed
//! order; paired thresholds on the same attribute (young/senior,
//! poor/excellent credit, new/old vehicle, high/mid value) are exclusive
//! bands, so at most one of each pair applies.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::RatingConfig;
use crate::coverage::CoverageLine;
use crate::error::RatingError;
use crate::ledger::CoverageLedger;
use crate::snapshot::{ApplicantSnapshot, VehicleSnapshot};

/// Rates coverage lines against a rate table
pub struct RateCalculator<'a> {
    config: &'a RatingConfig,
}

impl<'a> RateCalculator<'a> {
    pub fn new(config: &'a RatingConfig) -> Self {
        Self { config }
    }

    /// Computes the base ledger for an applicant and vehicle
    ///
    /// Pure: the same snapshots and date always yield the same ledger.
    ///
    /// # Errors
    ///
    /// `InternalInconsistency` if a premium leaves the decimal range.
    pub fn calculate_base_rates(
        &self,
        applicant: &ApplicantSnapshot,
        vehicle: &VehicleSnapshot,
        as_of: NaiveDate,
    ) -> Result<CoverageLedger, RatingError> {
        let mut ledger = CoverageLedger::new();

        for line in CoverageLine::ALL {
            let premium = match line {
                CoverageLine::Liability => self.liability(applicant, as_of)?,
                CoverageLine::Collision => self.collision(vehicle, as_of)?,
                CoverageLine::Comprehensive => self.comprehensive(vehicle)?,
                flat => self.config.base_rates.rate_for(flat),
            };
            ledger.set_premium(line, premium)?;
        }

        Ok(ledger)
    }

    /// Liability premium before discounts
    pub fn liability(
        &self,
        applicant: &ApplicantSnapshot,
        as_of: NaiveDate,
    ) -> Result<Decimal, RatingError> {
        let factors = &self.config.liability;
        let mut rate = self.config.base_rates.liability;

        let age = applicant.age_on(as_of);
        if age < factors.young_driver_age {
            rate = apply_factor(CoverageLine::Liability, rate, factors.young_driver_surcharge)?;
        } else if age > factors.senior_driver_age {
            rate = apply_factor(CoverageLine::Liability, rate, factors.senior_driver_surcharge)?;
        }

        if applicant.years_licensed < factors.new_driver_years {
            rate = apply_factor(CoverageLine::Liability, rate, factors.new_driver_surcharge)?;
        }

        if applicant.credit_score < factors.poor_credit_below {
            rate = apply_factor(CoverageLine::Liability, rate, factors.poor_credit_surcharge)?;
        } else if applicant.credit_score > factors.excellent_credit_above {
            rate = apply_factor(CoverageLine::Liability, rate, factors.excellent_credit_discount)?;
        }

        Ok(rate)
    }

    /// Collision premium before discounts
    pub fn collision(
        &self,
        vehicle: &VehicleSnapshot,
        as_of: NaiveDate,
    ) -> Result<Decimal, RatingError> {
        let factors = &self.config.collision;
        let mut rate = self.config.base_rates.collision;

        let vehicle_age = vehicle.age_on(as_of);
        if vehicle_age < factors.new_vehicle_age {
            rate = apply_factor(CoverageLine::Collision, rate, factors.new_vehicle_surcharge)?;
        } else if vehicle_age > factors.old_vehicle_age {
            rate = apply_factor(CoverageLine::Collision, rate, factors.old_vehicle_discount)?;
        }

        if vehicle.high_performance {
            rate = apply_factor(CoverageLine::Collision, rate, factors.high_performance_surcharge)?;
        }
        if vehicle.luxury {
            rate = apply_factor(CoverageLine::Collision, rate, factors.luxury_surcharge)?;
        }

        Ok(rate)
    }

    /// Comprehensive premium before discounts
    pub fn comprehensive(&self, vehicle: &VehicleSnapshot) -> Result<Decimal, RatingError> {
        let factors = &self.config.comprehensive;
        let mut rate = self.config.base_rates.comprehensive;

        if vehicle.purchase_price > factors.high_value_above {
            rate = apply_factor(CoverageLine::Comprehensive, rate, factors.high_value_surcharge)?;
        } else if vehicle.purchase_price > factors.mid_value_above {
            rate = apply_factor(CoverageLine::Comprehensive, rate, factors.mid_value_surcharge)?;
        }

        if vehicle.convertible {
            rate = apply_factor(CoverageLine::Comprehensive, rate, factors.convertible_surcharge)?;
        }

        Ok(rate)
    }
}

fn apply_factor(line: CoverageLine, rate: Decimal, factor: Decimal) -> Result<Decimal, RatingError> {
    rate.checked_mul(factor).ok_or_else(|| {
        RatingError::inconsistency(format!("{} premium {} x {} overflows", line, rate, factor))
    })
}
