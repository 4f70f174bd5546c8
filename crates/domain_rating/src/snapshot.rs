//! Applicant and vehicle snapshots
//!
//! A snapshot is the canonical, validated view of a quote request that the
//! rest of the pipeline rates against. Snapshots are built per request and
//! never persisted.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, VehicleId};

use crate::config::RatingConfig;
use crate::error::RatingError;
use crate::request::QuoteRequest;

pub const MIN_APPLICANT_AGE: i32 = 16;
pub const MAX_APPLICANT_AGE: i32 = 100;
pub const EARLIEST_MODEL_YEAR: i32 = 1900;
pub const MIN_CREDIT_SCORE: u32 = 300;
pub const MAX_CREDIT_SCORE: u32 = 850;

/// The applicant as the rating engine sees them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantSnapshot {
    pub customer_id: Option<CustomerId>,
    pub first_name: String,
    pub last_name: String,
    /// Back-computed from the stated age; month and day are not known
    pub date_of_birth: NaiveDate,
    pub years_licensed: u32,
    pub credit_score: u32,
    pub good_student: bool,
    pub completed_defensive_driving: bool,
}

impl ApplicantSnapshot {
    /// Age in completed years on the given date
    pub fn age_on(&self, date: NaiveDate) -> u32 {
        let dob = self.date_of_birth;
        let mut age = date.year() - dob.year();
        if (date.month(), date.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        age.max(0) as u32
    }
}

/// The vehicle as the rating engine sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub vehicle_id: Option<VehicleId>,
    pub model_year: i32,
    pub make: String,
    pub high_performance: bool,
    pub luxury: bool,
    pub convertible: bool,
    pub has_anti_theft: bool,
    pub has_airbags: bool,
    pub has_anti_lock_brakes: bool,
    pub purchase_price: Decimal,
}

impl VehicleSnapshot {
    /// Age in model years on the given date; next year's model is -1
    pub fn age_on(&self, date: NaiveDate) -> i32 {
        date.year() - self.model_year
    }

    /// Both airbags and anti-lock brakes are fitted
    pub fn has_safety_features(&self) -> bool {
        self.has_airbags && self.has_anti_lock_brakes
    }
}

/// Normalizes quote requests into snapshots
pub struct SnapshotBuilder<'a> {
    config: &'a RatingConfig,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(config: &'a RatingConfig) -> Self {
        Self { config }
    }

    /// Validates a request and derives its snapshots as of `as_of`
    ///
    /// # Errors
    ///
    /// `Validation` when the age is outside 16-100, the model year is outside
    /// 1900 to next year, the make is blank, or a supplied profile value is
    /// out of range.
    pub fn build(
        &self,
        request: &QuoteRequest,
        as_of: NaiveDate,
    ) -> Result<(ApplicantSnapshot, VehicleSnapshot), RatingError> {
        self.validate(request, as_of)?;

        Ok((
            self.build_applicant(request, as_of)?,
            self.build_vehicle(request),
        ))
    }

    fn validate(&self, request: &QuoteRequest, as_of: NaiveDate) -> Result<(), RatingError> {
        let age = request.customer_age;
        if age < MIN_APPLICANT_AGE {
            return Err(RatingError::validation(format!(
                "Customer must be at least {} years old",
                MIN_APPLICANT_AGE
            )));
        }
        if age > MAX_APPLICANT_AGE {
            return Err(RatingError::validation(format!(
                "Customer age {} is not valid",
                age
            )));
        }

        let latest_model_year = as_of.year() + 1;
        if request.vehicle_year < EARLIEST_MODEL_YEAR || request.vehicle_year > latest_model_year {
            return Err(RatingError::validation(format!(
                "Vehicle year must be between {} and {}",
                EARLIEST_MODEL_YEAR, latest_model_year
            )));
        }

        if request.vehicle_make.trim().is_empty() {
            return Err(RatingError::validation("Vehicle make is required"));
        }

        let profile = &request.profile;
        if let Some(score) = profile.credit_score {
            if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&score) {
                return Err(RatingError::validation(format!(
                    "Credit score must be between {} and {}",
                    MIN_CREDIT_SCORE, MAX_CREDIT_SCORE
                )));
            }
        }
        if let Some(years) = profile.years_licensed {
            if years > age as u32 {
                return Err(RatingError::validation(
                    "Years licensed cannot exceed the customer's age",
                ));
            }
        }
        if let Some(price) = profile.purchase_price {
            if price.is_sign_negative() && !price.is_zero() {
                return Err(RatingError::validation("Purchase price cannot be negative"));
            }
        }

        Ok(())
    }

    fn build_applicant(
        &self,
        request: &QuoteRequest,
        as_of: NaiveDate,
    ) -> Result<ApplicantSnapshot, RatingError> {
        let (first_name, last_name) = split_name(&request.customer_name);
        let date_of_birth = as_of
            .checked_sub_months(Months::new(request.customer_age as u32 * 12))
            .ok_or_else(|| {
                RatingError::inconsistency(format!(
                    "cannot derive a birth date {} years before {}",
                    request.customer_age, as_of
                ))
            })?;

        let defaults = &self.config.applicant_defaults;
        let profile = &request.profile;

        Ok(ApplicantSnapshot {
            customer_id: request.customer_id,
            first_name,
            last_name,
            date_of_birth,
            years_licensed: profile.years_licensed.unwrap_or(defaults.years_licensed),
            credit_score: profile.credit_score.unwrap_or(defaults.credit_score),
            good_student: profile.good_student.unwrap_or(false),
            completed_defensive_driving: profile.completed_defensive_driving.unwrap_or(false),
        })
    }

    fn build_vehicle(&self, request: &QuoteRequest) -> VehicleSnapshot {
        let make = request.vehicle_make.trim().to_string();
        let profile = &request.profile;

        VehicleSnapshot {
            vehicle_id: request.vehicle_id,
            model_year: request.vehicle_year,
            high_performance: self.config.is_high_performance_make(&make),
            luxury: self.config.is_luxury_make(&make),
            make,
            convertible: profile.convertible.unwrap_or(false),
            has_anti_theft: profile.has_anti_theft.unwrap_or(false),
            // undeclared equipment earns no safety discount
            has_airbags: profile.has_airbags.unwrap_or(false),
            has_anti_lock_brakes: profile.has_anti_lock_brakes.unwrap_or(false),
            purchase_price: profile
                .purchase_price
                .unwrap_or(self.config.applicant_defaults.purchase_price),
        }
    }
}

/// First whitespace-separated token is the first name, the rest the last name
fn split_name(full_name: &str) -> (String, String) {
    let trimmed = full_name.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (trimmed.to_string(), String::new()),
    }
}
