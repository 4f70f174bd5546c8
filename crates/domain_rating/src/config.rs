//! Rating configuration
//!
//! Every number the engine prices with lives here: base rates, surcharge
//! and discount factors, the thresholds that trigger them, the applicant
//! defaults, the premium-make reference sets and the ordered discount list.
//! [`RatingConfig::default`] is the standard rate table; alternative tables
//! can be loaded from JSON, where any section left out keeps its default.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::coverage::CoverageLine;
use crate::error::RatingError;

/// Version stamped on quotes rated with the default table
pub const DEFAULT_RATING_VERSION: &str = "auto-standard-1";

/// Longest validity window a rate table may configure
pub const MAX_QUOTE_VALIDITY_DAYS: u32 = 3650;

/// Complete, versioned rate table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Identifies the rate table a quote was priced with
    pub version: String,
    pub base_rates: BaseRates,
    pub liability: LiabilityFactors,
    pub collision: CollisionFactors,
    pub comprehensive: ComprehensiveFactors,
    /// Discounts in application order
    pub discounts: Vec<DiscountRule>,
    pub applicant_defaults: ApplicantDefaults,
    /// Makes rated as high-performance (compared case-insensitively)
    pub high_performance_makes: Vec<String>,
    /// Makes rated as luxury (compared case-insensitively)
    pub luxury_makes: Vec<String>,
    /// Calendar days a quote stays valid
    pub quote_validity_days: u32,
}

/// Starting premium per coverage line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseRates {
    pub liability: Decimal,
    pub collision: Decimal,
    pub comprehensive: Decimal,
    pub uninsured_motorist: Decimal,
    pub medical_payments: Decimal,
    pub rental_reimbursement: Decimal,
    pub roadside_assistance: Decimal,
}

impl BaseRates {
    /// Returns the base rate of a line
    pub fn rate_for(&self, line: CoverageLine) -> Decimal {
        match line {
            CoverageLine::Liability => self.liability,
            CoverageLine::Collision => self.collision,
            CoverageLine::Comprehensive => self.comprehensive,
            CoverageLine::UninsuredMotorist => self.uninsured_motorist,
            CoverageLine::MedicalPayments => self.medical_payments,
            CoverageLine::RentalReimbursement => self.rental_reimbursement,
            CoverageLine::RoadsideAssistance => self.roadside_assistance,
        }
    }
}

impl Default for BaseRates {
    fn default() -> Self {
        Self {
            liability: dec!(500.00),
            collision: dec!(300.00),
            comprehensive: dec!(200.00),
            uninsured_motorist: dec!(150.00),
            medical_payments: dec!(100.00),
            rental_reimbursement: dec!(50.00),
            roadside_assistance: dec!(40.00),
        }
    }
}

/// Driver-based factors on the liability line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiabilityFactors {
    /// Drivers younger than this are surcharged
    pub young_driver_age: u32,
    pub young_driver_surcharge: Decimal,
    /// Drivers older than this are surcharged
    pub senior_driver_age: u32,
    pub senior_driver_surcharge: Decimal,
    /// Fewer years licensed than this is surcharged
    pub new_driver_years: u32,
    pub new_driver_surcharge: Decimal,
    /// Credit scores below this are surcharged
    pub poor_credit_below: u32,
    pub poor_credit_surcharge: Decimal,
    /// Credit scores above this are discounted
    pub excellent_credit_above: u32,
    pub excellent_credit_discount: Decimal,
}

impl Default for LiabilityFactors {
    fn default() -> Self {
        Self {
            young_driver_age: 25,
            young_driver_surcharge: dec!(1.5),
            senior_driver_age: 70,
            senior_driver_surcharge: dec!(1.2),
            new_driver_years: 3,
            new_driver_surcharge: dec!(1.3),
            poor_credit_below: 600,
            poor_credit_surcharge: dec!(1.25),
            excellent_credit_above: 750,
            excellent_credit_discount: dec!(0.9),
        }
    }
}

/// Vehicle-based factors on the collision line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionFactors {
    /// Vehicles younger than this many years are surcharged
    pub new_vehicle_age: i32,
    pub new_vehicle_surcharge: Decimal,
    /// Vehicles older than this many years are discounted
    pub old_vehicle_age: i32,
    pub old_vehicle_discount: Decimal,
    pub high_performance_surcharge: Decimal,
    pub luxury_surcharge: Decimal,
}

impl Default for CollisionFactors {
    fn default() -> Self {
        Self {
            new_vehicle_age: 3,
            new_vehicle_surcharge: dec!(1.3),
            old_vehicle_age: 10,
            old_vehicle_discount: dec!(0.8),
            high_performance_surcharge: dec!(1.4),
            luxury_surcharge: dec!(1.5),
        }
    }
}

/// Value-based factors on the comprehensive line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComprehensiveFactors {
    /// Purchase prices above this take the high-value surcharge
    pub high_value_above: Decimal,
    pub high_value_surcharge: Decimal,
    /// Purchase prices above this (but not high-value) take the mid-value surcharge
    pub mid_value_above: Decimal,
    pub mid_value_surcharge: Decimal,
    pub convertible_surcharge: Decimal,
}

impl Default for ComprehensiveFactors {
    fn default() -> Self {
        Self {
            high_value_above: dec!(50000),
            high_value_surcharge: dec!(1.5),
            mid_value_above: dec!(30000),
            mid_value_surcharge: dec!(1.2),
            convertible_surcharge: dec!(1.3),
        }
    }
}

/// Assumptions used when a request carries no richer profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicantDefaults {
    pub years_licensed: u32,
    pub credit_score: u32,
    pub purchase_price: Decimal,
}

impl Default for ApplicantDefaults {
    fn default() -> Self {
        Self {
            years_licensed: 5,
            credit_score: 700,
            purchase_price: dec!(25000.00),
        }
    }
}

/// Kinds of discount the engine knows how to check for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Customer already holds another policy
    MultiPolicy,
    /// No DUI, no at-fault accidents, at most one violation
    GoodDriver,
    GoodStudent,
    AntiTheft,
    /// Airbags and anti-lock brakes
    SafetyFeatures,
    DefensiveDriving,
}

impl DiscountKind {
    /// Name used in logs and the adjustment trail
    pub fn name(&self) -> &'static str {
        match self {
            DiscountKind::MultiPolicy => "multiPolicyDiscount",
            DiscountKind::GoodDriver => "goodDriverDiscount",
            DiscountKind::GoodStudent => "goodStudentDiscount",
            DiscountKind::AntiTheft => "antiTheftDiscount",
            DiscountKind::SafetyFeatures => "safetyFeaturesDiscount",
            DiscountKind::DefensiveDriving => "defensiveDrivingDiscount",
        }
    }
}

/// One step of the discount stack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountRule {
    pub kind: DiscountKind,
    /// Multiplier applied to every coverage line, in (0, 1]
    pub factor: Decimal,
}

impl DiscountRule {
    pub fn new(kind: DiscountKind, factor: Decimal) -> Self {
        Self { kind, factor }
    }
}

fn standard_discounts() -> Vec<DiscountRule> {
    vec![
        DiscountRule::new(DiscountKind::MultiPolicy, dec!(0.9)),
        DiscountRule::new(DiscountKind::GoodDriver, dec!(0.85)),
        DiscountRule::new(DiscountKind::GoodStudent, dec!(0.9)),
        DiscountRule::new(DiscountKind::AntiTheft, dec!(0.9)),
        DiscountRule::new(DiscountKind::SafetyFeatures, dec!(0.95)),
        DiscountRule::new(DiscountKind::DefensiveDriving, dec!(0.9)),
    ]
}

fn premium_makes() -> Vec<String> {
    ["BMW", "MERCEDES", "AUDI", "PORSCHE", "FERRARI", "LAMBORGHINI"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_RATING_VERSION.to_string(),
            base_rates: BaseRates::default(),
            liability: LiabilityFactors::default(),
            collision: CollisionFactors::default(),
            comprehensive: ComprehensiveFactors::default(),
            discounts: standard_discounts(),
            applicant_defaults: ApplicantDefaults::default(),
            high_performance_makes: premium_makes(),
            luxury_makes: premium_makes(),
            quote_validity_days: 30,
        }
    }
}

impl RatingConfig {
    /// Parses and validates a rate table from JSON
    pub fn from_json(json: &str) -> Result<Self, RatingError> {
        let config: RatingConfig = serde_json::from_str(json)
            .map_err(|e| RatingError::invalid_config(format!("malformed rate table: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a rate table from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RatingError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            RatingError::invalid_config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Returns true if the make is in the high-performance set
    pub fn is_high_performance_make(&self, make: &str) -> bool {
        contains_make(&self.high_performance_makes, make)
    }

    /// Returns true if the make is in the luxury set
    pub fn is_luxury_make(&self, make: &str) -> bool {
        contains_make(&self.luxury_makes, make)
    }

    /// Returns the factor of a discount, if it is part of the stack
    pub fn discount_factor(&self, kind: DiscountKind) -> Option<Decimal> {
        self.discounts.iter().find(|rule| rule.kind == kind).map(|rule| rule.factor)
    }

    /// Checks that the table can price a quote without breaking ledger invariants
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` when a base rate is negative, a surcharge or
    /// rating factor is not positive, a discount factor is outside (0, 1],
    /// a discount appears twice, or the validity window is empty or longer
    /// than [`MAX_QUOTE_VALIDITY_DAYS`].
    pub fn validate(&self) -> Result<(), RatingError> {
        if self.version.trim().is_empty() {
            return Err(RatingError::invalid_config("version must not be blank"));
        }

        for line in CoverageLine::ALL {
            if self.base_rates.rate_for(line).is_sign_negative() {
                return Err(RatingError::invalid_config(format!(
                    "base rate for {} is negative",
                    line
                )));
            }
        }

        let factors = [
            ("liability.young_driver_surcharge", self.liability.young_driver_surcharge),
            ("liability.senior_driver_surcharge", self.liability.senior_driver_surcharge),
            ("liability.new_driver_surcharge", self.liability.new_driver_surcharge),
            ("liability.poor_credit_surcharge", self.liability.poor_credit_surcharge),
            ("liability.excellent_credit_discount", self.liability.excellent_credit_discount),
            ("collision.new_vehicle_surcharge", self.collision.new_vehicle_surcharge),
            ("collision.old_vehicle_discount", self.collision.old_vehicle_discount),
            ("collision.high_performance_surcharge", self.collision.high_performance_surcharge),
            ("collision.luxury_surcharge", self.collision.luxury_surcharge),
            ("comprehensive.high_value_surcharge", self.comprehensive.high_value_surcharge),
            ("comprehensive.mid_value_surcharge", self.comprehensive.mid_value_surcharge),
            ("comprehensive.convertible_surcharge", self.comprehensive.convertible_surcharge),
        ];
        for (name, factor) in factors {
            if factor <= Decimal::ZERO {
                return Err(RatingError::invalid_config(format!("{} must be positive", name)));
            }
        }

        let mut seen = HashSet::new();
        for rule in &self.discounts {
            if rule.factor <= Decimal::ZERO || rule.factor > Decimal::ONE {
                return Err(RatingError::invalid_config(format!(
                    "{} factor {} is outside (0, 1]",
                    rule.kind.name(),
                    rule.factor
                )));
            }
            if !seen.insert(rule.kind) {
                return Err(RatingError::invalid_config(format!(
                    "{} is listed more than once",
                    rule.kind.name()
                )));
            }
        }

        if self.applicant_defaults.purchase_price.is_sign_negative() {
            return Err(RatingError::invalid_config("default purchase price is negative"));
        }

        if self.quote_validity_days == 0 || self.quote_validity_days > MAX_QUOTE_VALIDITY_DAYS {
            return Err(RatingError::invalid_config(format!(
                "quote_validity_days must be between 1 and {}",
                MAX_QUOTE_VALIDITY_DAYS
            )));
        }

        Ok(())
    }
}

fn contains_make(makes: &[String], make: &str) -> bool {
    let make = make.trim();
    makes.iter().any(|m| m.eq_ignore_ascii_case(make))
}
