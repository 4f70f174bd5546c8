//! Quote request
//!
//! The raw input to the rating pipeline. Only name, age, vehicle year and
//! make are required; the profile fields refine the engine's default
//! assumptions when the caller knows better.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, VehicleId};

/// Applicant and vehicle attributes submitted for a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Durable id of an existing customer, enables history-based discounts
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    /// Full name, first token is the first name
    pub customer_name: String,
    /// Age in whole years
    pub customer_age: i32,
    #[serde(default)]
    pub vehicle_id: Option<VehicleId>,
    /// Model year
    pub vehicle_year: i32,
    pub vehicle_make: String,
    #[serde(default)]
    pub profile: ApplicantProfile,
}

/// Optional richer profile; every `None` falls back to a rating default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicantProfile {
    pub years_licensed: Option<u32>,
    pub credit_score: Option<u32>,
    pub good_student: Option<bool>,
    pub completed_defensive_driving: Option<bool>,
    pub purchase_price: Option<Decimal>,
    pub convertible: Option<bool>,
    pub has_anti_theft: Option<bool>,
    pub has_airbags: Option<bool>,
    pub has_anti_lock_brakes: Option<bool>,
}

impl QuoteRequest {
    /// Creates an anonymous request with no profile
    pub fn new(
        customer_name: impl Into<String>,
        customer_age: i32,
        vehicle_year: i32,
        vehicle_make: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: None,
            customer_name: customer_name.into(),
            customer_age,
            vehicle_id: None,
            vehicle_year,
            vehicle_make: vehicle_make.into(),
            profile: ApplicantProfile::default(),
        }
    }

    /// Attaches an existing customer
    pub fn for_customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Replaces the applicant profile
    pub fn with_profile(mut self, profile: ApplicantProfile) -> Self {
        self.profile = profile;
        self
    }
}
