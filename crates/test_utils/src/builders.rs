//! Test Data Builders
//!
//! Builds quote requests with sensible defaults so a test only spells out
//! the fields it cares about. Names are random; nothing in rating depends
//! on them.

use core_kernel::{CustomerId, VehicleId};
use domain_rating::{ApplicantProfile, QuoteRequest};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rust_decimal::Decimal;

/// Builder for constructing quote requests
#[derive(Debug, Clone)]
pub struct QuoteRequestBuilder {
    customer_id: Option<CustomerId>,
    customer_name: String,
    customer_age: i32,
    vehicle_id: Option<VehicleId>,
    vehicle_year: i32,
    vehicle_make: String,
    profile: ApplicantProfile,
}

impl Default for QuoteRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteRequestBuilder {
    /// Standard-risk 30-year-old in a 2022 Toyota, random name
    pub fn new() -> Self {
        let first: String = FirstName().fake();
        let last: String = LastName().fake();

        Self {
            customer_id: None,
            customer_name: format!("{} {}", first, last),
            customer_age: 30,
            vehicle_id: None,
            vehicle_year: 2022,
            vehicle_make: "Toyota".to_string(),
            profile: ApplicantProfile::default(),
        }
    }

    /// Sets the existing customer
    pub fn with_customer(mut self, id: CustomerId) -> Self {
        self.customer_id = Some(id);
        self
    }

    /// Sets the full name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = name.into();
        self
    }

    /// Sets the age
    pub fn with_age(mut self, age: i32) -> Self {
        self.customer_age = age;
        self
    }

    /// Sets the vehicle id
    pub fn with_vehicle_id(mut self, id: VehicleId) -> Self {
        self.vehicle_id = Some(id);
        self
    }

    /// Sets the model year and make
    pub fn with_vehicle(mut self, year: i32, make: impl Into<String>) -> Self {
        self.vehicle_year = year;
        self.vehicle_make = make.into();
        self
    }

    pub fn with_years_licensed(mut self, years: u32) -> Self {
        self.profile.years_licensed = Some(years);
        self
    }

    pub fn with_credit_score(mut self, score: u32) -> Self {
        self.profile.credit_score = Some(score);
        self
    }

    pub fn with_purchase_price(mut self, price: Decimal) -> Self {
        self.profile.purchase_price = Some(price);
        self
    }

    pub fn convertible(mut self) -> Self {
        self.profile.convertible = Some(true);
        self
    }

    pub fn good_student(mut self) -> Self {
        self.profile.good_student = Some(true);
        self
    }

    pub fn defensive_driving(mut self) -> Self {
        self.profile.completed_defensive_driving = Some(true);
        self
    }

    pub fn with_anti_theft(mut self) -> Self {
        self.profile.has_anti_theft = Some(true);
        self
    }

    /// Declares both airbags and anti-lock brakes
    pub fn with_safety_features(mut self) -> Self {
        self.profile.has_airbags = Some(true);
        self.profile.has_anti_lock_brakes = Some(true);
        self
    }

    /// Builds the request
    pub fn build(self) -> QuoteRequest {
        QuoteRequest {
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            customer_age: self.customer_age,
            vehicle_id: self.vehicle_id,
            vehicle_year: self.vehicle_year,
            vehicle_make: self.vehicle_make,
            profile: self.profile,
        }
    }
}
