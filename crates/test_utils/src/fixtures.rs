//! Pre-built Test Fixtures
//!
//! Fixed dates, requests and customer histories with known prices. The
//! rating date sits in 2022 so the reference Toyota is a current-year model.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::CustomerId;
use domain_rating::{
    CustomerProfile, DrivingRecord, FailingCustomerHistory, InMemoryCustomerHistory, QuoteRequest,
    QuoteService, RatingConfig,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

/// Fixture for rating dates
pub struct DateFixtures;

impl DateFixtures {
    /// The instant reference quotes are generated at
    pub fn rating_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 9, 1, 10, 0, 0).unwrap()
    }

    /// Calendar date of [`DateFixtures::rating_instant`]
    pub fn rating_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 9, 1).unwrap()
    }
}

/// Fixture for quote requests with known prices
pub struct RequestFixtures;

impl RequestFixtures {
    /// Standard-risk applicant in a new Toyota; prices at 1430.00
    pub fn standard_toyota() -> QuoteRequest {
        QuoteRequest::new("Ada Lovelace", 30, 2022, "Toyota")
    }

    /// Total of [`RequestFixtures::standard_toyota`] with no discounts
    pub fn standard_toyota_total() -> Decimal {
        dec!(1430.00)
    }

    /// 24-year-old, otherwise identical to the standard Toyota
    pub fn young_driver_toyota() -> QuoteRequest {
        QuoteRequest::new("Ada Lovelace", 24, 2022, "Toyota")
    }

    /// New luxury, high-performance vehicle
    pub fn new_porsche() -> QuoteRequest {
        QuoteRequest::new("Ada Lovelace", 40, 2022, "Porsche")
    }
}

/// Fixture for customer histories
pub struct CustomerFixtures;

impl CustomerFixtures {
    /// Holds another policy and has a clean record
    pub fn loyal_good_driver() -> CustomerProfile {
        CustomerProfile::new(CustomerId::new(), DrivingRecord::default(), 2)
    }

    /// First policy, one violation: still a good driver
    pub fn new_customer_one_violation() -> CustomerProfile {
        CustomerProfile::new(
            CustomerId::new(),
            DrivingRecord {
                violation_count: 1,
                ..Default::default()
            },
            0,
        )
    }

    /// Holds another policy but has a DUI
    pub fn loyal_with_dui() -> CustomerProfile {
        CustomerProfile::new(
            CustomerId::new(),
            DrivingRecord {
                has_dui: true,
                ..Default::default()
            },
            1,
        )
    }
}

/// Fixture for fully wired quote services
pub struct ServiceFixtures;

impl ServiceFixtures {
    /// Default rate table with no known customers
    pub fn standard() -> QuoteService {
        Self::with_customers(Vec::<CustomerProfile>::new())
    }

    /// Default rate table over an in-memory history holding `profiles`
    pub fn with_customers(profiles: impl IntoIterator<Item = CustomerProfile>) -> QuoteService {
        let history = InMemoryCustomerHistory::from_profiles(profiles);
        QuoteService::new(RatingConfig::default(), Arc::new(history))
            .expect("default rate table is valid")
    }

    /// Default rate table over a history source that is always down
    pub fn with_history_outage() -> (QuoteService, Arc<FailingCustomerHistory>) {
        let history = Arc::new(FailingCustomerHistory::new());
        let service = QuoteService::new(RatingConfig::default(), history.clone())
            .expect("default rate table is valid");
        (service, history)
    }
}
