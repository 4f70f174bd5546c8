//! Property-Based Test Generators
//!
//! Provides proptest strategies for quote requests that always pass
//! validation when rated on [`DateFixtures::rating_date`].
//!
//! [`DateFixtures::rating_date`]: crate::fixtures::DateFixtures::rating_date

use domain_rating::{ApplicantProfile, DrivingRecord, QuoteRequest};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Latest model year accepted on the fixture rating date
pub const LATEST_MODEL_YEAR: i32 = 2023;

/// Strategy for valid applicant ages
pub fn applicant_age_strategy() -> impl Strategy<Value = i32> {
    16i32..=100i32
}

/// Strategy for valid model years, weighted towards recent vehicles
pub fn model_year_strategy() -> impl Strategy<Value = i32> {
    prop_oneof![
        3 => 2000i32..=LATEST_MODEL_YEAR,
        1 => 1900i32..2000i32,
    ]
}

/// Strategy for makes, mixing premium and ordinary makes and odd casing
pub fn make_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Toyota".to_string()),
        Just("Honda".to_string()),
        Just("Ford".to_string()),
        Just("BMW".to_string()),
        Just("porsche".to_string()),
        Just(" Ferrari ".to_string()),
        Just("Lamborghini".to_string()),
        "[A-Z][a-z]{2,10}",
    ]
}

/// Strategy for valid credit scores
pub fn credit_score_strategy() -> impl Strategy<Value = u32> {
    300u32..=850u32
}

/// Strategy for purchase prices up to 250,000.00
pub fn purchase_price_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..25_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for driving records
pub fn driving_record_strategy() -> impl Strategy<Value = DrivingRecord> {
    (any::<bool>(), 0u32..4, 0u32..4).prop_map(|(has_dui, accident_count, violation_count)| {
        DrivingRecord {
            has_dui,
            accident_count,
            violation_count,
        }
    })
}

/// Strategy for applicant profiles consistent with the given age
pub fn profile_strategy(age: i32) -> impl Strategy<Value = ApplicantProfile> {
    let max_years = age.max(0) as u32;
    (
        proptest::option::of(0u32..=max_years),
        proptest::option::of(credit_score_strategy()),
        proptest::option::of(purchase_price_strategy()),
        proptest::collection::vec(proptest::option::of(any::<bool>()), 6),
    )
        .prop_map(|(years_licensed, credit_score, purchase_price, flags)| ApplicantProfile {
            years_licensed,
            credit_score,
            purchase_price,
            good_student: flags[0],
            completed_defensive_driving: flags[1],
            convertible: flags[2],
            has_anti_theft: flags[3],
            has_airbags: flags[4],
            has_anti_lock_brakes: flags[5],
        })
}

/// Strategy for anonymous quote requests that pass validation
pub fn quote_request_strategy() -> impl Strategy<Value = QuoteRequest> {
    (applicant_age_strategy(), model_year_strategy(), make_strategy())
        .prop_flat_map(|(age, year, make)| {
            profile_strategy(age).prop_map(move |profile| {
                QuoteRequest::new("Prop Test", age, year, make.clone()).with_profile(profile)
            })
        })
}
