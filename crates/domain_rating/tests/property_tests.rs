//! Property-Based Rating Tests
//!
//! Invariants that hold for every valid request, whatever the profile or
//! discount facts.

use chrono::Duration;
use proptest::prelude::*;

use domain_rating::{
    price_quote, CoverageLine, ExternalFacts, RateCalculator, RatingConfig, SnapshotBuilder,
};
use test_utils::{
    assert_ledger_well_formed, assert_quote_consistent, quote_request_strategy, DateFixtures,
};

// ============================================================================
// PIPELINE INVARIANTS
// ============================================================================

mod pipeline_invariants {
    use super::*;

    proptest! {
        #[test]
        fn total_is_rounded_sum_of_lines(
            request in quote_request_strategy(),
            has_other_policies in any::<bool>(),
            is_good_driver in any::<bool>(),
        ) {
            let facts = ExternalFacts::new(has_other_policies, is_good_driver);
            let quote = price_quote(&RatingConfig::default(), &request, facts, DateFixtures::rating_instant())
                .unwrap();

            assert_quote_consistent(&quote);
        }

        #[test]
        fn quotes_are_valid_for_thirty_days(request in quote_request_strategy()) {
            let quote = price_quote(
                &RatingConfig::default(),
                &request,
                ExternalFacts::default(),
                DateFixtures::rating_instant(),
            )
            .unwrap();

            prop_assert_eq!(quote.expires_at() - quote.created_at(), Duration::days(30));
        }

        #[test]
        fn discounts_never_raise_a_line(
            request in quote_request_strategy(),
            has_other_policies in any::<bool>(),
            is_good_driver in any::<bool>(),
        ) {
            let config = RatingConfig::default();
            let now = DateFixtures::rating_instant();
            let undiscounted = price_quote(&config, &request, ExternalFacts::default(), now).unwrap();
            let discounted = price_quote(
                &config,
                &request,
                ExternalFacts::new(has_other_policies, is_good_driver),
                now,
            )
            .unwrap();

            for line in CoverageLine::ALL {
                prop_assert!(discounted.premium(line) <= undiscounted.premium(line));
            }
        }

        #[test]
        fn no_facts_and_no_flags_means_no_discount_keys(request in quote_request_strategy()) {
            let mut request = request;
            request.profile.good_student = None;
            request.profile.completed_defensive_driving = None;
            request.profile.has_anti_theft = None;
            request.profile.has_airbags = None;

            let quote = price_quote(
                &RatingConfig::default(),
                &request,
                ExternalFacts::default(),
                DateFixtures::rating_instant(),
            )
            .unwrap();

            prop_assert!(!quote.coverages().has_discounts());
            prop_assert!(!quote.coverages().contains_key("multiPolicyDiscount"));
        }
    }
}

// ============================================================================
// CALCULATOR
// ============================================================================

mod calculator {
    use super::*;

    proptest! {
        #[test]
        fn base_rates_are_idempotent(request in quote_request_strategy()) {
            let config = RatingConfig::default();
            let as_of = DateFixtures::rating_date();
            let (applicant, vehicle) = SnapshotBuilder::new(&config).build(&request, as_of).unwrap();
            let calculator = RateCalculator::new(&config);

            let first = calculator.calculate_base_rates(&applicant, &vehicle, as_of).unwrap();
            let second = calculator.calculate_base_rates(&applicant, &vehicle, as_of).unwrap();

            assert_ledger_well_formed(&first);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn flat_lines_never_move(request in quote_request_strategy()) {
            let config = RatingConfig::default();
            let as_of = DateFixtures::rating_date();
            let (applicant, vehicle) = SnapshotBuilder::new(&config).build(&request, as_of).unwrap();
            let ledger = RateCalculator::new(&config)
                .calculate_base_rates(&applicant, &vehicle, as_of)
                .unwrap();

            for line in [
                CoverageLine::UninsuredMotorist,
                CoverageLine::MedicalPayments,
                CoverageLine::RentalReimbursement,
                CoverageLine::RoadsideAssistance,
            ] {
                prop_assert_eq!(ledger.premium(line), Some(config.base_rates.rate_for(line)));
            }
        }
    }
}
