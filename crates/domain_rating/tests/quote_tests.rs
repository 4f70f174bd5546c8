//! Quote Generation Tests
//!
//! End-to-end tests through `QuoteService`, from request to priced quote.
//!
//! # Test Organization
//!
//! - `reference_scenarios` - Fixed requests with known prices
//! - `liability_bands` - Driver-age and credit thresholds
//! - `history_discounts` - Discounts driven by the customer history port
//! - `fail_open` - Lookup failures never fail a quote
//! - `quote_lifecycle` - Identifiers, expiry and rating version
//! - `validation` - Rejected requests
//! - `rate_table_limits` - Tables that cannot price safely

use chrono::Duration;
use rust_decimal_macros::dec;

use core_kernel::CustomerId;
use domain_rating::{CoverageLine, DiscountKind, RatingError};
use test_utils::{
    assert_ledger_total_matches, assert_no_discount_keys, assert_premium, assert_quote_consistent,
    assert_valid_for_days, CustomerFixtures, DateFixtures, QuoteRequestBuilder, RequestFixtures,
    ServiceFixtures,
};

// ============================================================================
// REFERENCE SCENARIOS
// ============================================================================

mod reference_scenarios {
    use super::*;

    #[tokio::test]
    async fn test_standard_toyota_prices_at_1430() {
        let service = ServiceFixtures::standard();
        let quote = service
            .generate_quote_at(&RequestFixtures::standard_toyota(), DateFixtures::rating_instant())
            .await
            .unwrap();

        let ledger = quote.coverages();
        assert_premium(ledger, CoverageLine::Liability, dec!(500.00));
        assert_premium(ledger, CoverageLine::Collision, dec!(390.00));
        assert_premium(ledger, CoverageLine::Comprehensive, dec!(200.00));
        assert_premium(ledger, CoverageLine::UninsuredMotorist, dec!(150.00));
        assert_premium(ledger, CoverageLine::MedicalPayments, dec!(100.00));
        assert_premium(ledger, CoverageLine::RentalReimbursement, dec!(50.00));
        assert_premium(ledger, CoverageLine::RoadsideAssistance, dec!(40.00));
        assert_eq!(ledger.get("totalPremium"), Some(RequestFixtures::standard_toyota_total()));
        assert_no_discount_keys(ledger);
        assert!(!ledger.contains_key("multiPolicyDiscount"));
        assert_quote_consistent(&quote);
    }

    #[tokio::test]
    async fn test_new_porsche_collision() {
        let service = ServiceFixtures::standard();
        let quote = service
            .generate_quote_at(&RequestFixtures::new_porsche(), DateFixtures::rating_instant())
            .await
            .unwrap();

        // 300 x 1.3 (new) x 1.4 (high-performance) x 1.5 (luxury)
        assert_premium(quote.coverages(), CoverageLine::Collision, dec!(819.00));
        assert!(quote.vehicle().high_performance);
        assert!(quote.vehicle().luxury);
        assert_quote_consistent(&quote);
    }

    #[tokio::test]
    async fn test_request_discounts_stack_in_order() {
        let service = ServiceFixtures::standard();
        let request = QuoteRequestBuilder::new()
            .good_student()
            .with_anti_theft()
            .with_safety_features()
            .defensive_driving()
            .build();

        let quote = service
            .generate_quote_at(&request, DateFixtures::rating_instant())
            .await
            .unwrap();

        let kinds: Vec<_> = quote.adjustments().iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiscountKind::GoodStudent,
                DiscountKind::AntiTheft,
                DiscountKind::SafetyFeatures,
                DiscountKind::DefensiveDriving,
            ]
        );
        // 500 -> 450 -> 405 -> 384.75 -> 346.275
        assert_premium(quote.coverages(), CoverageLine::Liability, dec!(346.28));
        // last step: 384.75 - 346.275
        assert_eq!(quote.coverages().get("liabilityDiscount"), Some(dec!(38.48)));
        assert_quote_consistent(&quote);
    }
}

// ============================================================================
// LIABILITY BANDS
// ============================================================================

mod liability_bands {
    use super::*;

    #[tokio::test]
    async fn test_age_24_versus_25() {
        let service = ServiceFixtures::standard();
        let now = DateFixtures::rating_instant();

        let young = service
            .generate_quote_at(&RequestFixtures::young_driver_toyota(), now)
            .await
            .unwrap();
        let standard = service
            .generate_quote_at(&RequestFixtures::standard_toyota(), now)
            .await
            .unwrap();
        let twenty_five = service
            .generate_quote_at(&QuoteRequestBuilder::new().with_age(25).build(), now)
            .await
            .unwrap();

        assert_premium(young.coverages(), CoverageLine::Liability, dec!(750.00));
        assert_premium(twenty_five.coverages(), CoverageLine::Liability, dec!(500.00));

        for line in CoverageLine::ALL.into_iter().filter(|l| *l != CoverageLine::Liability) {
            assert_eq!(young.premium(line), standard.premium(line), "{} changed with age", line);
        }
    }

    #[tokio::test]
    async fn test_senior_threshold() {
        let service = ServiceFixtures::standard();
        let now = DateFixtures::rating_instant();

        let seventy = service
            .generate_quote_at(&QuoteRequestBuilder::new().with_age(70).build(), now)
            .await
            .unwrap();
        let seventy_one = service
            .generate_quote_at(&QuoteRequestBuilder::new().with_age(71).build(), now)
            .await
            .unwrap();

        assert_premium(seventy.coverages(), CoverageLine::Liability, dec!(500.00));
        assert_premium(seventy_one.coverages(), CoverageLine::Liability, dec!(600.00));
    }

    #[tokio::test]
    async fn test_all_liability_factors_compound() {
        let service = ServiceFixtures::standard();
        let request = QuoteRequestBuilder::new()
            .with_age(19)
            .with_years_licensed(1)
            .with_credit_score(550)
            .build();

        let quote = service
            .generate_quote_at(&request, DateFixtures::rating_instant())
            .await
            .unwrap();

        // 500 x 1.5 x 1.3 x 1.25
        assert_premium(quote.coverages(), CoverageLine::Liability, dec!(1218.75));
    }
}

// ============================================================================
// HISTORY DISCOUNTS
// ============================================================================

mod history_discounts {
    use super::*;

    #[tokio::test]
    async fn test_loyal_good_driver() {
        let customer = CustomerFixtures::loyal_good_driver();
        let service = ServiceFixtures::with_customers([customer.clone()]);
        let request = QuoteRequestBuilder::new().with_customer(customer.customer_id).build();

        let quote = service
            .generate_quote_at(&request, DateFixtures::rating_instant())
            .await
            .unwrap();

        let kinds: Vec<_> = quote.adjustments().iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![DiscountKind::MultiPolicy, DiscountKind::GoodDriver]);
        assert_eq!(quote.total_premium().amount(), dec!(1093.95));
        // annotation reflects the good-driver step only: 450 - 382.50
        assert_eq!(quote.coverages().get("liabilityDiscount"), Some(dec!(67.50)));
        assert_quote_consistent(&quote);
    }

    #[tokio::test]
    async fn test_one_violation_is_still_good() {
        let customer = CustomerFixtures::new_customer_one_violation();
        let service = ServiceFixtures::with_customers([customer.clone()]);
        let request = QuoteRequestBuilder::new().with_customer(customer.customer_id).build();

        let quote = service
            .generate_quote_at(&request, DateFixtures::rating_instant())
            .await
            .unwrap();

        let kinds: Vec<_> = quote.adjustments().iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![DiscountKind::GoodDriver]);
        assert_premium(quote.coverages(), CoverageLine::Liability, dec!(425.00));
    }

    #[tokio::test]
    async fn test_dui_blocks_good_driver_only() {
        let customer = CustomerFixtures::loyal_with_dui();
        let service = ServiceFixtures::with_customers([customer.clone()]);
        let request = QuoteRequestBuilder::new().with_customer(customer.customer_id).build();

        let quote = service
            .generate_quote_at(&request, DateFixtures::rating_instant())
            .await
            .unwrap();

        let kinds: Vec<_> = quote.adjustments().iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![DiscountKind::MultiPolicy]);
        assert_eq!(quote.total_premium().amount(), dec!(1287.00));
    }

    #[tokio::test]
    async fn test_anonymous_request_gets_no_history_discounts() {
        let service = ServiceFixtures::with_customers([CustomerFixtures::loyal_good_driver()]);
        let quote = service
            .generate_quote_at(&QuoteRequestBuilder::new().build(), DateFixtures::rating_instant())
            .await
            .unwrap();

        assert_no_discount_keys(quote.coverages());
    }
}

// ============================================================================
// FAIL OPEN
// ============================================================================

mod fail_open {
    use super::*;

    #[tokio::test]
    async fn test_outage_prices_without_history_discounts() {
        let (service, history) = ServiceFixtures::with_history_outage();
        let request = QuoteRequestBuilder::new().with_customer(CustomerId::new()).build();

        let quote = service
            .generate_quote_at(&request, DateFixtures::rating_instant())
            .await
            .unwrap();

        assert_eq!(history.calls(), 2);
        assert_no_discount_keys(quote.coverages());
        assert_eq!(quote.total_premium().amount(), dec!(1430.00));
    }

    #[tokio::test]
    async fn test_outage_keeps_request_discounts() {
        let (service, _) = ServiceFixtures::with_history_outage();
        let request = QuoteRequestBuilder::new()
            .with_customer(CustomerId::new())
            .good_student()
            .build();

        let quote = service
            .generate_quote_at(&request, DateFixtures::rating_instant())
            .await
            .unwrap();

        let kinds: Vec<_> = quote.adjustments().iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![DiscountKind::GoodStudent]);
        assert_eq!(quote.total_premium().amount(), dec!(1287.00));
    }

    #[tokio::test]
    async fn test_unknown_customer_is_not_an_error() {
        let service = ServiceFixtures::standard();
        let request = QuoteRequestBuilder::new().with_customer(CustomerId::new()).build();

        let quote = service
            .generate_quote_at(&request, DateFixtures::rating_instant())
            .await
            .unwrap();
        assert_no_discount_keys(quote.coverages());
    }
}

// ============================================================================
// QUOTE LIFECYCLE
// ============================================================================

mod quote_lifecycle {
    use super::*;

    #[tokio::test]
    async fn test_expires_after_thirty_days() {
        let service = ServiceFixtures::standard();
        let now = DateFixtures::rating_instant();
        let quote = service
            .generate_quote_at(&RequestFixtures::standard_toyota(), now)
            .await
            .unwrap();

        assert_eq!(quote.created_at(), now);
        assert_valid_for_days(&quote, 30);
        assert!(!quote.is_expired_at(now + Duration::days(30) - Duration::seconds(1)));
        assert!(quote.is_expired_at(now + Duration::days(30)));
    }

    #[tokio::test]
    async fn test_identical_requests_get_distinct_ids() {
        let service = ServiceFixtures::standard();
        let request = RequestFixtures::standard_toyota();
        let now = DateFixtures::rating_instant();

        let first = service.generate_quote_at(&request, now).await.unwrap();
        let second = service.generate_quote_at(&request, now).await.unwrap();

        assert_ne!(first.quote_id(), second.quote_id());
        assert_eq!(first.coverages(), second.coverages());
        assert!(first.quote_id().to_string().starts_with("QUOTE-"));
    }

    #[tokio::test]
    async fn test_quote_carries_rating_version_and_snapshots() {
        let service = ServiceFixtures::standard();
        let request = QuoteRequestBuilder::new().with_name("Grace Brewster Hopper").build();

        let quote = service
            .generate_quote_at(&request, DateFixtures::rating_instant())
            .await
            .unwrap();

        assert_eq!(quote.rating_version(), service.config().version);
        assert_eq!(quote.applicant().first_name, "Grace");
        assert_eq!(quote.applicant().last_name, "Brewster Hopper");
        assert_eq!(quote.vehicle().make, "Toyota");
        assert_ledger_total_matches(quote.coverages());
    }

    #[tokio::test]
    async fn test_generate_quote_uses_current_time() {
        let service = ServiceFixtures::standard();
        let request = QuoteRequestBuilder::new().with_vehicle(2015, "Honda").build();

        let before = chrono::Utc::now();
        let quote = service.generate_quote(&request).await.unwrap();

        assert!(quote.created_at() >= before);
        assert_valid_for_days(&quote, 30);
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

mod validation {
    use super::*;

    async fn rejects(request: domain_rating::QuoteRequest) -> String {
        let service = ServiceFixtures::standard();
        match service.generate_quote_at(&request, DateFixtures::rating_instant()).await {
            Err(RatingError::Validation(message)) => message,
            other => panic!("Expected a validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_underage_applicant() {
        let message = rejects(QuoteRequestBuilder::new().with_age(15).build()).await;
        assert!(message.contains("at least 16"));
    }

    #[tokio::test]
    async fn test_model_year_after_next_year() {
        let message = rejects(QuoteRequestBuilder::new().with_vehicle(2024, "Kia").build()).await;
        assert!(message.contains("between 1900 and 2023"));
    }

    #[tokio::test]
    async fn test_blank_make() {
        let message = rejects(QuoteRequestBuilder::new().with_vehicle(2020, "  ").build()).await;
        assert_eq!(message, "Vehicle make is required");
    }

    #[tokio::test]
    async fn test_credit_score_out_of_range() {
        rejects(QuoteRequestBuilder::new().with_credit_score(200).build()).await;
    }
}

// ============================================================================
// RATE TABLE LIMITS
// ============================================================================

mod rate_table_limits {
    use super::*;
    use domain_rating::{
        price_quote, ExternalFacts, InMemoryCustomerHistory, QuoteService, RatingConfig,
    };
    use std::sync::Arc;

    #[test]
    fn test_service_rejects_endless_validity() {
        let mut config = RatingConfig::default();
        config.quote_validity_days = 4_000_000_000;

        let result = QuoteService::new(config, Arc::new(InMemoryCustomerHistory::new()));

        assert!(matches!(result, Err(RatingError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_overflowing_base_rate_fails_the_quote() {
        let config = RatingConfig::from_json(
            r#"{"base_rates": {"liability": "70000000000000000000000000000"}}"#,
        )
        .unwrap();

        let result = price_quote(
            &config,
            &RequestFixtures::young_driver_toyota(),
            ExternalFacts::default(),
            DateFixtures::rating_instant(),
        );

        match result {
            Err(RatingError::InternalInconsistency(message)) => {
                assert!(message.contains("liability"), "{}", message);
            }
            other => panic!("Expected an internal inconsistency, got {:?}", other),
        }
    }

    #[test]
    fn test_large_but_representable_table_still_prices() {
        let config = RatingConfig::from_json(
            r#"{"base_rates": {"liability": "1000000000000"}, "quote_validity_days": 3650}"#,
        )
        .unwrap();

        let quote = price_quote(
            &config,
            &RequestFixtures::standard_toyota(),
            ExternalFacts::default(),
            DateFixtures::rating_instant(),
        )
        .unwrap();

        assert_premium(quote.coverages(), CoverageLine::Liability, dec!(1000000000000.00));
        assert_valid_for_days(&quote, 3650);
        assert_ledger_total_matches(quote.coverages());
    }
}
