//! Quote service
//!
//! Orchestrates one quote: snapshot the request, ask the customer history
//! port for the two external facts, rate, discount and assemble. The
//! pipeline itself is synchronous and pure; only the lookups are async.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{instrument, warn};

use core_kernel::{CustomerId, HealthCheckResult, OperationMetadata, PortError};

use crate::adjustments::{DiscountEngine, ExternalFacts};
use crate::config::RatingConfig;
use crate::error::RatingError;
use crate::ports::CustomerHistoryPort;
use crate::quote::{QuoteAssembler, QuoteResult};
use crate::rates::RateCalculator;
use crate::request::QuoteRequest;
use crate::snapshot::{ApplicantSnapshot, SnapshotBuilder, VehicleSnapshot};

/// Prices a request against a rate table with already-known external facts
///
/// The rating date is the calendar date of `now` in UTC.
pub fn price_quote(
    config: &RatingConfig,
    request: &QuoteRequest,
    facts: ExternalFacts,
    now: DateTime<Utc>,
) -> Result<QuoteResult, RatingError> {
    let (applicant, vehicle) = SnapshotBuilder::new(config).build(request, now.date_naive())?;
    price_snapshots(config, applicant, vehicle, facts, now)
}

fn price_snapshots(
    config: &RatingConfig,
    applicant: ApplicantSnapshot,
    vehicle: VehicleSnapshot,
    facts: ExternalFacts,
    now: DateTime<Utc>,
) -> Result<QuoteResult, RatingError> {
    let base = RateCalculator::new(config).calculate_base_rates(&applicant, &vehicle, now.date_naive())?;
    let adjusted = DiscountEngine::new(config).apply(base, &applicant, &vehicle, &facts)?;
    QuoteAssembler::new(config).assemble(adjusted, applicant, vehicle, now)
}

/// Generates quotes using a rate table and a customer history source
#[derive(Clone)]
pub struct QuoteService {
    config: RatingConfig,
    history: Arc<dyn CustomerHistoryPort>,
}

impl QuoteService {
    /// Creates a service after validating the rate table
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the rate table cannot be used.
    pub fn new(
        config: RatingConfig,
        history: Arc<dyn CustomerHistoryPort>,
    ) -> Result<Self, RatingError> {
        config.validate()?;
        Ok(Self { config, history })
    }

    /// The rate table quotes are priced with
    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Health of the customer history source
    pub async fn history_health(&self) -> HealthCheckResult {
        self.history.health_check().await
    }

    /// Generates a quote valid from the current instant
    pub async fn generate_quote(&self, request: &QuoteRequest) -> Result<QuoteResult, RatingError> {
        self.generate_quote_at(request, Utc::now()).await
    }

    /// Generates a quote as of `now`
    ///
    /// Validation runs before any lookup, so a rejected request never
    /// reaches the history source.
    ///
    /// # Errors
    ///
    /// `Validation` for a malformed request, `InternalInconsistency` if the
    /// ledger breaks an invariant. Lookup failures are not errors.
    #[instrument(skip_all, fields(customer_id = ?request.customer_id))]
    pub async fn generate_quote_at(
        &self,
        request: &QuoteRequest,
        now: DateTime<Utc>,
    ) -> Result<QuoteResult, RatingError> {
        let (applicant, vehicle) = SnapshotBuilder::new(&self.config).build(request, now.date_naive())?;
        let facts = self.external_facts(request.customer_id).await;
        price_snapshots(&self.config, applicant, vehicle, facts, now)
    }

    /// Looks up both facts one after the other; anything but a clean answer is false
    async fn external_facts(&self, customer_id: Option<CustomerId>) -> ExternalFacts {
        let Some(customer_id) = customer_id else {
            return ExternalFacts::default();
        };

        let metadata = OperationMetadata::default().with_context("operation", "generate_quote");

        let has_other_policies = fail_open(
            "has_other_policies",
            customer_id,
            self.history
                .has_other_policies(customer_id, Some(metadata.clone()))
                .await,
        );
        let is_good_driver = fail_open(
            "is_good_driver",
            customer_id,
            self.history.is_good_driver(customer_id, Some(metadata)).await,
        );

        ExternalFacts::new(has_other_policies, is_good_driver)
    }
}

impl std::fmt::Debug for QuoteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteService")
            .field("rating_version", &self.config.version)
            .finish_non_exhaustive()
    }
}

fn fail_open(lookup: &'static str, customer_id: CustomerId, result: Result<bool, PortError>) -> bool {
    match result {
        Ok(answer) => answer,
        Err(source) => {
            let err = RatingError::lookup_unavailable(lookup, customer_id, source);
            warn!(error = %err, "Customer lookup failed, discount not applied");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryCustomerHistory;
    use crate::ports::mock::FailingCustomerHistory;
    use crate::ports::{CustomerProfile, DrivingRecord};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 9, 1, 9, 0, 0).unwrap()
    }

    fn toyota() -> QuoteRequest {
        QuoteRequest::new("Ada Lovelace", 30, 2022, "Toyota")
    }

    #[test]
    fn test_price_quote_is_deterministic_apart_from_id() {
        let config = RatingConfig::default();
        let a = price_quote(&config, &toyota(), ExternalFacts::default(), now()).unwrap();
        let b = price_quote(&config, &toyota(), ExternalFacts::default(), now()).unwrap();

        assert_eq!(a.coverages(), b.coverages());
        assert_ne!(a.quote_id(), b.quote_id());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = RatingConfig::default();
        config.quote_validity_days = 0;
        let err = QuoteService::new(config, Arc::new(InMemoryCustomerHistory::new())).unwrap_err();
        assert!(matches!(err, RatingError::InvalidConfiguration(_)));
    }

    #[tokio::test]
    async fn test_known_customer_gets_history_discounts() {
        let customer = CustomerProfile::new(CustomerId::new(), DrivingRecord::default(), 1);
        let history = InMemoryCustomerHistory::from_profiles([customer.clone()]);
        let service = QuoteService::new(RatingConfig::default(), Arc::new(history)).unwrap();

        let quote = service
            .generate_quote_at(&toyota().for_customer(customer.customer_id), now())
            .await
            .unwrap();

        assert_eq!(quote.adjustments().len(), 2);
        // 1430 x 0.9 x 0.85, line by line
        assert_eq!(quote.total_premium().amount(), dec!(1093.95));
    }

    #[tokio::test]
    async fn test_unknown_customer_fails_open() {
        let service =
            QuoteService::new(RatingConfig::default(), Arc::new(InMemoryCustomerHistory::new())).unwrap();

        let quote = service
            .generate_quote_at(&toyota().for_customer(CustomerId::new()), now())
            .await
            .unwrap();

        assert!(!quote.coverages().has_discounts());
        assert_eq!(quote.total_premium().amount(), dec!(1430.00));
    }

    #[tokio::test]
    async fn test_history_outage_fails_open() {
        let history = Arc::new(FailingCustomerHistory::new());
        let service = QuoteService::new(RatingConfig::default(), history.clone()).unwrap();

        let quote = service
            .generate_quote_at(&toyota().for_customer(CustomerId::new()), now())
            .await
            .unwrap();

        assert_eq!(history.calls(), 2);
        assert_eq!(quote.total_premium().amount(), dec!(1430.00));
    }

    #[tokio::test]
    async fn test_invalid_request_skips_lookups() {
        let history = Arc::new(FailingCustomerHistory::new());
        let service = QuoteService::new(RatingConfig::default(), history.clone()).unwrap();

        let request = QuoteRequest::new("Kid", 15, 2020, "Kia").for_customer(CustomerId::new());
        let err = service.generate_quote_at(&request, now()).await.unwrap_err();

        assert!(matches!(err, RatingError::Validation(_)));
        assert_eq!(history.calls(), 0);
    }
}
