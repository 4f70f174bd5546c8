//! Rating Domain Ports
//!
//! The quote service needs two facts it cannot derive from the request:
//! whether the customer already holds another policy, and whether their
//! driving record qualifies as good. Both come through
//! [`CustomerHistoryPort`], so the source of truth (an in-memory table, a
//! policy administration system, a motor vehicle records bureau) can be
//! swapped at startup.
//!
//! ```rust,ignore
//! let history: Arc<dyn CustomerHistoryPort> = match config.customer_data_path {
//!     Some(path) => Arc::new(InMemoryCustomerHistory::from_json_file(path)?),
//!     None => Arc::new(InMemoryCustomerHistory::new()),
//! };
//! let service = QuoteService::new(RatingConfig::default(), history)?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, DomainPort, HealthCheckable, OperationMetadata, PortError};

/// Source of customer history used by history-based discounts
#[async_trait]
pub trait CustomerHistoryPort: DomainPort + HealthCheckable {
    /// Returns true if the customer holds at least one other policy
    ///
    /// `PortError::NotFound` for an unknown customer.
    async fn has_other_policies(
        &self,
        customer_id: CustomerId,
        metadata: Option<OperationMetadata>,
    ) -> Result<bool, PortError>;

    /// Returns true if the customer's driving record qualifies as good
    ///
    /// `PortError::NotFound` for an unknown customer.
    async fn is_good_driver(
        &self,
        customer_id: CustomerId,
        metadata: Option<OperationMetadata>,
    ) -> Result<bool, PortError>;
}

/// Summary of a customer's motor history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrivingRecord {
    pub has_dui: bool,
    /// At-fault accidents
    pub accident_count: u32,
    /// Moving violations
    pub violation_count: u32,
}

impl DrivingRecord {
    /// Maximum violations a good driver may have
    pub const MAX_GOOD_DRIVER_VIOLATIONS: u32 = 1;

    /// No DUI, no at-fault accidents and at most one violation
    pub fn is_good_driver(&self) -> bool {
        !self.has_dui
            && self.accident_count == 0
            && self.violation_count <= Self::MAX_GOOD_DRIVER_VIOLATIONS
    }
}

/// What the history source knows about one customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_id: CustomerId,
    #[serde(default)]
    pub driving_record: DrivingRecord,
    /// Active policies held, excluding the one being quoted
    #[serde(default)]
    pub policy_count: u32,
}

impl CustomerProfile {
    pub fn new(customer_id: CustomerId, driving_record: DrivingRecord, policy_count: u32) -> Self {
        Self {
            customer_id,
            driving_record,
            policy_count,
        }
    }

    pub fn has_other_policies(&self) -> bool {
        self.policy_count > 0
    }
}

/// Test doubles for the customer history port
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use core_kernel::{AdapterHealth, HealthCheckResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A history source that is always down
    ///
    /// Counts calls so tests can check that a lookup was attempted.
    #[derive(Debug, Default)]
    pub struct FailingCustomerHistory {
        calls: AtomicUsize,
    }

    impl FailingCustomerHistory {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of lookups attempted so far
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn fail(&self) -> PortError {
            self.calls.fetch_add(1, Ordering::SeqCst);
            PortError::ServiceUnavailable {
                service: "customer-history".to_string(),
            }
        }
    }

    impl DomainPort for FailingCustomerHistory {}

    #[async_trait]
    impl HealthCheckable for FailingCustomerHistory {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "failing-customer-history".to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms: 0,
                message: Some("Mock adapter always down".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl CustomerHistoryPort for FailingCustomerHistory {
        async fn has_other_policies(
            &self,
            _customer_id: CustomerId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<bool, PortError> {
            Err(self.fail())
        }

        async fn is_good_driver(
            &self,
            _customer_id: CustomerId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<bool, PortError> {
            Err(self.fail())
        }
    }
}
