//! In-memory customer history
//!
//! Keeps customer profiles in a shared map behind a `tokio` read-write lock.
//! Reads never block each other, so concurrent quotes only contend with the
//! occasional `upsert`.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::instrument;

use core_kernel::{
    AdapterHealth, CustomerId, DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata,
    PortError,
};

use crate::ports::{CustomerHistoryPort, CustomerProfile};

const ADAPTER_ID: &str = "in-memory-customer-history";

/// Customer history held in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerHistory {
    profiles: Arc<RwLock<HashMap<CustomerId, CustomerProfile>>>,
}

impl InMemoryCustomerHistory {
    /// Creates an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history pre-populated with profiles; later duplicates win
    pub fn from_profiles(profiles: impl IntoIterator<Item = CustomerProfile>) -> Self {
        let map = profiles
            .into_iter()
            .map(|profile| (profile.customer_id, profile))
            .collect();
        Self {
            profiles: Arc::new(RwLock::new(map)),
        }
    }

    /// Loads profiles from a JSON array
    pub fn from_json(json: &str) -> Result<Self, PortError> {
        let profiles: Vec<CustomerProfile> = serde_json::from_str(json)
            .map_err(|e| PortError::transformation(format!("malformed customer data: {}", e)))?;
        Ok(Self::from_profiles(profiles))
    }

    /// Loads profiles from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PortError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| PortError::Internal {
            message: format!("cannot read customer data from {}", path.display()),
            source: Some(Box::new(e)),
        })?;
        Self::from_json(&json)
    }

    /// Inserts or replaces a profile
    pub async fn upsert(&self, profile: CustomerProfile) {
        self.profiles.write().await.insert(profile.customer_id, profile);
    }

    /// Number of known customers
    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }

    async fn profile(&self, customer_id: CustomerId) -> Result<CustomerProfile, PortError> {
        self.profiles
            .read()
            .await
            .get(&customer_id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Customer", customer_id))
    }
}

impl DomainPort for InMemoryCustomerHistory {}

#[async_trait]
impl HealthCheckable for InMemoryCustomerHistory {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let customers = self.len().await;

        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status: AdapterHealth::Healthy,
            latency_ms: start.elapsed().as_millis() as u64,
            message: Some(format!("{} customers loaded", customers)),
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl CustomerHistoryPort for InMemoryCustomerHistory {
    #[instrument(skip_all, fields(customer_id = %customer_id))]
    async fn has_other_policies(
        &self,
        customer_id: CustomerId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<bool, PortError> {
        Ok(self.profile(customer_id).await?.has_other_policies())
    }

    #[instrument(skip_all, fields(customer_id = %customer_id))]
    async fn is_good_driver(
        &self,
        customer_id: CustomerId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<bool, PortError> {
        Ok(self.profile(customer_id).await?.driving_record.is_good_driver())
    }
}
