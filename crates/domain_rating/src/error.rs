//! Rating domain errors
//!
//! Only `Validation`, `InternalInconsistency` and `InvalidConfiguration`
//! ever reach a caller. `LookupUnavailable` exists so a failed collaborator
//! call can be logged with full context before the quote continues without
//! the corresponding discount.

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur while rating a quote
#[derive(Debug, Error)]
pub enum RatingError {
    /// The quote request is malformed or out of range
    #[error("Validation error: {0}")]
    Validation(String),

    /// An external lookup failed; recoverable, treated as "false"
    #[error("Lookup {lookup} unavailable for customer {customer_id}: {source}")]
    LookupUnavailable {
        lookup: &'static str,
        customer_id: String,
        #[source]
        source: PortError,
    },

    /// A ledger invariant was violated
    #[error("Internal inconsistency: {0}")]
    InternalInconsistency(String),

    /// The rating configuration cannot be used
    #[error("Invalid rating configuration: {0}")]
    InvalidConfiguration(String),
}

impl RatingError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        RatingError::Validation(message.into())
    }

    /// Creates an internal inconsistency error
    pub fn inconsistency(message: impl Into<String>) -> Self {
        RatingError::InternalInconsistency(message.into())
    }

    /// Creates an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        RatingError::InvalidConfiguration(message.into())
    }

    /// Wraps a failed collaborator call
    pub fn lookup_unavailable(
        lookup: &'static str,
        customer_id: impl std::fmt::Display,
        source: PortError,
    ) -> Self {
        RatingError::LookupUnavailable {
            lookup,
            customer_id: customer_id.to_string(),
            source,
        }
    }

    /// Returns true for errors the quote pipeline absorbs instead of failing
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RatingError::LookupUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_unavailable_is_recoverable() {
        let err = RatingError::lookup_unavailable(
            "is_good_driver",
            "CUST-1",
            PortError::connection("refused"),
        );
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("is_good_driver"));
        assert!(err.to_string().contains("CUST-1"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_validation_is_not_recoverable() {
        let err = RatingError::validation("Vehicle make is required");
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "Validation error: Vehicle make is required");
    }
}
