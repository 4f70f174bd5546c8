//! Core Kernel - Foundational types and utilities for the quoting system
//!
//! This crate provides the building blocks shared by the rating domain and
//! the HTTP adapter:
//! - USD money wrapper and half-up rounding of premiums
//! - Strongly-typed identifiers
//! - Port/adapter plumbing (errors, health checks, operation metadata)

pub mod money;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, round_half_up};
pub use identifiers::{QuoteId, CustomerId, VehicleId};
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable,
    OperationMetadata,
};
