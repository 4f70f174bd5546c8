//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! auto quote engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Fixed rating dates, requests and customer histories
//! - `builders`: Builder for quote requests with randomized names
//! - `assertions`: Ledger and quote assertions with readable failures
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
