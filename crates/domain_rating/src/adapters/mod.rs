//! Customer history adapters
//!
//! - **InMemoryCustomerHistory**: a process-local table, optionally seeded
//!   from a JSON file at startup
//! - **FailingCustomerHistory**: always-down double for tests (re-exported
//!   from the ports module under the `mock` feature)

pub mod in_memory;

pub use in_memory::InMemoryCustomerHistory;
