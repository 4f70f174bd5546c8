//! Auto Quote Rating Domain
//!
//! Turns a quote request into a priced, time-limited quote in four stages:
//!
//! 1. **Snapshot**: validate the request and derive the applicant and
//!    vehicle the engine rates against
//! 2. **Rate**: compute each coverage line's premium from base rates and
//!    rating factors
//! 3. **Discount**: walk the configured discount stack, scaling every line
//!    for each discount that applies
//! 4. **Assemble**: total the ledger, mint a quote id and set the expiry
//!
//! Every number comes from a versioned [`RatingConfig`]. Facts the request
//! cannot supply (other policies held, driving record) come through the
//! [`CustomerHistoryPort`]; a failed lookup counts as "no" rather than
//! failing the quote.
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use domain_rating::{price_quote, ExternalFacts, QuoteRequest, RatingConfig};
//! use rust_decimal_macros::dec;
//!
//! let request = QuoteRequest::new("Ada Lovelace", 30, 2022, "Toyota");
//! let now = Utc.with_ymd_and_hms(2022, 9, 1, 12, 0, 0).unwrap();
//!
//! let quote = price_quote(&RatingConfig::default(), &request, ExternalFacts::default(), now).unwrap();
//! assert_eq!(quote.total_premium().amount(), dec!(1430.00));
//! ```

pub mod adapters;
pub mod adjustments;
pub mod config;
pub mod coverage;
pub mod error;
pub mod ledger;
pub mod ports;
pub mod quote;
pub mod rates;
pub mod request;
pub mod services;
pub mod snapshot;

pub use adapters::InMemoryCustomerHistory;
pub use adjustments::{DiscountEngine, ExternalFacts};
pub use config::{
    ApplicantDefaults, BaseRates, CollisionFactors, ComprehensiveFactors, DiscountKind,
    DiscountRule, LiabilityFactors, RatingConfig, DEFAULT_RATING_VERSION,
    MAX_QUOTE_VALIDITY_DAYS,
};
pub use coverage::{CoverageLine, DISCOUNT_SUFFIX, TOTAL_PREMIUM_KEY};
pub use error::RatingError;
pub use ledger::{AppliedAdjustment, CoverageLedger, PREMIUM_DP};
pub use ports::{CustomerHistoryPort, CustomerProfile, DrivingRecord};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::FailingCustomerHistory;
pub use quote::{QuoteAssembler, QuoteResult};
pub use rates::RateCalculator;
pub use request::{ApplicantProfile, QuoteRequest};
pub use services::{price_quote, QuoteService};
pub use snapshot::{ApplicantSnapshot, SnapshotBuilder, VehicleSnapshot};
