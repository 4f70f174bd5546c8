//! Quote assembly
//!
//! Closes the ledger with its total and wraps it, together with the
//! snapshots it was rated from, into an immutable [`QuoteResult`].

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt::Display;
use tracing::info;

use core_kernel::{Money, QuoteId};

use crate::config::RatingConfig;
use crate::coverage::CoverageLine;
use crate::error::RatingError;
use crate::ledger::{AppliedAdjustment, CoverageLedger};
use crate::snapshot::{ApplicantSnapshot, VehicleSnapshot};

/// A priced, time-limited auto insurance offer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteResult {
    #[serde(serialize_with = "as_display")]
    quote_id: QuoteId,
    applicant: ApplicantSnapshot,
    vehicle: VehicleSnapshot,
    coverages: CoverageLedger,
    total_premium: Decimal,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    rating_version: String,
}

impl QuoteResult {
    pub fn quote_id(&self) -> QuoteId {
        self.quote_id
    }

    pub fn applicant(&self) -> &ApplicantSnapshot {
        &self.applicant
    }

    pub fn vehicle(&self) -> &VehicleSnapshot {
        &self.vehicle
    }

    /// Final per-line premiums, discount annotations and `totalPremium`
    pub fn coverages(&self) -> &CoverageLedger {
        &self.coverages
    }

    /// Premium of a single coverage line
    pub fn premium(&self, line: CoverageLine) -> Option<Decimal> {
        self.coverages.premium(line)
    }

    /// Total premium in dollars
    pub fn total_premium(&self) -> Money {
        Money::usd(self.total_premium)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// True once the validity window has passed
    pub fn is_expired_at(&self, at: DateTime<Utc>) -> bool {
        at >= self.expires_at
    }

    /// Version of the rate table the quote was priced with
    pub fn rating_version(&self) -> &str {
        &self.rating_version
    }

    /// Discounts that triggered, in application order
    pub fn adjustments(&self) -> &[AppliedAdjustment] {
        self.coverages.adjustments()
    }
}

/// Finalizes ledgers into quotes
pub struct QuoteAssembler<'a> {
    config: &'a RatingConfig,
}

impl<'a> QuoteAssembler<'a> {
    pub fn new(config: &'a RatingConfig) -> Self {
        Self { config }
    }

    /// Totals the ledger and issues a quote valid from `now`
    ///
    /// Every call mints a fresh quote id, even for identical inputs.
    pub fn assemble(
        &self,
        mut ledger: CoverageLedger,
        applicant: ApplicantSnapshot,
        vehicle: VehicleSnapshot,
        now: DateTime<Utc>,
    ) -> Result<QuoteResult, RatingError> {
        ledger.set_total(ledger.coverage_sum()?)?;
        let total_premium = ledger
            .total_premium()
            .ok_or_else(|| RatingError::inconsistency("ledger has no total after assembly"))?;

        let quote_id = QuoteId::new();
        let validity = Duration::days(i64::from(self.config.quote_validity_days));
        let expires_at = now.checked_add_signed(validity).ok_or_else(|| {
            RatingError::inconsistency(format!(
                "quote created at {} cannot expire {} days later",
                now, self.config.quote_validity_days
            ))
        })?;

        info!(
            quote_id = %quote_id,
            total_premium = %total_premium,
            rating_version = %self.config.version,
            discounts = ledger.adjustments().len(),
            "Quote assembled"
        );

        Ok(QuoteResult {
            quote_id,
            applicant,
            vehicle,
            coverages: ledger,
            total_premium,
            created_at: now,
            expires_at,
            rating_version: self.config.version.clone(),
        })
    }
}

fn as_display<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
