//! Coverage ledger
//!
//! The working set of per-line premiums threaded through the pipeline.
//! Each stage takes the ledger by value and hands it on, so there is one
//! owner at a time and nothing mutates a quote once it is assembled.
//!
//! On the wire the ledger is a flat map: one key per coverage line, one
//! `<line>Discount` key per line once a discount has triggered, and
//! `totalPremium` after assembly.

use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::collections::BTreeMap;

use core_kernel::round_half_up;

use crate::config::DiscountKind;
use crate::coverage::{CoverageLine, TOTAL_PREMIUM_KEY};
use crate::error::RatingError;

/// Decimal places premiums are kept at
pub const PREMIUM_DP: u32 = 2;

/// A discount step that triggered, with its dollar impact across all lines
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct AppliedAdjustment {
    pub kind: DiscountKind,
    pub factor: Decimal,
    /// Sum of the per-line reductions of this step
    pub amount: Decimal,
}

/// Per-line premiums plus discount annotations and the assembled total
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageLedger {
    premiums: BTreeMap<CoverageLine, Decimal>,
    discounts: BTreeMap<CoverageLine, Decimal>,
    total_premium: Option<Decimal>,
    adjustments: Vec<AppliedAdjustment>,
}

impl CoverageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a line's premium, rounded half-up to the cent
    ///
    /// # Errors
    ///
    /// `InternalInconsistency` if the amount is negative.
    pub fn set_premium(&mut self, line: CoverageLine, amount: Decimal) -> Result<(), RatingError> {
        ensure_non_negative(line.key(), amount)?;
        self.premiums.insert(line, round_half_up(amount, PREMIUM_DP));
        Ok(())
    }

    /// Premium currently recorded for a line
    pub fn premium(&self, line: CoverageLine) -> Option<Decimal> {
        self.premiums.get(&line).copied()
    }

    /// Reduction recorded by the most recent discount step for a line
    pub fn discount(&self, line: CoverageLine) -> Option<Decimal> {
        self.discounts.get(&line).copied()
    }

    /// Total written by the assembler, if assembled
    pub fn total_premium(&self) -> Option<Decimal> {
        self.total_premium
    }

    /// Discount steps that triggered, in the order they were applied
    pub fn adjustments(&self) -> &[AppliedAdjustment] {
        &self.adjustments
    }

    /// Iterates over the coverage lines and their premiums
    pub fn premiums(&self) -> impl Iterator<Item = (CoverageLine, Decimal)> + '_ {
        self.premiums.iter().map(|(line, amount)| (*line, *amount))
    }

    /// True once any discount annotation exists
    pub fn has_discounts(&self) -> bool {
        !self.discounts.is_empty()
    }

    /// Sum of all coverage-line entries, excluding annotations and total
    ///
    /// # Errors
    ///
    /// `InternalInconsistency` if the sum leaves the decimal range.
    pub fn coverage_sum(&self) -> Result<Decimal, RatingError> {
        self.premiums
            .values()
            .try_fold(Decimal::ZERO, |sum, amount| checked_add(TOTAL_PREMIUM_KEY, sum, *amount))
    }

    /// Looks up an entry by its wire key
    pub fn get(&self, key: &str) -> Option<Decimal> {
        if key == TOTAL_PREMIUM_KEY {
            return self.total_premium;
        }
        if let Some(line) = CoverageLine::from_key(key) {
            return self.premium(line);
        }
        key.strip_suffix(crate::coverage::DISCOUNT_SUFFIX)
            .and_then(CoverageLine::from_key)
            .and_then(|line| self.discount(line))
    }

    /// True if the wire key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Flattens the ledger into its wire representation
    pub fn to_map(&self) -> BTreeMap<String, Decimal> {
        let mut map: BTreeMap<String, Decimal> = self
            .premiums
            .iter()
            .map(|(line, amount)| (line.key().to_string(), *amount))
            .collect();
        map.extend(
            self.discounts
                .iter()
                .map(|(line, amount)| (line.discount_key(), *amount)),
        );
        if let Some(total) = self.total_premium {
            map.insert(TOTAL_PREMIUM_KEY.to_string(), total);
        }
        map
    }

    /// Multiplies every line by `factor`, annotating each line's reduction
    ///
    /// Earlier annotations are overwritten, not accumulated. Returns the
    /// summed reduction across lines.
    pub(crate) fn scale_all(&mut self, factor: Decimal) -> Result<Decimal, RatingError> {
        let mut total_reduction = Decimal::ZERO;

        for (line, amount) in self.premiums.iter_mut() {
            let scaled = amount.checked_mul(factor).ok_or_else(|| {
                RatingError::inconsistency(format!(
                    "ledger entry {} x {} overflows",
                    line.key(),
                    factor
                ))
            })?;
            ensure_non_negative(line.key(), scaled)?;

            let reduction = round_half_up(*amount - scaled, PREMIUM_DP);
            ensure_non_negative(&line.discount_key(), reduction)?;

            *amount = round_half_up(scaled, PREMIUM_DP);
            self.discounts.insert(*line, reduction);
            total_reduction = checked_add(&line.discount_key(), total_reduction, reduction)?;
        }

        Ok(total_reduction)
    }

    pub(crate) fn record_adjustment(&mut self, adjustment: AppliedAdjustment) {
        self.adjustments.push(adjustment);
    }

    pub(crate) fn set_total(&mut self, total: Decimal) -> Result<(), RatingError> {
        ensure_non_negative(TOTAL_PREMIUM_KEY, total)?;
        self.total_premium = Some(round_half_up(total, PREMIUM_DP));
        Ok(())
    }
}

impl Serialize for CoverageLedger {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let map = self.to_map();
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (key, value) in &map {
            out.serialize_entry(key, value)?;
        }
        out.end()
    }
}

fn checked_add(key: &str, sum: Decimal, amount: Decimal) -> Result<Decimal, RatingError> {
    sum.checked_add(amount).ok_or_else(|| {
        RatingError::inconsistency(format!("ledger entry {} overflows ({} + {})", key, sum, amount))
    })
}

fn ensure_non_negative(key: &str, amount: Decimal) -> Result<(), RatingError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(RatingError::inconsistency(format!(
            "ledger entry {} would be negative ({})",
            key, amount
        )));
    }
    Ok(())
}
