//! Custom Test Assertions
//!
//! Assertion helpers for ledgers and quotes that print the offending line
//! or key instead of a bare `assertion failed`.

use chrono::Duration;
use domain_rating::{CoverageLedger, CoverageLine, QuoteResult, PREMIUM_DP};
use rust_decimal::Decimal;

/// Asserts that a coverage line carries the expected premium
pub fn assert_premium(ledger: &CoverageLedger, line: CoverageLine, expected: Decimal) {
    let actual = ledger.premium(line);
    assert_eq!(
        actual,
        Some(expected),
        "Premium for {} was {:?}, expected {}",
        line,
        actual,
        expected
    );
}

/// Asserts that every coverage line is present, non-negative and at cent precision
pub fn assert_ledger_well_formed(ledger: &CoverageLedger) {
    for line in CoverageLine::ALL {
        let premium = ledger
            .premium(line)
            .unwrap_or_else(|| panic!("Ledger is missing coverage line {}", line));
        assert!(
            !premium.is_sign_negative(),
            "Premium for {} is negative: {}",
            line,
            premium
        );
        assert_eq!(
            premium.round_dp(PREMIUM_DP),
            premium,
            "Premium for {} has more than {} decimal places: {}",
            line,
            PREMIUM_DP,
            premium
        );
    }
}

/// Asserts that `totalPremium` equals the sum of the coverage lines
pub fn assert_ledger_total_matches(ledger: &CoverageLedger) {
    let total = ledger
        .total_premium()
        .expect("Ledger has no totalPremium");
    let sum = ledger
        .coverage_sum()
        .expect("Coverage lines overflow when summed");
    assert_eq!(
        total,
        sum.round_dp(PREMIUM_DP),
        "totalPremium {} doesn't equal the sum of coverage lines {}",
        total,
        sum
    );
}

/// Asserts that no `<line>Discount` key is present
pub fn assert_no_discount_keys(ledger: &CoverageLedger) {
    for line in CoverageLine::ALL {
        let key = line.discount_key();
        assert!(
            !ledger.contains_key(&key),
            "Unexpected discount annotation {} = {:?}",
            key,
            ledger.get(&key)
        );
    }
    assert!(
        ledger.adjustments().is_empty(),
        "Unexpected discounts applied: {:?}",
        ledger.adjustments()
    );
}

/// Asserts that a quote expires exactly `days` after it was created
pub fn assert_valid_for_days(quote: &QuoteResult, days: i64) {
    let window = quote.expires_at() - quote.created_at();
    assert_eq!(
        window,
        Duration::days(days),
        "Quote {} is valid for {:?}, expected {} days",
        quote.quote_id(),
        window,
        days
    );
}

/// Asserts the invariants every quote must satisfy
pub fn assert_quote_consistent(quote: &QuoteResult) {
    assert_ledger_well_formed(quote.coverages());
    assert_ledger_total_matches(quote.coverages());
    assert_eq!(
        Some(quote.total_premium().amount()),
        quote.coverages().total_premium(),
        "Quote total and ledger totalPremium disagree"
    );
    assert!(
        !quote.total_premium().is_negative(),
        "Quote {} has a negative total",
        quote.quote_id()
    );
}
