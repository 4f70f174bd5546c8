//! Discount engine
//!
//! Walks the configured discount stack in order. A step whose precondition
//! holds scales every coverage line by its factor; steps that do not
//! trigger leave no trace in the ledger.

use tracing::debug;

use crate::config::{DiscountKind, DiscountRule, RatingConfig};
use crate::error::RatingError;
use crate::ledger::{AppliedAdjustment, CoverageLedger};
use crate::snapshot::{ApplicantSnapshot, VehicleSnapshot};

/// Facts supplied by collaborators rather than the request
///
/// Both default to false, which is also what a failed lookup resolves to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalFacts {
    pub has_other_policies: bool,
    pub is_good_driver: bool,
}

impl ExternalFacts {
    pub fn new(has_other_policies: bool, is_good_driver: bool) -> Self {
        Self {
            has_other_policies,
            is_good_driver,
        }
    }
}

/// Applies the discount stack to a base ledger
pub struct DiscountEngine<'a> {
    config: &'a RatingConfig,
}

impl<'a> DiscountEngine<'a> {
    pub fn new(config: &'a RatingConfig) -> Self {
        Self { config }
    }

    /// Applies every triggered discount and returns the adjusted ledger
    ///
    /// # Errors
    ///
    /// `InternalInconsistency` if scaling would leave a negative entry or
    /// overflow.
    pub fn apply(
        &self,
        mut ledger: CoverageLedger,
        applicant: &ApplicantSnapshot,
        vehicle: &VehicleSnapshot,
        facts: &ExternalFacts,
    ) -> Result<CoverageLedger, RatingError> {
        for rule in &self.config.discounts {
            if !Self::triggers(rule, applicant, vehicle, facts) {
                continue;
            }

            let amount = ledger.scale_all(rule.factor)?;
            debug!(
                discount = rule.kind.name(),
                factor = %rule.factor,
                amount = %amount,
                "Applied discount"
            );
            ledger.record_adjustment(AppliedAdjustment {
                kind: rule.kind,
                factor: rule.factor,
                amount,
            });
        }

        Ok(ledger)
    }

    fn triggers(
        rule: &DiscountRule,
        applicant: &ApplicantSnapshot,
        vehicle: &VehicleSnapshot,
        facts: &ExternalFacts,
    ) -> bool {
        match rule.kind {
            DiscountKind::MultiPolicy => facts.has_other_policies,
            DiscountKind::GoodDriver => facts.is_good_driver,
            DiscountKind::GoodStudent => applicant.good_student,
            DiscountKind::AntiTheft => vehicle.has_anti_theft,
            DiscountKind::SafetyFeatures => vehicle.has_safety_features(),
            DiscountKind::DefensiveDriving => applicant.completed_defensive_driving,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::CoverageLine;
    use crate::rates::RateCalculator;
    use crate::request::QuoteRequest;
    use crate::snapshot::SnapshotBuilder;
    use crate::ApplicantProfile;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 9, 1).unwrap()
    }

    fn price(config: &RatingConfig, request: QuoteRequest, facts: ExternalFacts) -> CoverageLedger {
        let (applicant, vehicle) = SnapshotBuilder::new(config).build(&request, as_of()).unwrap();
        let base = RateCalculator::new(config)
            .calculate_base_rates(&applicant, &vehicle, as_of())
            .unwrap();
        DiscountEngine::new(config)
            .apply(base, &applicant, &vehicle, &facts)
            .unwrap()
    }

    fn toyota() -> QuoteRequest {
        QuoteRequest::new("Ada Lovelace", 30, 2022, "Toyota")
    }

    #[test]
    fn test_nothing_triggers() {
        let config = RatingConfig::default();
        let ledger = price(&config, toyota(), ExternalFacts::default());

        assert!(!ledger.has_discounts());
        assert!(ledger.adjustments().is_empty());
        assert_eq!(ledger.coverage_sum().unwrap(), dec!(1430.00));
    }

    #[test]
    fn test_multi_policy_only() {
        let config = RatingConfig::default();
        let ledger = price(&config, toyota(), ExternalFacts::new(true, false));

        assert_eq!(ledger.premium(CoverageLine::Liability), Some(dec!(450.00)));
        assert_eq!(ledger.discount(CoverageLine::Liability), Some(dec!(50.00)));
        assert_eq!(ledger.premium(CoverageLine::RoadsideAssistance), Some(dec!(36.00)));
        assert_eq!(ledger.adjustments().len(), 1);
        assert_eq!(ledger.adjustments()[0].kind, DiscountKind::MultiPolicy);
        assert_eq!(ledger.adjustments()[0].amount, dec!(143.00));
    }

    #[test]
    fn test_stacked_discounts_keep_latest_annotation() {
        let config = RatingConfig::default();
        let ledger = price(&config, toyota(), ExternalFacts::new(true, true));

        // 500 x 0.9 = 450, then 450 x 0.85 = 382.50
        assert_eq!(ledger.premium(CoverageLine::Liability), Some(dec!(382.50)));
        assert_eq!(ledger.discount(CoverageLine::Liability), Some(dec!(67.50)));

        let kinds: Vec<_> = ledger.adjustments().iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![DiscountKind::MultiPolicy, DiscountKind::GoodDriver]);
    }

    #[test]
    fn test_request_driven_discounts() {
        let config = RatingConfig::default();
        let request = toyota().with_profile(ApplicantProfile {
            good_student: Some(true),
            has_anti_theft: Some(true),
            has_airbags: Some(true),
            has_anti_lock_brakes: Some(true),
            completed_defensive_driving: Some(true),
            ..Default::default()
        });
        let ledger = price(&config, request, ExternalFacts::default());

        let kinds: Vec<_> = ledger.adjustments().iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiscountKind::GoodStudent,
                DiscountKind::AntiTheft,
                DiscountKind::SafetyFeatures,
                DiscountKind::DefensiveDriving,
            ]
        );
        // 40 -> 36 -> 32.40 -> 30.78 -> 27.70
        assert_eq!(ledger.premium(CoverageLine::RoadsideAssistance), Some(dec!(27.70)));
    }

    #[test]
    fn test_airbags_alone_are_not_enough() {
        let config = RatingConfig::default();
        let request = toyota().with_profile(ApplicantProfile {
            has_airbags: Some(true),
            ..Default::default()
        });
        let ledger = price(&config, request, ExternalFacts::default());
        assert!(!ledger.has_discounts());
    }

    #[test]
    fn test_configured_order_is_respected() {
        let mut config = RatingConfig::default();
        config.discounts.reverse();
        let ledger = price(&config, toyota(), ExternalFacts::new(true, true));

        let kinds: Vec<_> = ledger.adjustments().iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![DiscountKind::GoodDriver, DiscountKind::MultiPolicy]);
        // the surviving annotation comes from the multi-policy step
        assert_eq!(ledger.discount(CoverageLine::Liability), Some(dec!(42.50)));
    }

    #[test]
    fn test_empty_stack_applies_nothing() {
        let mut config = RatingConfig::default();
        config.discounts.clear();
        let ledger = price(&config, toyota(), ExternalFacts::new(true, true));
        assert!(!ledger.has_discounts());
    }
}
