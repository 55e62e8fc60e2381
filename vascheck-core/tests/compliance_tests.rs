//! Compliance engine boundary tests.
//!
//! These exercise the public `analyze`/`PenaltyEstimator` surface against
//! the built-in retailer rule set and the empty sentinel. The pattern
//! extractors are covered separately in `extraction_tests.rs` — here the
//! rule sets are fixed values so the engine behavior is pinned exactly.

use std::collections::BTreeMap;

use vascheck_core::engine::{analyze, SUFFOCATION_WARNING};
use vascheck_core::estimator::PenaltyEstimator;
use vascheck_core::preloaded::retailer_rule_set;
use vascheck_core::types::{
    ChecklistCategory, DemographicSegment, OrderType, ProductCategory, ProductDescriptor,
    RiskLevel, RuleSet, ShipmentQuantities, VasRule, WILDCARD_SEGMENT,
};

// ============================================================================
// Helpers
// ============================================================================

fn product(
    category: ProductCategory,
    segment: DemographicSegment,
    size: &str,
    order_type: OrderType,
) -> ProductDescriptor {
    ProductDescriptor {
        category,
        segment,
        size: size.to_string(),
        order_type,
        destination: "DC-01".to_string(),
    }
}

fn mens_bottoms(order_type: OrderType) -> ProductDescriptor {
    product(
        ProductCategory::ApparelBottoms,
        DemographicSegment::Mens,
        "l",
        order_type,
    )
}

// ============================================================================
// Deterministic analysis
// ============================================================================

mod determinism {
    use super::*;

    #[test]
    fn identical_inputs_produce_identical_checklists() {
        let rules = retailer_rule_set();
        let descriptor = mens_bottoms(OrderType::Bulk);

        let first = analyze(&rules, &descriptor);
        let second = analyze(&rules, &descriptor);

        assert_eq!(first.checklist.len(), second.checklist.len());
        for (a, b) in first.checklist.iter().zip(&second.checklist) {
            assert_eq!(a.requirement, b.requirement);
            assert_eq!(a.critical, b.critical);
            assert_eq!(a.penalty_if_missed, b.penalty_if_missed);
        }
        assert_eq!(
            first.risk_assessment.risk_level,
            second.risk_assessment.risk_level
        );
        // Only the identity fields differ between runs.
        assert_ne!(first.analysis_id, second.analysis_id);
    }
}

// ============================================================================
// Rule resolution fallback chain
// ============================================================================

mod fallback_chain {
    use super::*;

    #[test]
    fn exact_segment_wins_over_wildcard() {
        let rules = retailer_rule_set();
        let report = analyze(&rules, &mens_bottoms(OrderType::Bulk));
        assert_eq!(
            report.vas_requirements.hanging.hanger_type_code.as_deref(),
            Some("6012")
        );
    }

    #[test]
    fn missing_segment_falls_back_to_wildcard() {
        let mut rules = retailer_rule_set();
        // Footwear only defines the wildcard entry.
        let report = analyze(
            &rules,
            &product(
                ProductCategory::Footwear,
                DemographicSegment::Youth,
                "m",
                OrderType::Bulk,
            ),
        );
        assert!(!report.vas_requirements.hanging.required);
        assert_eq!(
            report.vas_requirements.ticketing.location,
            "end of box near UPC"
        );

        // Sanity: the wildcard entry really is what we resolved.
        let wildcard = rules
            .product_rules
            .get_mut("footwear")
            .and_then(|c| c.remove(WILDCARD_SEGMENT))
            .unwrap();
        assert_eq!(
            wildcard.ticketing.location,
            report.vas_requirements.ticketing.location
        );
    }

    #[test]
    fn missing_category_uses_conservative_default() {
        let mut rules = retailer_rule_set();
        rules.product_rules.remove("equipment");

        let report = analyze(
            &rules,
            &product(
                ProductCategory::Equipment,
                DemographicSegment::Mens,
                "m",
                OrderType::Bulk,
            ),
        );
        let expected = VasRule::conservative_default();
        assert!(!report.vas_requirements.hanging.required);
        assert!(!report.vas_requirements.ticketing.required);
        assert_eq!(
            report.vas_requirements.packaging.special_requirements,
            expected.packaging.special_requirements
        );
    }
}

// ============================================================================
// Scenario A/B: bulk bottoms vs ecommerce override
// ============================================================================

mod order_type_scenarios {
    use super::*;

    #[test]
    fn bulk_mens_bottoms_get_hanger_and_double_tuck() {
        let rules = retailer_rule_set();
        let report = analyze(&rules, &mens_bottoms(OrderType::Bulk));

        let hanging_items: Vec<_> = report
            .checklist
            .iter()
            .filter(|i| i.category == ChecklistCategory::Hanging)
            .collect();
        assert!(hanging_items
            .iter()
            .any(|i| i.critical && i.requirement == "Use hanger type 6012"));
        assert!(hanging_items
            .iter()
            .any(|i| i.critical && i.requirement.contains("double tuck")));
    }

    #[test]
    fn ecommerce_drops_hangers_and_adds_polybag() {
        let rules = retailer_rule_set();
        let report = analyze(&rules, &mens_bottoms(OrderType::Ecommerce));

        assert!(!report.vas_requirements.hanging.required);
        assert!(report
            .checklist
            .iter()
            .all(|i| i.category != ChecklistCategory::Hanging));

        let packaging: Vec<_> = report
            .checklist
            .iter()
            .filter(|i| i.category == ChecklistCategory::Packaging)
            .collect();
        assert!(packaging
            .iter()
            .any(|i| i.requirement.contains("Individual polybag")));
        assert!(packaging
            .iter()
            .any(|i| i.requirement.contains("suffocation warning")));
        assert_eq!(
            report
                .vas_requirements
                .packaging
                .polybag_warning_text
                .as_deref(),
            Some(SUFFOCATION_WARNING)
        );
        assert_eq!(
            report.vas_requirements.packaging.max_carton_weight_lbs,
            Some(40)
        );
    }

    #[test]
    fn direct_to_store_adds_documentation_and_labeling() {
        let rules = retailer_rule_set();
        let report = analyze(&rules, &mens_bottoms(OrderType::DirectToStore));

        assert!(report
            .checklist
            .iter()
            .any(|i| i.category == ChecklistCategory::Documentation
                && i.requirement.contains("packing slip")));
        assert!(report
            .checklist
            .iter()
            .any(|i| i.category == ChecklistCategory::Labeling
                && i.requirement.contains("carton X of Y")));
    }
}

// ============================================================================
// Scenario C: the empty sentinel
// ============================================================================

mod empty_rule_set {
    use super::*;

    #[test]
    fn empty_rules_yield_low_risk_and_no_hanging_or_ticketing() {
        let rules = RuleSet::empty();
        assert!(!rules.has_usable_rules());

        let report = analyze(&rules, &mens_bottoms(OrderType::Bulk));
        assert!(report.checklist.iter().all(|i| {
            i.category != ChecklistCategory::Hanging && i.category != ChecklistCategory::Ticketing
        }));
        assert_eq!(report.risk_assessment.risk_level, RiskLevel::Low);
        assert_eq!(report.risk_assessment.critical_requirement_count, 0);
    }
}

// ============================================================================
// Risk monotonicity
// ============================================================================

mod risk {
    use super::*;

    #[test]
    fn risk_never_decreases_as_requirements_accumulate() {
        let rules = retailer_rule_set();

        // Equipment has no hanging/ticketing: few criticals, low risk.
        let low = analyze(
            &rules,
            &product(
                ProductCategory::Equipment,
                DemographicSegment::Mens,
                "m",
                OrderType::Bulk,
            ),
        );
        // Hung and tucked bottoms on a direct-to-store order stack up
        // hanging + ticketing + documentation + labeling criticals.
        let high = analyze(&rules, &mens_bottoms(OrderType::DirectToStore));

        assert!(
            low.risk_assessment.critical_requirement_count
                < high.risk_assessment.critical_requirement_count
        );
        assert!(low.risk_assessment.risk_level <= high.risk_assessment.risk_level);
        assert_eq!(high.risk_assessment.risk_level, RiskLevel::High);
        assert_eq!(
            high.risk_assessment.estimated_penalty_exposure_usd,
            high.risk_assessment.critical_requirement_count as f64 * 275.0
        );
    }
}

// ============================================================================
// Scenario D: penalty estimation over a real checklist
// ============================================================================

mod estimation {
    use super::*;

    #[test]
    fn missed_hanger_costs_three_hundred_at_default_quantities() {
        let rules = retailer_rule_set();
        let report = analyze(&rules, &mens_bottoms(OrderType::Bulk));

        let hanger_index = report
            .checklist
            .iter()
            .position(|i| i.requirement == "Use hanger type 6012")
            .unwrap();

        let estimator = PenaltyEstimator::new().unwrap();
        let mut violations = BTreeMap::new();
        violations.insert(hanger_index, true);

        let estimate = estimator.estimate(
            &report.checklist,
            &violations,
            ShipmentQuantities::default(),
        );
        // $0.50 × 100 units + $250 service fee
        assert_eq!(estimate.total_usd, 300.0);
    }

    #[test]
    fn total_equals_sum_of_line_items() {
        let rules = retailer_rule_set();
        let report = analyze(&rules, &mens_bottoms(OrderType::DirectToStore));

        let estimator = PenaltyEstimator::new().unwrap();
        let violations: BTreeMap<usize, bool> =
            (0..report.checklist.len()).map(|i| (i, true)).collect();
        let estimate = estimator.estimate(
            &report.checklist,
            &violations,
            ShipmentQuantities::default(),
        );

        let sum: f64 = estimate.line_items.iter().map(|l| l.cost_usd).sum();
        assert_eq!(estimate.total_usd, sum);
        assert_eq!(estimate.annual_if_monthly_usd, sum * 12.0);
        assert_eq!(estimate.annual_if_weekly_usd, sum * 52.0);
    }
}
