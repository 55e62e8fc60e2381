//! Compliance Rule Engine
//!
//! Stateless decision procedure: a canonical `RuleSet` plus a
//! `ProductDescriptor` in, an ordered checklist plus risk assessment
//! out. The rule set is an explicit value — there is no engine object
//! holding mutable state, so identical inputs always produce an
//! identical checklist.

use chrono::Utc;
use uuid::Uuid;

use crate::types::{
    AnalysisReport, ChecklistCategory, ChecklistItem, DemographicSegment, HangerChart, OrderType,
    OrderTypeRule, Presentation, ProductCategory, ProductDescriptor, RiskAssessment, RiskLevel,
    RuleSet, VasRule, SIZE_ORDER, WILDCARD_SEGMENT,
};

/// Standard polybag warning attached by the ecommerce override.
pub const SUFFOCATION_WARNING: &str = "WARNING – To avoid danger of suffocation; keep away from \
     babies and children. Do not use in cribs, beds or play pens. This bag is not a toy.";

/// Carton weight ceiling (lbs) forced for ecommerce orders.
pub const ECOMMERCE_MAX_CARTON_WEIGHT_LBS: u32 = 40;

/// Flat per-critical-item average used for the risk exposure figure.
/// Deliberately decoupled from the literal per-item penalty strings the
/// estimator parses; the two computations answer different questions.
const AVERAGE_PENALTY_PER_CRITICAL_USD: f64 = 275.0;

const PENALTY_HALF_DOLLAR_PER_UNIT: &str = "$0.50 per unit + $250 service fee";
const PENALTY_QUARTER_DOLLAR_PER_UNIT: &str = "$0.25 per unit + $250 service fee";
const PENALTY_PER_BILL_OF_LADING: &str = "$300 per bill of lading";
const PENALTY_PER_CARTON: &str = "$2.00 per carton + $250 service fee";

/// Analyze one product/order against a rule set.
///
/// Works even on the empty sentinel: with no usable rules the resolution
/// chain bottoms out at the conservative default (nothing hung, nothing
/// ticketed) instead of raising. Callers that want to distinguish that
/// case check `RuleSet::has_usable_rules` first.
pub fn analyze(rules: &RuleSet, product: &ProductDescriptor) -> AnalysisReport {
    let base_rules = resolve_vas_rule(rules, product.category, product.segment);
    let order_rules = rules
        .order_type_rules
        .get(product.order_type.as_str())
        .cloned()
        .unwrap_or_default();

    // The ecommerce override is unconditional and applied last: it wins
    // over whatever the category rules resolved to.
    let final_rules = if product.order_type == OrderType::Ecommerce {
        apply_ecommerce_override(base_rules)
    } else {
        base_rules
    };

    let checklist = generate_checklist(&final_rules, &order_rules, rules, product);
    let risk_assessment = assess_risk(&checklist);

    AnalysisReport {
        analysis_id: Uuid::new_v4(),
        product: product.clone(),
        vas_requirements: final_rules,
        order_requirements: order_rules,
        checklist,
        risk_assessment,
        data_source: rules.metadata.source,
        timestamp: Utc::now(),
    }
}

/// Deterministic fallback chain: exact segment → wildcard "all" →
/// engine-wide conservative default.
fn resolve_vas_rule(
    rules: &RuleSet,
    category: ProductCategory,
    segment: DemographicSegment,
) -> VasRule {
    rules
        .product_rules
        .get(category.as_str())
        .and_then(|segments| {
            segments
                .get(segment.as_str())
                .or_else(|| segments.get(WILDCARD_SEGMENT))
        })
        .cloned()
        .unwrap_or_else(VasRule::conservative_default)
}

fn apply_ecommerce_override(mut vas: VasRule) -> VasRule {
    vas.hanging.required = false; // no hangers for ecommerce
    vas.packaging.individual_polybag_required = true;
    vas.packaging.polybag_warning_text = Some(SUFFOCATION_WARNING.to_string());
    vas.packaging.max_carton_weight_lbs = Some(ECOMMERCE_MAX_CARTON_WEIGHT_LBS);
    vas
}

fn generate_checklist(
    vas: &VasRule,
    order: &OrderTypeRule,
    rules: &RuleSet,
    product: &ProductDescriptor,
) -> Vec<ChecklistItem> {
    let mut checklist = Vec::new();

    // Hanging
    if vas.hanging.required {
        let code = match &vas.hanging.hanger_type_code {
            Some(code) => code.clone(),
            None => find_hanger_type(&rules.hanger_chart, product.category, product.segment),
        };
        checklist.push(ChecklistItem {
            category: ChecklistCategory::Hanging,
            requirement: format!("Use hanger type {code}"),
            critical: true,
            penalty_if_missed: PENALTY_HALF_DOLLAR_PER_UNIT.to_string(),
        });

        if vas.hanging.sizer_required {
            checklist.push(ChecklistItem {
                category: ChecklistCategory::Hanging,
                requirement: "Apply black 4-sided secure over-hanger sizer (SOHS)".to_string(),
                critical: true,
                penalty_if_missed: PENALTY_QUARTER_DOLLAR_PER_UNIT.to_string(),
            });
        }

        if vas.hanging.presentation == Presentation::Closed && vas.hanging.tucking_required {
            let tuck = determine_tucking_type(&product.size);
            checklist.push(ChecklistItem {
                category: ChecklistCategory::Hanging,
                requirement: format!("Apply {tuck} tuck presentation"),
                critical: true,
                penalty_if_missed: PENALTY_HALF_DOLLAR_PER_UNIT.to_string(),
            });
        }
    }

    // Ticketing
    if vas.ticketing.required {
        checklist.push(ChecklistItem {
            category: ChecklistCategory::Ticketing,
            requirement: format!("Place retail ticket at: {}", vas.ticketing.location),
            critical: true,
            penalty_if_missed: PENALTY_HALF_DOLLAR_PER_UNIT.to_string(),
        });

        if vas.ticketing.retail_price_required {
            checklist.push(ChecklistItem {
                category: ChecklistCategory::Ticketing,
                requirement: "Verify retail price 30 days before DNSB4 date".to_string(),
                critical: true,
                penalty_if_missed: PENALTY_HALF_DOLLAR_PER_UNIT.to_string(),
            });
        }
    }

    // Packaging
    if vas.packaging.individual_polybag_required {
        checklist.push(ChecklistItem {
            category: ChecklistCategory::Packaging,
            requirement: "Individual polybag required for each unit".to_string(),
            critical: true,
            penalty_if_missed: PENALTY_QUARTER_DOLLAR_PER_UNIT.to_string(),
        });

        if vas.packaging.polybag_warning_text.is_some() {
            checklist.push(ChecklistItem {
                category: ChecklistCategory::Packaging,
                requirement: "Print suffocation warning on polybags".to_string(),
                critical: true,
                penalty_if_missed: PENALTY_HALF_DOLLAR_PER_UNIT.to_string(),
            });
        }
    }

    if vas.packaging.bladder_bag_required {
        checklist.push(ChecklistItem {
            category: ChecklistCategory::Packaging,
            requirement: "Use bladder bag around entire carton contents (do not seal)".to_string(),
            critical: false,
            penalty_if_missed: "N/A".to_string(),
        });
    }

    // Order type extras
    if order.packing_slip_required {
        checklist.push(ChecklistItem {
            category: ChecklistCategory::Documentation,
            requirement: "Include packing slip for each carton".to_string(),
            critical: true,
            penalty_if_missed: PENALTY_PER_BILL_OF_LADING.to_string(),
        });
    }

    if order.carton_marking_required {
        checklist.push(ChecklistItem {
            category: ChecklistCategory::Labeling,
            requirement: "Mark cartons as \"carton X of Y\"".to_string(),
            critical: true,
            penalty_if_missed: PENALTY_PER_CARTON.to_string(),
        });
    }

    checklist
}

/// Resolve a hanger code from the chart: first entry (in insertion
/// order) whose joined use-tags contain both the demographic segment and
/// the category-derived term, then fixed fallbacks per category/segment.
fn find_hanger_type(
    chart: &HangerChart,
    category: ProductCategory,
    segment: DemographicSegment,
) -> String {
    let category_name = category.as_str();
    // Non-hanging categories derive an empty term, which any tag list
    // contains; the segment test alone decides for those.
    let category_term = if category_name.contains("tops") {
        "top"
    } else if category_name.contains("bottoms") {
        "bottom"
    } else {
        ""
    };

    for spec in chart.iter() {
        let usage = spec.used_for.join(" ").to_lowercase();
        if usage.contains(segment.as_str()) && usage.contains(category_term) {
            return spec.code.clone();
        }
    }

    if category_name.contains("tops") {
        if segment == DemographicSegment::Youth {
            "485".to_string()
        } else {
            "484".to_string()
        }
    } else if category_name.contains("bottoms") {
        if segment == DemographicSegment::Mens {
            "6012".to_string()
        } else {
            "6010".to_string()
        }
    } else {
        "484".to_string()
    }
}

/// Tucking type from the ordered size scale: M and above take a double
/// tuck, XS/S a single, anything unrecognized no tuck.
pub fn determine_tucking_type(size: &str) -> &'static str {
    let lowered = size.to_lowercase();
    match SIZE_ORDER.iter().position(|s| *s == lowered) {
        Some(index) if index >= 2 => "double",
        Some(_) => "single",
        None => "no",
    }
}

fn assess_risk(checklist: &[ChecklistItem]) -> RiskAssessment {
    let critical_count = checklist.iter().filter(|item| item.critical).count();

    let risk_level = if critical_count > 5 {
        RiskLevel::High
    } else if critical_count > 2 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    RiskAssessment {
        risk_level,
        critical_requirement_count: critical_count,
        total_requirement_count: checklist.len(),
        estimated_penalty_exposure_usd: critical_count as f64 * AVERAGE_PENALTY_PER_CRITICAL_USD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Confidence, HangerSpec, Presentation, TuckingType};

    #[test]
    fn tucking_type_size_boundaries() {
        assert_eq!(determine_tucking_type("xs"), "single");
        assert_eq!(determine_tucking_type("s"), "single");
        assert_eq!(determine_tucking_type("m"), "double");
        assert_eq!(determine_tucking_type("3xl"), "double");
        assert_eq!(determine_tucking_type("XL"), "double");
        assert_eq!(determine_tucking_type("38x32"), "no");
    }

    fn chart_entry(code: &str, used_for: &[&str]) -> HangerSpec {
        HangerSpec {
            code: code.to_string(),
            display_name: format!("Hanger Type {code}"),
            description: "Standard GS1 hanger".to_string(),
            used_for: used_for.iter().map(|s| s.to_string()).collect(),
            sizer_required: true,
            presentation: Presentation::Unset,
            tucking_required: false,
            tucking_type: TuckingType::Unset,
            special_instructions: None,
            confidence: Confidence::High,
            provenance: "test".to_string(),
        }
    }

    #[test]
    fn hanger_lookup_prefers_chart_match_in_insertion_order() {
        let mut chart = HangerChart::new();
        chart.insert(chart_entry("3328", &["Outerwear"]));
        chart.insert(chart_entry("485", &["Youth Tops"]));
        chart.insert(chart_entry("484", &["Mens Tops", "Womens Tops"]));

        let code = find_hanger_type(
            &chart,
            ProductCategory::ApparelTops,
            DemographicSegment::Youth,
        );
        assert_eq!(code, "485");
    }

    #[test]
    fn hanger_lookup_falls_back_to_fixed_defaults() {
        let chart = HangerChart::new();
        assert_eq!(
            find_hanger_type(
                &chart,
                ProductCategory::ApparelBottoms,
                DemographicSegment::Mens
            ),
            "6012"
        );
        assert_eq!(
            find_hanger_type(
                &chart,
                ProductCategory::ApparelBottoms,
                DemographicSegment::Womens
            ),
            "6010"
        );
        assert_eq!(
            find_hanger_type(
                &chart,
                ProductCategory::ApparelTops,
                DemographicSegment::Youth
            ),
            "485"
        );
        assert_eq!(
            find_hanger_type(&chart, ProductCategory::Equipment, DemographicSegment::Mens),
            "484"
        );
    }

    #[test]
    fn risk_thresholds_step_at_two_and_five() {
        let item = |critical| ChecklistItem {
            category: ChecklistCategory::Packaging,
            requirement: "x".to_string(),
            critical,
            penalty_if_missed: "N/A".to_string(),
        };

        let risk = assess_risk(&vec![item(true); 2]);
        assert_eq!(risk.risk_level, RiskLevel::Low);
        let risk = assess_risk(&vec![item(true); 3]);
        assert_eq!(risk.risk_level, RiskLevel::Medium);
        let risk = assess_risk(&vec![item(true); 5]);
        assert_eq!(risk.risk_level, RiskLevel::Medium);
        let risk = assess_risk(&vec![item(true); 6]);
        assert_eq!(risk.risk_level, RiskLevel::High);
        assert_eq!(risk.estimated_penalty_exposure_usd, 6.0 * 275.0);
    }
}
