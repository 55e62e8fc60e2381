//! Rule Normalizer
//!
//! Converts raw extractor output into the canonical `RuleSet` schema.
//! This is a structural reshape, not an inference step: it never invents
//! categories or hanger codes, it only nests category records under the
//! wildcard segment and fills every optional field with its explicit
//! default so the engine never branches on "missing vs false".

use chrono::Utc;
use std::collections::HashMap;

use crate::extractors::RawExtraction;
use crate::types::{
    CategoryRuleSet, HangingRule, OrderTypeRule, PackagingRule, RuleSet, RuleSetMetadata,
    RuleSource, TicketingRule, VasRule, SCHEMA_VERSION, WILDCARD_SEGMENT,
};

pub fn normalize(raw: RawExtraction) -> RuleSet {
    let total_rules_count = raw.total_records();

    let mut product_rules: HashMap<String, CategoryRuleSet> = HashMap::new();
    for (category, rule) in raw.category_rules {
        // Extractor records carry no demographic breakdown, so every
        // category nests under the wildcard segment.
        let mut segments = CategoryRuleSet::new();
        segments.insert(
            WILDCARD_SEGMENT.to_string(),
            VasRule {
                hanging: HangingRule {
                    required: rule.hanging_required,
                    ..HangingRule::default()
                },
                ticketing: TicketingRule {
                    required: rule.ticketing_required,
                    ..TicketingRule::default()
                },
                packaging: PackagingRule {
                    special_requirements: Some(rule.packaging_note),
                    ..PackagingRule::default()
                },
            },
        );
        product_rules.insert(category, segments);
    }

    let order_type_rules = raw
        .order_type_rules
        .into_iter()
        .map(|(order_type, rule)| {
            (
                order_type.as_str().to_string(),
                OrderTypeRule {
                    packing_mode: rule.packing,
                    casepack_rule: None,
                    mixing_allowed: rule.mixing,
                    packing_slip_required: rule.packing_slip_required,
                    carton_marking_required: rule.carton_marking_required,
                    max_weight_lbs: rule.max_weight_lbs,
                    polybag_required: rule.polybag_required,
                },
            )
        })
        .collect();

    RuleSet {
        schema_version: SCHEMA_VERSION.to_string(),
        hanger_chart: raw.hanger_chart,
        product_rules,
        penalty_rules: raw.penalty_rules,
        order_type_rules,
        metadata: RuleSetMetadata {
            source: RuleSource::Pdf,
            confidence: raw.confidence,
            extracted_at: Some(Utc::now()),
            total_rules_count,
            text_sample: None,
            processing_notes: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionConfig;
    use crate::extractors::ExtractionPipeline;
    use crate::types::{Confidence, Presentation, TuckingType};

    fn extract(text: &str) -> RawExtraction {
        ExtractionPipeline::new(ExtractionConfig::default())
            .run(text)
            .unwrap()
    }

    #[test]
    fn category_rules_nest_under_wildcard_segment() {
        let ruleset = normalize(extract("all apparel must hang on approved hangers"));

        let tops = ruleset.product_rules.get("apparel-tops").unwrap();
        assert_eq!(tops.len(), 1);
        let rule = tops.get(WILDCARD_SEGMENT).unwrap();
        assert!(rule.hanging.required);
        assert!(!rule.ticketing.required);
    }

    #[test]
    fn optional_fields_get_explicit_defaults() {
        let ruleset = normalize(extract("hang and ticket everything"));

        let rule = ruleset
            .product_rules
            .get("footwear")
            .and_then(|c| c.get(WILDCARD_SEGMENT))
            .unwrap();
        assert!(rule.hanging.sizer_required);
        assert_eq!(rule.hanging.presentation, Presentation::Unset);
        assert_eq!(rule.hanging.tucking_type, TuckingType::Unset);
        assert_eq!(rule.ticketing.location, "hang tag near UPC");
        assert!(rule.ticketing.retail_price_required);
        assert_eq!(
            rule.packaging.special_requirements.as_deref(),
            Some("Extracted from source")
        );
    }

    #[test]
    fn metadata_reflects_extraction() {
        let ruleset = normalize(extract(""));
        assert_eq!(ruleset.metadata.source, RuleSource::Pdf);
        assert_eq!(ruleset.metadata.confidence, Confidence::Medium);
        assert_eq!(ruleset.metadata.total_rules_count, 6);
        assert!(ruleset.metadata.extracted_at.is_some());
    }

    #[test]
    fn normalization_never_invents_hanger_codes() {
        let ruleset = normalize(extract("no hanger codes here at all"));
        assert!(ruleset.hanger_chart.is_empty());
    }
}
