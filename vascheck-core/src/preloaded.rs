//! Pre-Loaded Retailer Rules
//!
//! A built-in rule set transcribed from a major sporting goods
//! retailer's routing guide (hanger chart per its Exhibit F). Serves as
//! the fallback when no guide document has been processed, and as the
//! reference data set for tests. Everything here carries
//! `RuleSource::PreLoaded` and high confidence.

use std::collections::HashMap;

use crate::types::{
    CategoryRuleSet, Confidence, HangerChart, HangerSpec, HangingRule, OrderTypeRule,
    PackagingRule, PackingMode, Presentation, RuleSet, RuleSetMetadata, RuleSource, TicketingRule,
    TuckingType, VasRule, SCHEMA_VERSION, WILDCARD_SEGMENT,
};

const PROVENANCE: &str = "built-in";

/// The complete pre-loaded rule set.
pub fn retailer_rule_set() -> RuleSet {
    let hanger_chart = hanger_chart();
    let product_rules = product_rules();
    let order_type_rules = order_type_rules();

    let total_rules_count = hanger_chart.len()
        + product_rules.values().map(|c| c.len()).sum::<usize>()
        + order_type_rules.len();

    RuleSet {
        schema_version: SCHEMA_VERSION.to_string(),
        hanger_chart,
        product_rules,
        penalty_rules: Vec::new(),
        order_type_rules,
        metadata: RuleSetMetadata {
            source: RuleSource::PreLoaded,
            confidence: Confidence::High,
            extracted_at: None,
            total_rules_count,
            text_sample: None,
            processing_notes: Vec::new(),
        },
    }
}

fn top_hanger(code: &str, name: &str, description: &str, used_for: &[&str]) -> HangerSpec {
    HangerSpec {
        code: code.to_string(),
        display_name: name.to_string(),
        description: description.to_string(),
        used_for: used_for.iter().map(|s| s.to_string()).collect(),
        sizer_required: true,
        presentation: Presentation::Standard,
        tucking_required: false,
        tucking_type: TuckingType::Unset,
        special_instructions: None,
        confidence: Confidence::High,
        provenance: PROVENANCE.to_string(),
    }
}

fn bottom_hanger(code: &str, name: &str, description: &str, used_for: &[&str]) -> HangerSpec {
    HangerSpec {
        presentation: Presentation::Closed,
        tucking_required: true,
        ..top_hanger(code, name, description, used_for)
    }
}

fn hanger_chart() -> HangerChart {
    let mut chart = HangerChart::new();

    chart.insert(top_hanger(
        "484",
        "Standard Top Hanger",
        "Black GS1 standard hanger for tops",
        &["Mens Tops", "Womens Tops", "Life Jackets", "Wetsuits"],
    ));
    chart.insert(top_hanger(
        "485",
        "Youth Top Hanger",
        "Black GS1 standard hanger for youth tops",
        &["Youth Tops (XS-XL)", "Youth Athletic Jackets"],
    ));
    chart.insert(HangerSpec {
        special_instructions: Some(
            "Sports bras: right side up. Swim tops: upside-down (as of Jan 1, 2021)".to_string(),
        ),
        ..top_hanger(
            "498",
            "Sports Bra/Toddler Hanger",
            "Black GS1 standard hanger for sports bras and toddler items",
            &["Sports Bras", "Toddler Tops", "Swim (1 piece)"],
        )
    });
    chart.insert(top_hanger(
        "479",
        "Extended Size Hanger",
        "Black GS1 standard hanger for extended sizes",
        &["Mens Extended (3X or larger)", "Plus Size Items"],
    ));

    chart.insert(bottom_hanger(
        "6012",
        "Mens Bottom Hanger",
        "Black GS1 standard bottom hanger for mens bottoms",
        &["Mens Bottoms", "Mens Athletic Bottoms", "Hunting Pants"],
    ));
    chart.insert(HangerSpec {
        special_instructions: Some("Swim bottoms: hang upside-down as of Jan 1, 2021".to_string()),
        ..bottom_hanger(
            "6010",
            "Womens/Youth Bottom Hanger",
            "Black GS1 standard bottom hanger for womens and youth",
            &["Womens Bottoms", "Youth Bottoms", "Swim Bottoms (upside-down)"],
        )
    });
    chart.insert(HangerSpec {
        tucking_required: false,
        tucking_type: TuckingType::None,
        ..bottom_hanger(
            "6008",
            "Toddler Bottom Hanger",
            "Black GS1 standard bottom hanger for toddler sizes",
            &["Toddler Bottoms (2T-4T)"],
        )
    });
    chart.insert(bottom_hanger(
        "6014",
        "Extended Bottom Hanger",
        "Black GS1 standard bottom hanger for extended sizes",
        &["Mens Extended Bottoms (3X or larger)"],
    ));

    chart.insert(top_hanger(
        "3328",
        "Fleece/Outerwear Hanger",
        "Black GS1 standard hanger for fleece and outerwear",
        &["Fleece Tops", "Outerwear", "Hunting Jackets", "Hunting Bibs"],
    ));
    chart.insert(top_hanger(
        "3315",
        "Youth/Toddler Fleece Hanger",
        "Black GS1 standard hanger for youth and toddler fleece",
        &["Youth Fleece", "Toddler Fleece", "Youth Outerwear"],
    ));
    chart.insert(top_hanger(
        "3319",
        "Extended Fleece Hanger",
        "Black GS1 standard hanger for extended size fleece",
        &["Extended Size Fleece", "Extended Size Outerwear"],
    ));

    chart.insert(bottom_hanger(
        "7012",
        "Specialty Mens Bottom Hanger",
        "Black GS1 standard hanger for specialty mens bottoms",
        &["Hunting Pants", "Sportsman Casual Pants"],
    ));
    chart.insert(bottom_hanger(
        "7010",
        "Specialty Womens Bottom Hanger",
        "Black GS1 standard hanger for specialty womens bottoms",
        &["Hunting Pants", "Sportsman Casual Pants"],
    ));
    chart.insert(bottom_hanger(
        "7014",
        "Extended Specialty Bottom Hanger",
        "Black GS1 standard hanger for extended specialty bottoms",
        &["Extended Size Hunting Pants", "Extended Sportsman Pants"],
    ));

    chart
}

fn hung_rule(hanger_code: &str, presentation: Presentation, tucking: TuckingType) -> VasRule {
    VasRule {
        hanging: HangingRule {
            required: true,
            hanger_type_code: Some(hanger_code.to_string()),
            sizer_required: true,
            presentation,
            tucking_required: tucking != TuckingType::Unset && tucking != TuckingType::None,
            tucking_type: tucking,
        },
        ticketing: TicketingRule {
            required: true,
            ..TicketingRule::default()
        },
        packaging: PackagingRule {
            bladder_bag_required: true,
            ..PackagingRule::default()
        },
    }
}

fn product_rules() -> HashMap<String, CategoryRuleSet> {
    let mut rules = HashMap::new();

    let mut tops = CategoryRuleSet::new();
    for (segment, code) in [
        ("mens", "484"),
        ("womens", "484"),
        ("youth", "485"),
        ("toddler", "498"),
    ] {
        tops.insert(
            segment.to_string(),
            hung_rule(code, Presentation::Standard, TuckingType::Unset),
        );
    }
    rules.insert("apparel-tops".to_string(), tops);

    // Bottom tucking defaults by segment; the engine refines per size.
    let mut bottoms = CategoryRuleSet::new();
    for (segment, code, tucking) in [
        ("mens", "6012", TuckingType::Double),
        ("womens", "6010", TuckingType::Double),
        ("youth", "6010", TuckingType::Single),
        ("toddler", "6008", TuckingType::None),
    ] {
        bottoms.insert(
            segment.to_string(),
            hung_rule(code, Presentation::Closed, tucking),
        );
    }
    rules.insert("apparel-bottoms".to_string(), bottoms);

    let mut footwear = CategoryRuleSet::new();
    footwear.insert(
        WILDCARD_SEGMENT.to_string(),
        VasRule {
            hanging: HangingRule::default(),
            ticketing: TicketingRule {
                required: false,
                location: "end of box near UPC".to_string(),
                ..TicketingRule::default()
            },
            packaging: PackagingRule {
                special_requirements: Some(
                    "Unboxed footwear requires polybag and secure fastening".to_string(),
                ),
                ..PackagingRule::default()
            },
        },
    );
    rules.insert("footwear".to_string(), footwear);

    let mut accessories = CategoryRuleSet::new();
    accessories.insert(
        WILDCARD_SEGMENT.to_string(),
        VasRule {
            hanging: HangingRule::default(),
            ticketing: TicketingRule {
                required: true,
                location: "hang tag near UPC or front of package".to_string(),
                ..TicketingRule::default()
            },
            packaging: PackagingRule {
                special_requirements: Some("Varies by product type".to_string()),
                ..PackagingRule::default()
            },
        },
    );
    rules.insert("accessories".to_string(), accessories);

    let mut equipment = CategoryRuleSet::new();
    equipment.insert(WILDCARD_SEGMENT.to_string(), VasRule::conservative_default());
    rules.insert("equipment".to_string(), equipment);

    rules
}

fn order_type_rules() -> HashMap<String, OrderTypeRule> {
    let mut rules = HashMap::new();

    rules.insert(
        "bulk".to_string(),
        OrderTypeRule {
            packing_mode: PackingMode::SingleUpcPerCarton,
            casepack_rule: Some("standard casepack required".to_string()),
            ..OrderTypeRule::default()
        },
    );
    rules.insert(
        "single-store".to_string(),
        OrderTypeRule {
            packing_mode: PackingMode::MixedUpcAllowed,
            casepack_rule: Some("casepack of 1".to_string()),
            mixing_allowed: true,
            ..OrderTypeRule::default()
        },
    );
    rules.insert(
        "direct-to-store".to_string(),
        OrderTypeRule {
            packing_mode: PackingMode::MixedUpcAllowed,
            casepack_rule: Some("casepack of 1".to_string()),
            mixing_allowed: true,
            packing_slip_required: true,
            carton_marking_required: true,
            ..OrderTypeRule::default()
        },
    );
    rules.insert(
        "ecommerce".to_string(),
        OrderTypeRule {
            packing_mode: PackingMode::SingleUpcPerCarton,
            max_weight_lbs: Some(40),
            polybag_required: true,
            ..OrderTypeRule::default()
        },
    );

    rules
}
