use crate::config::ExtractionConfig;
use crate::types::{Confidence, HangerChart, OrderType, PenaltyClause};
use anyhow::Result;

use super::category::{CategoryExtractor, RawCategoryRule};
use super::hanger::HangerExtractor;
use super::order_type::{OrderTypeExtractor, RawOrderTypeRule};
use super::penalty::PenaltyExtractor;

/// Combined output of the four extractors, in extractor-native shape.
/// The normalizer reshapes this into the canonical `RuleSet`.
#[derive(Debug, Clone)]
pub struct RawExtraction {
    pub hanger_chart: HangerChart,
    pub category_rules: Vec<(String, RawCategoryRule)>,
    pub penalty_rules: Vec<PenaltyClause>,
    pub order_type_rules: Vec<(OrderType, RawOrderTypeRule)>,
    /// Overall label over total record count across all four extractors.
    pub confidence: Confidence,
}

impl RawExtraction {
    pub fn total_records(&self) -> usize {
        self.hanger_chart.len()
            + self.category_rules.len()
            + self.penalty_rules.len()
            + self.order_type_rules.len()
    }
}

/// Runs the four independent pattern extractors over one text blob.
/// One extractor matching nothing never blocks the others; the worst
/// case is an empty, low-confidence extraction.
pub struct ExtractionPipeline {
    config: ExtractionConfig,
}

impl ExtractionPipeline {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn run(&self, text: &str) -> Result<RawExtraction> {
        println!(
            "⚙️  Running pattern extractors over {} chars of guide text",
            text.len()
        );

        let hanger_chart = HangerExtractor::new(&self.config)?.extract(text);
        println!("   ✅ {} hanger chart entries", hanger_chart.len());

        let category_rules = CategoryExtractor::new(&self.config).extract(text);
        println!("   ✅ {} category rule records", category_rules.len());

        let penalty_rules = PenaltyExtractor::new(&self.config)?.extract(text);
        println!("   ✅ {} penalty clauses", penalty_rules.len());

        let order_type_rules = OrderTypeExtractor::new(&self.config)?.extract(text)?;
        println!("   ✅ {} order type rule records", order_type_rules.len());

        let mut extraction = RawExtraction {
            hanger_chart,
            category_rules,
            penalty_rules,
            order_type_rules,
            confidence: Confidence::Low,
        };
        extraction.confidence = self.score_confidence(extraction.total_records());
        println!(
            "📊 Extraction confidence: {:?} ({} records)",
            extraction.confidence,
            extraction.total_records()
        );

        Ok(extraction)
    }

    fn score_confidence(&self, total_records: usize) -> Confidence {
        if total_records > self.config.high_confidence_threshold {
            Confidence::High
        } else if total_records > self.config.medium_confidence_threshold {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_matches_is_not_an_error() {
        let pipeline = ExtractionPipeline::new(ExtractionConfig::default());
        let extraction = pipeline.run("").unwrap();
        assert!(extraction.hanger_chart.is_empty());
        assert!(extraction.penalty_rules.is_empty());
        assert!(extraction.order_type_rules.is_empty());
        // Category presence tests still emit their six placeholder rows.
        assert_eq!(extraction.category_rules.len(), 6);
        assert_eq!(extraction.confidence, Confidence::Medium);
    }

    #[test]
    fn rich_text_scores_high_confidence() {
        let pipeline = ExtractionPipeline::new(ExtractionConfig::default());
        let text = "Hanger type 484 for mens tops with sizer. Hanger type 485 for youth tops. \
                    Hanger type 6012 for mens bottoms. Hanger type 6010 for womens bottoms. \
                    $0.50 per unit hanger violations. $2.00 per carton marking. Bulk orders \
                    ship single sku. Tickets must show retail price.";

        let extraction = pipeline.run(text).unwrap();
        assert!(extraction.total_records() > 10);
        assert_eq!(extraction.confidence, Confidence::High);
    }
}
