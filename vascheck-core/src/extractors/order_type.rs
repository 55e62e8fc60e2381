use crate::config::ExtractionConfig;
use crate::types::{OrderType, PackingMode};
use anyhow::Result;
use regex::Regex;

use super::context_window;

/// Accumulated packing flags for one order type, before normalization.
#[derive(Debug, Clone, Default)]
pub struct RawOrderTypeRule {
    pub packing: PackingMode,
    pub mixing: bool,
    pub packing_slip_required: bool,
    pub carton_marking_required: bool,
    pub polybag_required: bool,
    pub max_weight_lbs: Option<u32>,
}

/// Synonym phrases that signal each order type in guide prose.
fn synonyms(order_type: OrderType) -> &'static [&'static str] {
    match order_type {
        OrderType::Bulk => &["bulk", "single sku", "master case"],
        OrderType::SingleStore => &["single store", "mixed upc", "store order"],
        OrderType::DirectToStore => &["direct to store", "dts", "packing slip"],
        OrderType::Ecommerce => &["ecommerce", "e-commerce", "online", "web order"],
    }
}

/// Probes for each known order type via whitespace-flexible synonym
/// matching and accumulates packing flags from the context around every
/// synonym occurrence. An order type with no synonym present is omitted
/// entirely (missing key means no additional requirements downstream).
pub struct OrderTypeExtractor<'a> {
    config: &'a ExtractionConfig,
    weight_pattern: Regex,
}

impl<'a> OrderTypeExtractor<'a> {
    pub fn new(config: &'a ExtractionConfig) -> Result<Self> {
        Ok(Self {
            config,
            weight_pattern: Regex::new(r"(?i)(\d+)\s*(?:lb|pound)")?,
        })
    }

    pub fn extract(&self, text: &str) -> Result<Vec<(OrderType, RawOrderTypeRule)>> {
        let mut rules = Vec::new();

        for order_type in OrderType::all() {
            let patterns = compile_synonym_patterns(synonyms(order_type))?;
            if let Some(rule) = self.extract_for_type(text, &patterns) {
                rules.push((order_type, rule));
            }
        }

        Ok(rules)
    }

    /// Returns None when no synonym matches anywhere in the text.
    fn extract_for_type(&self, text: &str, patterns: &[Regex]) -> Option<RawOrderTypeRule> {
        let mut rule = RawOrderTypeRule::default();
        let mut matched = false;

        for pattern in patterns {
            for m in pattern.find_iter(text) {
                matched = true;
                let context = context_window(text, m.start(), self.config.order_context_window);
                self.accumulate_flags(context, &mut rule);
            }
        }

        if matched {
            Some(rule)
        } else {
            None
        }
    }

    fn accumulate_flags(&self, context: &str, rule: &mut RawOrderTypeRule) {
        let lowered = context.to_lowercase();

        if lowered.contains("mixed") {
            rule.mixing = true;
            rule.packing = PackingMode::MixedUpcAllowed;
        }
        if lowered.contains("single sku") {
            rule.packing = PackingMode::SingleUpcPerCarton;
        }
        if lowered.contains("packing slip") {
            rule.packing_slip_required = true;
        }
        if lowered.contains("carton") && lowered.contains("mark") {
            rule.carton_marking_required = true;
        }
        if lowered.contains("polybag") {
            rule.polybag_required = true;
        }

        // Last weight figure wins when windows overlap.
        for captures in self.weight_pattern.captures_iter(context) {
            if let Some(pounds) = captures.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
                rule.max_weight_lbs = Some(pounds);
            }
        }
    }
}

/// A synonym phrase matches across any whitespace run, case-insensitive.
fn compile_synonym_patterns(phrases: &[&str]) -> Result<Vec<Regex>> {
    phrases
        .iter()
        .map(|phrase| {
            let flexible = regex::escape(phrase)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(r"\s+");
            Ok(Regex::new(&format!("(?i){flexible}"))?)
        })
        .collect()
}
