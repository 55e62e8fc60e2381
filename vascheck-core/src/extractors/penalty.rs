use crate::config::ExtractionConfig;
use crate::types::{PenaltyClause, PenaltyUnit};
use anyhow::Result;
use regex::Regex;

use super::context_window;

const DEFAULT_DESCRIPTION: &str = "Compliance violation";
const GENERAL_VIOLATION: &str = "general";

/// Mines penalty clauses: a currency amount immediately followed by
/// "per" (or "/") and a billing unit. All matches are kept in source
/// order — the same dollar figure legitimately recurs across violation
/// categories, so there is no deduplication.
pub struct PenaltyExtractor<'a> {
    config: &'a ExtractionConfig,
    amount_pattern: Regex,
    sentence_pattern: Regex,
}

impl<'a> PenaltyExtractor<'a> {
    pub fn new(config: &'a ExtractionConfig) -> Result<Self> {
        Ok(Self {
            config,
            amount_pattern: Regex::new(
                r"(?i)\$(\d+(?:\.\d+)?)\s*(?:per|/)\s*(unit|carton|shipment|invoice)",
            )?,
            sentence_pattern: Regex::new(r"[A-Z][^.!?]*[.!?]")?,
        })
    }

    pub fn extract(&self, text: &str) -> Vec<PenaltyClause> {
        let mut penalties = Vec::new();

        for captures in self.amount_pattern.captures_iter(text) {
            let (full, amount_str, unit_str) =
                match (captures.get(0), captures.get(1), captures.get(2)) {
                    (Some(f), Some(a), Some(u)) => (f, a, u),
                    _ => continue,
                };
            let amount_usd = match amount_str.as_str().parse::<f64>() {
                Ok(amount) => amount,
                Err(_) => continue,
            };
            let unit = match PenaltyUnit::parse(unit_str.as_str()) {
                Some(unit) => unit,
                None => continue,
            };

            let context = context_window(text, full.start(), self.config.penalty_context_window);

            penalties.push(PenaltyClause {
                amount_usd,
                unit,
                description: self.extract_description(context),
                violation_category: self.extract_violation_category(context),
            });
        }

        penalties
    }

    fn extract_description(&self, context: &str) -> String {
        self.sentence_pattern
            .find(context)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string())
    }

    /// First violation keyword present in the window classifies the
    /// clause; keyword list order is the priority order.
    fn extract_violation_category(&self, context: &str) -> String {
        let lowered = context.to_lowercase();
        self.config
            .violation_keywords
            .iter()
            .find(|keyword| lowered.contains(keyword.as_str()))
            .cloned()
            .unwrap_or_else(|| GENERAL_VIOLATION.to_string())
    }
}
