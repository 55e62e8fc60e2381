use crate::config::ExtractionConfig;
use crate::types::{Confidence, HangerChart, HangerSpec, Presentation, TuckingType};
use anyhow::Result;
use regex::Regex;

use super::context_window;

/// Provenance tag stamped on every extracted record.
pub const EXTRACTOR_PROVENANCE: &str = "pattern-extractor";

const DEFAULT_DESCRIPTION: &str = "Standard GS1 hanger";
const GENERAL_USE_TAG: &str = "General Use";

/// Mines hanger-chart entries: a 3-4 digit code preceded by a
/// "hanger"/"type" keyword, with display name, description, use-tags and
/// a confidence score derived from the surrounding context window.
pub struct HangerExtractor<'a> {
    config: &'a ExtractionConfig,
    code_pattern: Regex,
    sentence_pattern: Regex,
    usage_name_pattern: Regex,
}

impl<'a> HangerExtractor<'a> {
    pub fn new(config: &'a ExtractionConfig) -> Result<Self> {
        Ok(Self {
            config,
            code_pattern: Regex::new(r"(?i)(?:hanger|type)\s*(?:code|#)?\s*(\d{3,4})")?,
            sentence_pattern: Regex::new(r"[A-Z][^.!?]*[.!?]")?,
            usage_name_pattern: Regex::new(r"(?i)(?:for|used for)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)")?,
        })
    }

    /// Scan the full text for hanger codes. A later match for the same
    /// code overwrites the earlier one (last match wins per code,
    /// position preserved).
    pub fn extract(&self, text: &str) -> HangerChart {
        let mut chart = HangerChart::new();

        for captures in self.code_pattern.captures_iter(text) {
            let code_match = match captures.get(1) {
                Some(m) => m,
                None => continue,
            };
            let code = code_match.as_str().to_string();
            let match_start = captures
                .get(0)
                .map(|m| m.start())
                .unwrap_or(code_match.start());
            let context = context_window(text, match_start, self.config.hanger_context_window);

            chart.insert(HangerSpec {
                display_name: self.extract_display_name(context, &code),
                description: self.extract_description(context),
                used_for: self.extract_usage_tags(context),
                sizer_required: context.to_lowercase().contains("sizer"),
                presentation: Presentation::Unset,
                tucking_required: false,
                tucking_type: TuckingType::Unset,
                special_instructions: None,
                confidence: self.score_confidence(context),
                provenance: EXTRACTOR_PROVENANCE.to_string(),
                code,
            });
        }

        chart
    }

    /// First capitalized phrase following the code, then a "for/used for"
    /// phrase, then a generic fallback.
    fn extract_display_name(&self, context: &str, code: &str) -> String {
        // Code is all digits, so the built pattern is always valid; the
        // Ok-check keeps the invariant local instead of relying on it.
        let near_code = format!(r"{code}[^a-zA-Z]*([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)");
        if let Ok(pattern) = Regex::new(&near_code) {
            if let Some(captures) = pattern.captures(context) {
                if let Some(name) = captures.get(1) {
                    return name.as_str().to_string();
                }
            }
        }

        if let Some(captures) = self.usage_name_pattern.captures(context) {
            if let Some(name) = captures.get(1) {
                return name.as_str().to_string();
            }
        }

        format!("Hanger Type {code}")
    }

    /// First sentence in the window, else a generic default.
    fn extract_description(&self, context: &str) -> String {
        self.sentence_pattern
            .find(context)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string())
    }

    /// Presence test against the fixed usage vocabulary; each present
    /// term is capitalized and included.
    fn extract_usage_tags(&self, context: &str) -> Vec<String> {
        let lowered = context.to_lowercase();
        let found: Vec<String> = self
            .config
            .usage_vocabulary
            .iter()
            .filter(|keyword| lowered.contains(keyword.as_str()))
            .map(|keyword| capitalize(keyword))
            .collect();

        if found.is_empty() {
            vec![GENERAL_USE_TAG.to_string()]
        } else {
            found
        }
    }

    /// Score = count of indicator terms present in the window.
    /// More than 3 is high, more than 1 medium, else low.
    fn score_confidence(&self, context: &str) -> Confidence {
        let lowered = context.to_lowercase();
        let score = self
            .config
            .confidence_indicators
            .iter()
            .filter(|indicator| lowered.contains(indicator.as_str()))
            .count();

        if score > 3 {
            Confidence::High
        } else if score > 1 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
