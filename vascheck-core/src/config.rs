use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

// Default value functions for serde
fn default_hanger_window() -> usize {
    200
}
fn default_penalty_window() -> usize {
    150
}
fn default_order_window() -> usize {
    300
}
fn default_text_sample_len() -> usize {
    200
}
fn default_usage_vocabulary() -> Vec<String> {
    ["mens", "womens", "youth", "tops", "bottoms", "outerwear"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_confidence_indicators() -> Vec<String> {
    ["hanger", "type", "required", "use", "standard"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_violation_keywords() -> Vec<String> {
    ["label", "hanger", "ticket", "packaging", "shipment"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_category_keys() -> Vec<String> {
    [
        "apparel-tops",
        "apparel-bottoms",
        "footwear",
        "accessories",
        "equipment",
        "outerwear",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_high_threshold() -> usize {
    10
}
fn default_medium_threshold() -> usize {
    5
}

/// Tunables for the pattern extractors. The defaults reproduce the
/// published extraction behavior; a YAML file can override individual
/// fields for a specific retailer's guide layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Context window radius (chars) around a hanger-code match.
    #[serde(default = "default_hanger_window")]
    pub hanger_context_window: usize,
    /// Context window radius around a penalty-amount match.
    #[serde(default = "default_penalty_window")]
    pub penalty_context_window: usize,
    /// Context window radius around an order-type synonym match.
    #[serde(default = "default_order_window")]
    pub order_context_window: usize,
    /// Length of the debugging text sample stored in metadata.
    #[serde(default = "default_text_sample_len")]
    pub text_sample_len: usize,
    /// Fixed vocabulary tested for hanger use-tags.
    #[serde(default = "default_usage_vocabulary")]
    pub usage_vocabulary: Vec<String>,
    /// Indicator terms whose presence scores hanger-match confidence.
    #[serde(default = "default_confidence_indicators")]
    pub confidence_indicators: Vec<String>,
    /// Keywords classifying a penalty clause's violation category, first
    /// match wins.
    #[serde(default = "default_violation_keywords")]
    pub violation_keywords: Vec<String>,
    /// Product category keys probed by the coarse category extractor.
    #[serde(default = "default_category_keys")]
    pub category_keys: Vec<String>,
    /// Overall extraction confidence: more than this many records is high.
    #[serde(default = "default_high_threshold")]
    pub high_confidence_threshold: usize,
    /// More than this many records is medium; at or below is low.
    #[serde(default = "default_medium_threshold")]
    pub medium_confidence_threshold: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            hanger_context_window: default_hanger_window(),
            penalty_context_window: default_penalty_window(),
            order_context_window: default_order_window(),
            text_sample_len: default_text_sample_len(),
            usage_vocabulary: default_usage_vocabulary(),
            confidence_indicators: default_confidence_indicators(),
            violation_keywords: default_violation_keywords(),
            category_keys: default_category_keys(),
            high_confidence_threshold: default_high_threshold(),
            medium_confidence_threshold: default_medium_threshold(),
        }
    }
}

impl ExtractionConfig {
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_behavior() {
        let config = ExtractionConfig::default();
        assert_eq!(config.hanger_context_window, 200);
        assert_eq!(config.penalty_context_window, 150);
        assert_eq!(config.order_context_window, 300);
        assert_eq!(config.category_keys.len(), 6);
        assert_eq!(config.confidence_indicators.len(), 5);
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let config: ExtractionConfig =
            serde_yaml::from_str("hanger_context_window: 400").unwrap();
        assert_eq!(config.hanger_context_window, 400);
        assert_eq!(config.penalty_context_window, 150);
    }
}
