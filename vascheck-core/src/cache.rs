use crate::types::RuleSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version constants for cache invalidation
pub mod versions {
    pub const VASCHECK_VERSION: &str = "0.1.0";
    pub const EXTRACTION_VERSION: &str = "1.0.0";
}

/// Cache key for extracted rule sets (config + guide text → RuleSet)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RuleCacheKey {
    pub text_hash: String,
    pub config_hash: String,
    pub vascheck_version: String,
    pub extraction_version: String,
}

impl RuleCacheKey {
    pub fn new(text_hash: String, config_hash: String) -> Self {
        Self {
            text_hash,
            config_hash,
            vascheck_version: versions::VASCHECK_VERSION.to_string(),
            extraction_version: versions::EXTRACTION_VERSION.to_string(),
        }
    }

    /// Compute cache key hash for storage
    pub fn to_cache_hash(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(&self.text_hash);
        hasher.update(&self.config_hash);
        hasher.update(&self.vascheck_version);
        hasher.update(&self.extraction_version);
        format!("{:x}", hasher.finalize())
    }
}

/// Cache value (rule set with extraction timing metadata)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleCacheValue {
    pub rule_set: RuleSet,
    pub created_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub cache_version: String,
}

impl RuleCacheValue {
    pub fn new(rule_set: RuleSet, processing_time_ms: u64) -> Self {
        Self {
            rule_set,
            created_at: Utc::now(),
            processing_time_ms,
            cache_version: versions::VASCHECK_VERSION.to_string(),
        }
    }
}
