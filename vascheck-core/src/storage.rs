use crate::cache::{RuleCacheKey, RuleCacheValue};
use anyhow::{anyhow, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Storage abstraction for caching extracted rule sets
pub trait RuleSetStorage {
    fn get_rule_set(&self, cache_key: &RuleCacheKey) -> Result<Option<RuleCacheValue>>;
    fn store_rule_set(&self, cache_key: &RuleCacheKey, cache_value: &RuleCacheValue) -> Result<()>;
}

/// File-based storage implementation using local cache directory
pub struct FileStorage {
    cache_dir: String,
}

impl FileStorage {
    pub fn new(cache_dir: &str) -> Result<Self> {
        // Ensure cache directory exists
        fs::create_dir_all(cache_dir)?;
        fs::create_dir_all(format!("{cache_dir}/rulesets"))?;

        Ok(Self {
            cache_dir: cache_dir.to_string(),
        })
    }

    fn rule_set_path(&self, cache_key: &RuleCacheKey) -> String {
        format!(
            "{}/rulesets/{}.json",
            self.cache_dir,
            cache_key.to_cache_hash()
        )
    }
}

impl RuleSetStorage for FileStorage {
    fn get_rule_set(&self, cache_key: &RuleCacheKey) -> Result<Option<RuleCacheValue>> {
        let path = self.rule_set_path(cache_key);
        if Path::new(&path).exists() {
            let json_str = fs::read_to_string(path)?;
            let cache_value: RuleCacheValue = serde_json::from_str(&json_str)
                .map_err(|e| anyhow!("Failed to deserialize cached RuleCacheValue: {}", e))?;
            Ok(Some(cache_value))
        } else {
            Ok(None)
        }
    }

    fn store_rule_set(&self, cache_key: &RuleCacheKey, cache_value: &RuleCacheValue) -> Result<()> {
        let path = self.rule_set_path(cache_key);
        let json_str = serde_json::to_string_pretty(cache_value)
            .map_err(|e| anyhow!("Failed to serialize RuleCacheValue: {}", e))?;
        fs::write(path, json_str)?;
        Ok(())
    }
}

/// Calculate hash for guide text (cache key component)
pub fn calculate_text_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Calculate hash for configuration data (cache key component)
pub fn calculate_config_hash<T: serde::Serialize>(config: &T) -> Result<String> {
    let config_json = serde_json::to_string(config)
        .map_err(|e| anyhow!("Failed to serialize config for hashing: {}", e))?;

    let mut hasher = Sha256::new();
    hasher.update(config_json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// No-op storage implementation that disables all caching
pub struct NoOpStorage;

impl Default for NoOpStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl NoOpStorage {
    pub fn new() -> Self {
        Self
    }
}

impl RuleSetStorage for NoOpStorage {
    fn get_rule_set(&self, _cache_key: &RuleCacheKey) -> Result<Option<RuleCacheValue>> {
        Ok(None) // Always cache miss
    }

    fn store_rule_set(
        &self,
        _cache_key: &RuleCacheKey,
        _cache_value: &RuleCacheValue,
    ) -> Result<()> {
        Ok(()) // No-op
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RuleSet;

    #[test]
    fn test_text_hash_consistency() {
        let text = "routing guide content with hanger specs";
        assert_eq!(calculate_text_hash(text), calculate_text_hash(text));
        assert_ne!(calculate_text_hash(text), calculate_text_hash("other"));
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path().to_str().unwrap()).unwrap();

        let key = RuleCacheKey::new("texthash".to_string(), "cfghash".to_string());
        assert!(storage.get_rule_set(&key).unwrap().is_none());

        let value = RuleCacheValue::new(RuleSet::empty(), 42);
        storage.store_rule_set(&key, &value).unwrap();

        let retrieved = storage.get_rule_set(&key).unwrap().unwrap();
        assert_eq!(retrieved.processing_time_ms, 42);
        assert_eq!(retrieved.rule_set.schema_version, value.rule_set.schema_version);
    }

    #[test]
    fn test_noop_storage_always_misses() {
        let storage = NoOpStorage::new();
        let key = RuleCacheKey::new("a".to_string(), "b".to_string());
        let value = RuleCacheValue::new(RuleSet::empty(), 1);
        storage.store_rule_set(&key, &value).unwrap();
        assert!(storage.get_rule_set(&key).unwrap().is_none());
    }
}
