use crate::cache::{RuleCacheKey, RuleCacheValue};
use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::extractors::ExtractionPipeline;
use crate::normalizer::normalize;
use crate::preprocessors::{PlainTextSource, TextSource, XhtmlSource};
use crate::storage::{calculate_config_hash, calculate_text_hash, FileStorage, RuleSetStorage};
use crate::types::RuleSet;
use anyhow::Result;
use std::path::Path;
use std::time::{Duration, Instant};

/// Collects wall-clock timings for the three pipeline stages when
/// profiling is requested. Disabled, it only forwards the closures.
pub struct StageTimer {
    enabled: bool,
    stages: Vec<(&'static str, Duration)>,
}

impl StageTimer {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            stages: Vec::new(),
        }
    }

    pub fn time<F, R>(&mut self, stage: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        println!("⏱️  {stage}: {:.0}ms", elapsed.as_millis());
        self.stages.push((stage, elapsed));
        result
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.stages.is_empty() {
            return;
        }

        println!("\n📊 Stage timings:");
        let total: Duration = self.stages.iter().map(|(_, d)| *d).sum();

        for (stage, duration) in &self.stages {
            let share = (duration.as_secs_f64() / total.as_secs_f64()) * 100.0;
            println!("   {stage:.<20} {:.0}ms ({share:.1}%)", duration.as_millis());
        }
        println!("   {:.<20} {:.0}ms", "total", total.as_millis());
    }
}

/// Orchestrates the full guide pipeline: document → page text →
/// extraction → canonical RuleSet, with a content-addressed cache in
/// front of the extraction stage.
pub struct GuideProcessor {
    source: Box<dyn TextSource>,
    storage: Box<dyn RuleSetStorage + Send + Sync>,
    config: ExtractionConfig,
}

impl GuideProcessor {
    /// Create GuideProcessor with full dependency injection
    pub fn new_with_dependencies(
        source: Box<dyn TextSource>,
        storage: Box<dyn RuleSetStorage + Send + Sync>,
        config: ExtractionConfig,
    ) -> Self {
        Self {
            source,
            storage,
            config,
        }
    }

    /// Convenience constructor for CLI usage: pick the source by file
    /// extension, cache under the given directory.
    pub fn new_cli(input: &Path, cache_dir: &str, config: ExtractionConfig) -> Result<Self> {
        let source: Box<dyn TextSource> = if XhtmlSource.supports_file_type(input) {
            Box::new(XhtmlSource)
        } else {
            Box::new(PlainTextSource)
        };
        let storage = Box::new(FileStorage::new(cache_dir)?);
        Ok(Self::new_with_dependencies(source, storage, config))
    }

    /// Process a guide document into a RuleSet, consulting the cache.
    pub fn process_guide(&self, input_path: &Path) -> Result<RuleSet> {
        self.process_guide_with_profiling(input_path, false, false)
    }

    /// Process with optional step timing and cache bypass.
    pub fn process_guide_with_profiling(
        &self,
        input_path: &Path,
        enable_profiling: bool,
        skip_cache: bool,
    ) -> Result<RuleSet> {
        let start_time = Instant::now();
        let mut timer = StageTimer::new(enable_profiling);

        // Stage 1: document → page text
        let extraction = timer.time("text extraction", || {
            println!(
                "📄 Extracting text via {} source: {}",
                self.source.name(),
                input_path.display()
            );
            self.source.extract_pages(input_path)
        })?;

        let text = join_pages(&extraction.pages);
        if text.is_empty() {
            return Err(ExtractError::NoTextExtracted.into());
        }

        // Cache key: guide text + extraction config + code versions
        let cache_key = RuleCacheKey::new(
            calculate_text_hash(&text),
            calculate_config_hash(&self.config)?,
        );

        if skip_cache {
            println!("🚫 Skipping cache lookup (--skip-cache enabled)");
        } else {
            // A broken cache entry should never fail the extraction.
            let cached = self.storage.get_rule_set(&cache_key).unwrap_or_else(|e| {
                println!("⚠️  Cache lookup failed, re-extracting: {e}");
                None
            });
            if let Some(cached) = cached {
                println!("🎯 Cache hit: rule set for guide text + config combination");
                println!(
                    "⏱️  Total processing time: {:.0}ms (cached)",
                    start_time.elapsed().as_millis()
                );
                return Ok(cached.rule_set);
            }
        }

        // Stage 2: text → raw extraction → canonical RuleSet
        let raw = timer.time("pattern extraction", || {
            ExtractionPipeline::new(self.config.clone()).run(&text)
        })?;
        let mut rule_set = timer.time("normalization", || normalize(raw));

        rule_set.metadata.text_sample = Some(text_sample(&text, self.config.text_sample_len));
        for skipped in &extraction.skipped {
            rule_set
                .metadata
                .processing_notes
                .push(format!("page {} skipped: {}", skipped.page, skipped.reason));
        }

        if !skip_cache {
            let processing_time = start_time.elapsed().as_millis() as u64;
            let cache_value = RuleCacheValue::new(rule_set.clone(), processing_time);
            if let Err(e) = self.storage.store_rule_set(&cache_key, &cache_value) {
                println!("⚠️  Cache storage failed: {e}");
            }
        }

        timer.print_summary();
        println!(
            "⏱️  Total processing time: {:.0}ms",
            start_time.elapsed().as_millis()
        );
        Ok(rule_set)
    }
}

/// Collapse whitespace runs within each page, drop blank pages, join
/// with blank lines. Guide PDFs convert with erratic spacing and the
/// extractors assume single-spaced prose.
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// First `max_chars` of the text (clamped to a char boundary) with an
/// ellipsis when truncated.
fn text_sample(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let sample: String = text.chars().take(max_chars).collect();
    format!("{sample}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::NoOpStorage;
    use std::io::Write;

    fn processor() -> GuideProcessor {
        GuideProcessor::new_with_dependencies(
            Box::new(PlainTextSource),
            Box::new(NoOpStorage::new()),
            ExtractionConfig::default(),
        )
    }

    #[test]
    fn disabled_timer_forwards_closures_without_recording() {
        let mut timer = StageTimer::new(false);
        let value = timer.time("anything", || 7);
        assert_eq!(value, 7);
        assert!(timer.stages.is_empty());
    }

    #[test]
    fn enabled_timer_records_stages_in_order() {
        let mut timer = StageTimer::new(true);
        timer.time("text extraction", || ());
        timer.time("normalization", || ());
        assert_eq!(timer.stages.len(), 2);
        assert_eq!(timer.stages[0].0, "text extraction");
        assert_eq!(timer.stages[1].0, "normalization");
    }

    #[test]
    fn whitespace_is_normalized_before_extraction() {
        assert_eq!(
            join_pages(&["  hanger\n\ttype   484 ".to_string(), String::new()]),
            "hanger type 484"
        );
    }

    #[test]
    fn text_sample_truncates_with_ellipsis() {
        assert_eq!(text_sample("short", 200), "short");
        assert_eq!(text_sample("abcdef", 3), "abc...");
    }

    #[test]
    fn empty_document_is_a_typed_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "   \n\t  ").unwrap();

        let err = processor().process_guide(file.path()).unwrap_err();
        let extract_err = err.downcast_ref::<ExtractError>().unwrap();
        assert!(matches!(extract_err, ExtractError::NoTextExtracted));
    }

    #[test]
    fn full_pipeline_produces_rule_set_with_sample() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "Hanger type 484 for mens tops. Violations: $0.50 per unit for hanger errors."
        )
        .unwrap();

        let rule_set = processor().process_guide(file.path()).unwrap();
        assert_eq!(rule_set.hanger_chart.len(), 1);
        assert!(!rule_set.penalty_rules.is_empty());
        assert!(rule_set
            .metadata
            .text_sample
            .as_deref()
            .unwrap()
            .starts_with("Hanger type 484"));
    }
}
