// Vascheck Core Library
//
// Provides routing guide rule extraction and VAS compliance analysis.
// Main interface for converting guide text to rule sets, checking
// products against them, and estimating penalty exposure.

pub mod types;
pub mod error;
pub mod config;
pub mod preprocessors;
pub mod extractors;
pub mod normalizer;
pub mod processor;
pub mod engine;
pub mod estimator;
pub mod preloaded;
pub mod cache;
pub mod storage;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::ExtractError;
pub use config::ExtractionConfig;
pub use preprocessors::{PlainTextSource, TextSource, XhtmlSource};
pub use processor::GuideProcessor;
pub use engine::analyze;
pub use estimator::PenaltyEstimator;
pub use preloaded::retailer_rule_set;
