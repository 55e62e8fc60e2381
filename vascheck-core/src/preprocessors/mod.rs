//! Guide Text Sources
//!
//! This module provides the preprocessing layer for converting routing
//! guide documents into plain page text that feeds into the extraction
//! pipeline.
//!
//! ## Architecture
//!
//! ```text
//! Document (plain text, converted XHTML, ...)
//!     ↓
//! [Format-specific TextSource]
//!     ↓
//! PageExtraction (pages + skipped-page notes)
//!     ↓
//! [Extraction Pipeline]
//!     ↓
//! RuleSet
//! ```
//!
//! ## Available Sources
//!
//! - `PlainTextSource` - pre-converted text files, form-feed paginated
//! - `XhtmlSource` - XHTML produced by an external PDF conversion step

pub mod source;
pub mod xhtml;

pub use source::{PageExtraction, PlainTextSource, SkippedPage, TextSource};
pub use xhtml::XhtmlSource;
