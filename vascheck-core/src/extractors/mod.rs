//! Pattern Extractors
//!
//! A family of independent extractors that mine a flat, whitespace-
//! normalized text blob for four rule families:
//!
//! ```text
//! Guide text (concatenated page text)
//!     ↓
//! [HangerExtractor]    → hanger chart entries
//! [PenaltyExtractor]   → penalty clauses
//! [OrderTypeExtractor] → order-type packing rules
//! [CategoryExtractor]  → coarse per-category VAS flags
//!     ↓
//! RawExtraction (normalizer input)
//! ```
//!
//! Each extractor is pure (text → records) and tolerant of partial or
//! zero matches; absence of matches yields empty collections, never an
//! error. This is a heuristic, confidence-scored pass over prose — not
//! a grammar-based parser — and precision is explicitly best-effort.

pub mod category;
pub mod hanger;
pub mod order_type;
pub mod penalty;
pub mod pipeline;

pub use category::{CategoryExtractor, RawCategoryRule};
pub use hanger::HangerExtractor;
pub use order_type::{OrderTypeExtractor, RawOrderTypeRule};
pub use penalty::PenaltyExtractor;
pub use pipeline::{ExtractionPipeline, RawExtraction};

/// Symmetric context window around a match position, clamped to char
/// boundaries so multi-byte text never panics a slice.
pub(crate) fn context_window(text: &str, index: usize, radius: usize) -> &str {
    let mut start = index.saturating_sub(radius);
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (index + radius).min(text.len());
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    &text[start..end]
}
