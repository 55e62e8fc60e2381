// Text source abstraction for guide documents
//
// This module defines the boundary between document parsing (file ->
// page text) and rule extraction (text -> RuleSet). The abstraction
// allows different document formats while the extractors stay
// format-agnostic.

use std::path::Path;

use crate::error::ExtractError;

/// One page the source could not read, with a human-readable reason.
/// These surface in `RuleSetMetadata::processing_notes` instead of
/// failing the whole document.
#[derive(Debug, Clone)]
pub struct SkippedPage {
    pub page: u32,
    pub reason: String,
}

/// Per-page text plus the pages that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct PageExtraction {
    pub pages: Vec<String>,
    pub skipped: Vec<SkippedPage>,
}

/// TextSource trait - converts guide documents to page text
///
/// Sources handle format parsing only; everything after this point
/// works with plain strings. Document-level failures (corruption,
/// encryption) are typed `ExtractError` variants so callers can react
/// per cause; page-level failures are reported via `skipped` and never
/// abort the extraction.
pub trait TextSource {
    fn extract_pages(&self, input: &Path) -> Result<PageExtraction, ExtractError>;

    /// Source name for logging.
    fn name(&self) -> &str;

    /// Check if this source supports the given file type.
    fn supports_file_type(&self, path: &Path) -> bool;
}

/// Reads pre-converted plain text. Pages are separated by form feed
/// characters, the convention of most PDF-to-text converters; a file
/// without form feeds is a single page.
pub struct PlainTextSource;

impl TextSource for PlainTextSource {
    fn extract_pages(&self, input: &Path) -> Result<PageExtraction, ExtractError> {
        let bytes = std::fs::read(input)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| ExtractError::Corrupt("file is not valid UTF-8".to_string()))?;

        Ok(PageExtraction {
            pages: text.split('\x0c').map(str::to_string).collect(),
            skipped: Vec::new(),
        })
    }

    fn name(&self) -> &str {
        "plain-text"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("txt") | Some("text")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn form_feed_splits_pages() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "page one\x0cpage two\x0cpage three").unwrap();

        let extraction = PlainTextSource.extract_pages(file.path()).unwrap();
        assert_eq!(extraction.pages.len(), 3);
        assert_eq!(extraction.pages[1], "page two");
        assert!(extraction.skipped.is_empty());
    }

    #[test]
    fn invalid_utf8_is_corrupt() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0x41]).unwrap();

        let err = PlainTextSource.extract_pages(file.path()).unwrap_err();
        assert!(matches!(err, ExtractError::Corrupt(_)));
    }

    #[test]
    fn missing_file_maps_to_io() {
        let err = PlainTextSource
            .extract_pages(Path::new("/nonexistent/guide.txt"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }

    #[test]
    fn file_type_support() {
        assert!(PlainTextSource.supports_file_type(Path::new("guide.txt")));
        assert!(!PlainTextSource.supports_file_type(Path::new("guide.pdf")));
    }
}
