//! XHTML Text Source
//!
//! Parses the XHTML intermediate format produced by external PDF
//! conversion tools into per-page text. The format includes:
//! - Page divs with class="page"
//! - Paragraphs and spans carrying the visible text
//! - Document metadata in <meta> tags (including encryption flags)

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::ExtractError;

use super::source::{PageExtraction, SkippedPage, TextSource};

// Pre-compiled regexes for XHTML parsing performance
static PAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<div class="page"[^>]*>(.*?)</div>"#).unwrap());

static PARAGRAPH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<p[^>]*>(.*?)</p>").unwrap());

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static META_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta\s+name="([^"]*)"[^>]*content="([^"]*)"[^>]*/?>"#).unwrap()
});

/// Reads XHTML conversions of routing guide PDFs. Encrypted documents
/// are rejected up front via the `pdf:encrypted` meta tag; a page whose
/// markup yields no text at all is skipped with a note rather than
/// failing the document.
pub struct XhtmlSource;

impl TextSource for XhtmlSource {
    fn extract_pages(&self, input: &Path) -> Result<PageExtraction, ExtractError> {
        let bytes = std::fs::read(input)?;
        let xhtml = String::from_utf8(bytes)
            .map_err(|_| ExtractError::Corrupt("XHTML is not valid UTF-8".to_string()))?;

        if is_encrypted(&xhtml) {
            return Err(ExtractError::PasswordProtected);
        }
        if !xhtml.contains("<div class=\"page\"") {
            return Err(ExtractError::Corrupt(
                "no page divs found in XHTML".to_string(),
            ));
        }

        let mut extraction = PageExtraction::default();
        for (page_index, page_cap) in PAGE_REGEX.captures_iter(&xhtml).enumerate() {
            let page_number = (page_index + 1) as u32;
            let Some(page_content) = page_cap.get(1) else {
                continue;
            };

            let text = extract_page_text(page_content.as_str());
            if text.is_empty() {
                extraction.skipped.push(SkippedPage {
                    page: page_number,
                    reason: "no text content in page markup".to_string(),
                });
                continue;
            }
            extraction.pages.push(text);
        }

        Ok(extraction)
    }

    fn name(&self) -> &str {
        "xhtml"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("xhtml") | Some("html") | Some("xml")
        )
    }
}

/// Paragraph text joined by newlines, tags stripped.
fn extract_page_text(page_html: &str) -> String {
    let mut lines = Vec::new();
    for p_cap in PARAGRAPH_REGEX.captures_iter(page_html) {
        if let Some(p_content) = p_cap.get(1) {
            let stripped = TAG_REGEX.replace_all(p_content.as_str(), " ");
            let line = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
            if !line.is_empty() {
                lines.push(line);
            }
        }
    }
    lines.join("\n")
}

fn is_encrypted(xhtml: &str) -> bool {
    for cap in META_REGEX.captures_iter(xhtml) {
        if let (Some(name), Some(content)) = (cap.get(1), cap.get(2)) {
            if name.as_str() == "pdf:encrypted" && content.as_str() == "true" {
                return true;
            }
        }
    }
    false
}
