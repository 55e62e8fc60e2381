use thiserror::Error;

/// Document-level extraction failures. These are fatal to the document
/// being processed; everything below this level (a single bad page, a
/// pattern that matches nothing) is recorded in rule-set metadata and
/// skipped instead.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document is corrupt or not a supported text format: {0}")]
    Corrupt(String),

    #[error("document is password protected; provide an unprotected version")]
    PasswordProtected,

    #[error("document format version is not supported: {0}")]
    VersionIncompatible(String),

    /// Every page was readable in principle but none yielded text — the
    /// document is likely image-based.
    #[error("no text could be extracted from the document")]
    NoTextExtracted,

    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction failed: {0}")]
    Unknown(String),
}
