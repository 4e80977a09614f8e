//! Error types for docket extraction.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading presentations or extracting dockets.
///
/// Individual date tokens that fail to parse are not errors; they are
/// skipped where they are found.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read the input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file format is not supported or could not be detected.
    #[error("Unsupported or unrecognized file format: {0}")]
    UnsupportedFormat(String),

    /// Failed to parse the PPTX file structure.
    #[error("PPTX parsing error: {0}")]
    PptxParseError(String),

    /// Invalid or corrupted file.
    #[error("Invalid or corrupted file: {0}")]
    CorruptedFile(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// The due-date lookback window is outside the supported range.
    #[error("Lookback of {0} months is out of range (0-{max})", max = crate::extract::MAX_MONTHS_BACK)]
    InvalidLookback(u32),

    /// An identifier or date pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    PatternError(#[from] regex::Error),

    /// Failed to write extracted records.
    #[error("Export error: {0}")]
    ExportError(String),
}
