//! Error types for sowdoc library.

use std::io;
use thiserror::Error;

/// Result type alias for sowdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for sowdoc library.
///
/// Malformed section text is never an error: the parser degrades it into
/// best-effort blocks. Errors only come from hand-built block trees that
/// break the model invariants, from configuration checks, and from the
/// output infrastructure (ZIP, XML, I/O, JSON).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// ZIP archive writing error.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// XML writing error.
    #[error("XML writing error: {0}")]
    XmlWrite(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// The proposal configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A block breaks a document model invariant and cannot be rendered.
    #[error("Malformed block: {0}")]
    MalformedBlock(String),

    /// The whole export failed; no output was produced.
    #[error("Failed to export {format} document: {message}")]
    ExportFailed { format: String, message: String },
}

impl Error {
    /// Wraps an infrastructure error as a whole-export failure.
    pub fn export_failed(format: impl Into<String>, source: &Error) -> Self {
        Error::ExportFailed {
            format: format.into(),
            message: source.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlWrite(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_failed_carries_message() {
        let inner = Error::ZipArchive("disk full".to_string());
        let err = Error::export_failed("docx", &inner);

        let text = err.to_string();
        assert!(text.contains("docx"));
        assert!(text.contains("disk full"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
