//! Domain error types
//!
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main error type
///
/// This is the primary error type used throughout the crate. Per-group and
/// per-batch failures inside an orchestrator run are reported as data instead
/// (see [`crate::core::orchestrator::GenerationError`] and
/// [`crate::domain::batch::SigningOutcome`]).
#[derive(Debug, Error)]
pub enum BatcherError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Persistence collaborator errors
    #[error("Record source error: {0}")]
    Source(String),

    /// No insurer metadata for a group's insurer id
    #[error("Health insurer not found: {0}")]
    InsurerNotFound(String),

    /// Document assembly errors
    #[error("Document error: {0}")]
    Document(String),

    /// Signing adapter errors
    #[error("Signing failed: {0}")]
    Signing(#[from] SigningError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Signing adapter errors
///
/// Returned by [`crate::adapters::DocumentSigner`] implementations.
#[derive(Debug, Clone, Error)]
pub enum SigningError {
    /// Private key could not be parsed or used
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// Certificate could not be parsed or does not match the key
    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),

    /// Document could not be canonicalized or is not well-formed
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Any other failure inside the signing primitive
    #[error("{0}")]
    Failed(String),
}

impl From<std::io::Error> for BatcherError {
    fn from(err: std::io::Error) -> Self {
        BatcherError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BatcherError {
    fn from(err: serde_json::Error) -> Self {
        BatcherError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for BatcherError {
    fn from(err: toml::de::Error) -> Self {
        BatcherError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<quick_xml::Error> for BatcherError {
    fn from(err: quick_xml::Error) -> Self {
        BatcherError::Document(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for BatcherError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        BatcherError::Document(format!("Document is not valid UTF-8: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BatcherError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");

        let err = BatcherError::InsurerNotFound("ins-9".to_string());
        assert_eq!(err.to_string(), "Health insurer not found: ins-9");
    }

    #[test]
    fn test_signing_error_conversion() {
        let signing_err = SigningError::InvalidKey("not a PEM".to_string());
        let err: BatcherError = signing_err.into();
        assert!(matches!(err, BatcherError::Signing(_)));
        assert_eq!(err.to_string(), "Signing failed: Invalid private key: not a PEM");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: BatcherError = io_err.into();
        assert!(matches!(err, BatcherError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: BatcherError = json_err.into();
        assert!(matches!(err, BatcherError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: BatcherError = toml_err.into();
        assert!(matches!(err, BatcherError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_utf8_error_conversion() {
        let utf8_err = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err: BatcherError = utf8_err.into();
        assert!(matches!(err, BatcherError::Document(_)));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let err = BatcherError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;

        let err = SigningError::Failed("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
