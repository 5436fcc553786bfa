//! Domain error types
//!
//! This module defines the error hierarchy for the anonymizer.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main anonymizer error type
///
/// This is the primary error type used throughout the library.
/// Substitution and restoration never produce errors; everything here comes
/// from configuration, detection backends, or I/O at the edges.
#[derive(Debug, Error)]
pub enum AnonymizerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Pattern catalog errors (invalid name, uncompilable or runaway regex)
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Failure reported by the external NER capability
    #[error("NER backend error: {0}")]
    Ner(String),

    /// Mapping store errors (contradictory or unreadable mapping files)
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Document adapter errors
    #[error("Document error: {0}")]
    Document(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for AnonymizerError {
    fn from(err: std::io::Error) -> Self {
        AnonymizerError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for AnonymizerError {
    fn from(err: serde_json::Error) -> Self {
        AnonymizerError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for AnonymizerError {
    fn from(err: toml::de::Error) -> Self {
        AnonymizerError::Configuration(format!("TOML parse error: {err}"))
    }
}
