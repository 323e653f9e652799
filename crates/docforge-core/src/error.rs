//! Error types for document generation

use docforge_ooxml::OoxmlError;
use docforge_pdf::PdfError;
use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while generating a document
#[derive(Error, Debug)]
pub enum CoreError {
    /// Request data failed validation; nothing was generated
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Template could not be loaded, parsed or written
    #[error("Template error: {0}")]
    Template(#[from] OoxmlError),

    /// PDF rendering failed
    #[error("Conversion error: {0}")]
    Conversion(#[from] PdfError),

    /// Configuration file could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[source] toml::de::Error),

    /// Request file could not be parsed
    #[error("Invalid request: {0}")]
    InvalidRequest(#[source] toml::de::Error),

    /// No document type with this name exists
    #[error("Unknown document type: {0}")]
    UnknownDocumentType(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
