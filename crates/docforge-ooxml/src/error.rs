//! Error types for OOXML operations

use thiserror::Error;

/// Errors that can occur during OOXML operations
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// The template file does not exist
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Error reading or writing the ZIP archive
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing XML content
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML content is not valid UTF-8
    #[error("Invalid UTF-8 in XML content: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Required file not found in archive
    #[error("Required file not found: {0}")]
    MissingFile(String),

    /// Invalid document structure
    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl From<quick_xml::events::attributes::AttrError> for OoxmlError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        OoxmlError::Xml(e.into())
    }
}

/// Result type for OOXML operations
pub type Result<T> = std::result::Result<T, OoxmlError>;
