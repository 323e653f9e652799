//! Error types for PDF rendering

use std::time::Duration;

use thiserror::Error;

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Errors that can occur during PDF rendering
#[derive(Error, Debug)]
pub enum PdfError {
    /// The converter program could not be started
    #[error("PDF converter not found: {0}")]
    ConverterNotFound(String),

    /// The converter ran but no PDF was produced
    #[error("PDF conversion failed: {0}")]
    ConversionFailed(String),

    /// The converter did not finish in time and was killed
    #[error("PDF conversion timed out after {0:?}")]
    Timeout(Duration),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
