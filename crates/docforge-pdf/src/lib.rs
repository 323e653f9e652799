//! docforge-pdf - PDF rendering via an external office converter
//!
//! Filled DOCX documents are converted to PDF by running an office suite
//! (LibreOffice by default) in headless mode. The [`PdfRenderer`] trait is
//! the seam the generator depends on, so tests and alternative converters
//! can stand in for the real program.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//! use docforge_pdf::{LibreOfficeRenderer, PdfRenderer};
//!
//! let renderer = LibreOfficeRenderer::new("soffice").with_timeout(Duration::from_secs(60));
//! renderer.render(Path::new("Offer_Letter.docx"), Path::new("Offer_Letter.pdf"))?;
//! # Ok::<(), docforge_pdf::PdfError>(())
//! ```

mod error;
mod renderer;

pub use error::{PdfError, Result};
pub use renderer::{LibreOfficeRenderer, PdfRenderer, DEFAULT_PROGRAM, DEFAULT_TIMEOUT};
