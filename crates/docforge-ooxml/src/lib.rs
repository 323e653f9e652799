//! # docforge-ooxml
//!
//! DOCX document model and placeholder substitution for docforge.
//!
//! This crate provides functionality to:
//! - Read DOCX templates and parse the main document part
//! - Replace placeholder tokens, including tokens split across runs
//! - Write the filled document back into the template package
//!
//! ## Example: Filling a Template
//!
//! ```no_run
//! use docforge_ooxml::{substitute, PlaceholderMap, Template};
//!
//! let template = Template::load("templates/Offer Letter.docx")?;
//! let mut document = template.document()?;
//!
//! let mut placeholders = PlaceholderMap::new();
//! placeholders.insert("<<E-Name>>", "Asha Rao");
//! placeholders.insert("<<Months>>", 3);
//! substitute(&mut document, &placeholders);
//!
//! std::fs::write("Offer_Letter.docx", template.into_docx(&document)?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod document;
pub mod error;
pub mod format;
pub mod substitute;
pub mod template;
pub mod writer;
mod xml;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use archive::OoxmlArchive;
pub use document::{
    Block, CellProperties, Document, Paragraph, ParagraphChild, RowChild, Run, Table, TableCell,
    TableChild, TableRow, VerticalAlignment,
};
pub use error::{OoxmlError, Result};
pub use format::{apply_run_formatting, RunFormat, Underline};
pub use substitute::{
    replace_all_occurrences, replace_placeholder, substitute, substitute_with_report,
    PlaceholderMap, Replacement, SubstitutionReport,
};
pub use template::Template;
pub use writer::DocxWriter;
pub use xml::ElementTag;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
