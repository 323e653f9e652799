//! docforge CLI - Command-line interface library
//!
//! This library provides the CLI functionality for docforge:
//! - Types: list the document types and their templates
//! - Placeholders: show what a request fills in
//! - Fill: write the filled DOCX
//! - Generate: write the filled DOCX and its PDF
//!
//! # Binary Usage
//!
//! ```bash
//! # List document types
//! docforge types
//!
//! # Generate DOCX and PDF into out/
//! docforge generate requests/offer-letter.toml --output out/
//!
//! # Fill a template without PDF conversion
//! docforge --config docforge.toml fill requests/proposal.toml -o proposal.docx
//! ```

pub mod app;

pub use app::{
    fill_command, generate_command, load_settings, placeholders_command, run_cli, types_command,
};
