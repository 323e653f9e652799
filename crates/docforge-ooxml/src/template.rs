//! Template loading and saving for DOCX templates
//!
//! A template is a complete DOCX package. Only the main document part is
//! replaced when a filled document is written; styles, headers, footers,
//! media and relationships are carried over untouched.
//!
//! # Example
//!
//! ```ignore
//! use docforge_ooxml::{substitute, PlaceholderMap, Template};
//!
//! let template = Template::load("templates/Offer Letter.docx")?;
//! let mut document = template.document()?;
//! substitute(&mut document, &placeholders);
//! let bytes = template.into_docx(&document)?;
//! ```

use std::io::Cursor;
use std::path::Path;

use tracing::debug;

use crate::archive::{OoxmlArchive, DOCUMENT_PART};
use crate::document::Document;
use crate::error::{OoxmlError, Result};
use crate::writer::DocxWriter;

/// A DOCX template
#[derive(Debug, Clone)]
pub struct Template {
    /// The underlying OOXML archive
    archive: OoxmlArchive,
}

impl Template {
    /// Load a template from a file path
    ///
    /// A path that does not exist yields [`OoxmlError::TemplateNotFound`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(OoxmlError::TemplateNotFound(path.display().to_string()));
        }
        let archive = OoxmlArchive::open(path)?;
        debug!(path = %path.display(), parts = archive.part_names().count(), "Loaded template");
        Self::from_archive(archive)
    }

    /// Load a template from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let archive = OoxmlArchive::from_reader(Cursor::new(bytes))?;
        Self::from_archive(archive)
    }

    /// Wrap an archive; it must contain a main document part
    pub fn from_archive(archive: OoxmlArchive) -> Result<Self> {
        archive.document_xml()?;
        Ok(Self { archive })
    }

    /// Get a reference to the underlying archive
    pub fn archive(&self) -> &OoxmlArchive {
        &self.archive
    }

    /// Consume the template and return the underlying archive
    pub fn into_archive(self) -> OoxmlArchive {
        self.archive
    }

    /// Parse the main document part
    pub fn document(&self) -> Result<Document> {
        Document::parse(self.archive.document_xml()?)
    }

    /// Replace the main document part with `document` and pack the package
    pub fn into_docx(mut self, document: &Document) -> Result<Vec<u8>> {
        self.archive
            .set(DOCUMENT_PART, DocxWriter::write_document(document));
        self.archive.to_bytes()
    }

    /// Write the filled package to `path`
    pub fn save<P: AsRef<Path>>(self, document: &Document, path: P) -> Result<()> {
        let bytes = self.into_docx(document)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_docx, wrap_body};

    #[test]
    fn test_load_missing_template() {
        let err = Template::load("/nonexistent/Offer Letter.docx").unwrap_err();
        match err {
            OoxmlError::TemplateNotFound(path) => assert!(path.ends_with("Offer Letter.docx")),
            other => panic!("expected TemplateNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.docx");
        std::fs::write(&path, create_docx(&wrap_body("<w:p><w:r><w:t>Hi</w:t></w:r></w:p>"))).unwrap();

        let template = Template::load(&path).unwrap();
        assert_eq!(template.document().unwrap().plain_text(), "Hi");
    }

    #[test]
    fn test_archive_without_document_part_rejected() {
        let mut archive = OoxmlArchive::new();
        archive.set("[Content_Types].xml", "<Types/>");
        let bytes = archive.to_bytes().unwrap();

        assert!(matches!(
            Template::from_bytes(&bytes),
            Err(OoxmlError::MissingFile(_))
        ));
    }

    #[test]
    fn test_into_docx_keeps_other_parts() {
        let template = Template::from_bytes(&create_docx(&wrap_body(
            "<w:p><w:r><w:t>old</w:t></w:r></w:p>",
        )))
        .unwrap();
        let mut document = template.document().unwrap();
        document
            .paragraphs_mut()
            .next()
            .unwrap()
            .runs_mut()
            .next()
            .unwrap()
            .set_text("new");

        let bytes = template.into_docx(&document).unwrap();
        let reloaded = Template::from_bytes(&bytes).unwrap();

        assert_eq!(reloaded.document().unwrap().plain_text(), "new");
        assert!(reloaded.archive().contains("word/styles.xml"));
        assert!(reloaded.archive().contains("_rels/.rels"));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("filled.docx");
        let template = Template::from_bytes(&create_docx(&wrap_body("<w:p/>"))).unwrap();
        let document = template.document().unwrap();

        template.save(&document, &out).unwrap();
        assert!(Template::load(&out).is_ok());
    }
}
