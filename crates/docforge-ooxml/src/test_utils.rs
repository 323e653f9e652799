//! Shared test utilities for docforge-ooxml
//!
//! In-memory DOCX fixtures used by the tests of this crate and, through the
//! `test-utils` feature, by dependent crates.

use std::io::Cursor;

use crate::archive::{OoxmlArchive, DOCUMENT_PART};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault></w:docDefaults><w:style w:type="paragraph" w:styleId="Normal" w:default="1"><w:name w:val="Normal"/></w:style><w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/></w:style></w:styles>"#;

/// Wrap body content in a `w:document` element with the usual namespaces
/// and an A4 section
pub fn wrap_body(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>{}<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr></w:body></w:document>"#,
        body
    )
}

/// Build a minimal DOCX package around `document_xml`
///
/// Besides the document part the package has content types, package and
/// document relationships, and a style sheet with `Normal` and
/// `TableGrid`.
///
/// # Example
/// ```ignore
/// use docforge_ooxml::test_utils::{create_docx, wrap_body};
/// let docx = create_docx(&wrap_body("<w:p><w:r><w:t>&lt;&lt;Name&gt;&gt;</w:t></w:r></w:p>"));
/// ```
pub fn create_docx(document_xml: &str) -> Vec<u8> {
    let mut archive = OoxmlArchive::new();
    archive.set("[Content_Types].xml", CONTENT_TYPES);
    archive.set("_rels/.rels", PACKAGE_RELS);
    archive.set("word/_rels/document.xml.rels", DOCUMENT_RELS);
    archive.set("word/styles.xml", STYLES);
    archive.set(DOCUMENT_PART, document_xml);
    archive.to_bytes().expect("in-memory DOCX package")
}

/// Read `word/document.xml` back out of a packed DOCX
pub fn extract_document_xml(docx: &[u8]) -> String {
    let archive = OoxmlArchive::from_reader(Cursor::new(docx)).expect("readable DOCX package");
    let xml = archive.document_xml().expect("document part present");
    String::from_utf8(xml.to_vec()).expect("UTF-8 document part")
}
