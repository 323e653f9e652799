//! DOCX Writer
//!
//! Serializes a [`Document`] back to `word/document.xml`. Content that was
//! parsed as raw XML is written verbatim; paragraphs, runs and tables are
//! rebuilt from the model.
//!
//! # Example
//!
//! ```ignore
//! use docforge_ooxml::{Document, DocxWriter};
//!
//! let doc = Document::parse(xml)?;
//! let xml = DocxWriter::write_document(&doc);
//! ```

use crate::document::{
    Block, Document, Paragraph, ParagraphChild, RowChild, Run, Table, TableCell, TableChild,
    TableRow,
};

/// Writer for the main document part
#[derive(Debug, Default)]
pub struct DocxWriter {
    /// XML output buffer
    output: String,
}

impl DocxWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize a document to XML
    pub fn write_document(doc: &Document) -> String {
        let mut writer = Self::new();
        writer.output.push_str(doc.prologue());
        writer.write_blocks(&doc.blocks);
        writer.output.push_str(doc.epilogue());
        writer.output
    }

    fn write_blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            match block {
                Block::Paragraph(p) => self.write_paragraph(p),
                Block::Table(t) => self.write_table(t),
                Block::Raw(xml) => self.output.push_str(xml),
            }
        }
    }

    fn write_paragraph(&mut self, paragraph: &Paragraph) {
        paragraph.tag().write_open(&mut self.output);
        if let Some(properties) = paragraph.properties() {
            self.output.push_str(properties);
        }
        for child in &paragraph.children {
            match child {
                ParagraphChild::Run(run) => self.write_run(run),
                ParagraphChild::Raw(xml) => self.output.push_str(xml),
            }
        }
        if !paragraph.has_runs() && !paragraph.detached_text().is_empty() {
            self.write_run(&Run::new(paragraph.detached_text()));
        }
        paragraph.tag().write_close(&mut self.output);
    }

    fn write_run(&mut self, run: &Run) {
        run.tag().write_open(&mut self.output);
        run.format.write(&mut self.output);
        run.write_content(&mut self.output);
        run.tag().write_close(&mut self.output);
    }

    fn write_table(&mut self, table: &Table) {
        table.tag().write_open(&mut self.output);
        for child in &table.children {
            match child {
                TableChild::Row(row) => self.write_row(row),
                TableChild::Raw(xml) => self.output.push_str(xml),
            }
        }
        table.tag().write_close(&mut self.output);
    }

    fn write_row(&mut self, row: &TableRow) {
        row.tag().write_open(&mut self.output);
        for child in &row.children {
            match child {
                RowChild::Cell(cell) => self.write_cell(cell),
                RowChild::Raw(xml) => self.output.push_str(xml),
            }
        }
        row.tag().write_close(&mut self.output);
    }

    fn write_cell(&mut self, cell: &TableCell) {
        cell.tag().write_open(&mut self.output);
        cell.properties.write(&mut self.output);
        self.write_blocks(&cell.blocks);
        // A cell must end with a paragraph
        if !matches!(cell.blocks.last(), Some(Block::Paragraph(_))) {
            self.output.push_str("<w:p/>");
        }
        cell.tag().write_close(&mut self.output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::VerticalAlignment;

    fn wrap(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>{}</w:body></w:document>"#,
            body
        )
    }

    #[test]
    fn test_untouched_document_roundtrips() {
        let xml = wrap(concat!(
            r#"<w:p w:rsidR="00A1"><w:pPr><w:jc w:val="center"/></w:pPr>"#,
            r#"<w:r><w:rPr><w:b/><w:sz w:val="32"/></w:rPr><w:t xml:space="preserve">Title &amp; more</w:t></w:r>"#,
            r#"<w:hyperlink r:id="rId5"><w:r><w:t>link</w:t></w:r></w:hyperlink></w:p>"#,
            r#"<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/></w:tblPr><w:tr><w:tc><w:tcPr><w:vAlign w:val="top"/></w:tcPr><w:p/></w:tc></w:tr></w:tbl>"#,
            r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#
        ));
        let doc = Document::parse(xml.as_bytes()).unwrap();
        let written = DocxWriter::write_document(&doc);

        assert_eq!(written, xml.replace("<w:p/>", "<w:p></w:p>"));
        assert_eq!(Document::parse(written.as_bytes()).unwrap(), doc);
    }

    #[test]
    fn test_modified_text_is_escaped() {
        let xml = wrap(r#"<w:p><w:r><w:t>x</w:t></w:r></w:p>"#);
        let mut doc = Document::parse(xml.as_bytes()).unwrap();
        doc.paragraphs_mut()
            .next()
            .unwrap()
            .runs_mut()
            .next()
            .unwrap()
            .set_text("A & B <C>");

        let written = DocxWriter::write_document(&doc);
        assert!(written.contains(r#"<w:t xml:space="preserve">A &amp; B &lt;C&gt;</w:t>"#));
    }

    #[test]
    fn test_detached_text_written_as_plain_run() {
        let doc = Document::from_blocks(vec![Block::Paragraph(Paragraph::with_detached_text(
            "Dear Asha",
        ))]);
        let written = DocxWriter::write_document(&doc);
        assert!(written.contains(r#"<w:p><w:r><w:t xml:space="preserve">Dear Asha</w:t></w:r></w:p>"#));
    }

    #[test]
    fn test_cell_alignment_written_in_schema_order() {
        let xml = wrap(
            r#"<w:tbl><w:tr><w:tc><w:tcPr><w:tcW w:w="100" w:type="dxa"/><w:hideMark/></w:tcPr><w:p/></w:tc></w:tr></w:tbl>"#,
        );
        let mut doc = Document::parse(xml.as_bytes()).unwrap();
        let cell = doc
            .tables_mut()
            .next()
            .unwrap()
            .rows_mut()
            .next()
            .unwrap()
            .cells_mut()
            .next()
            .unwrap();
        cell.properties.set_vertical_alignment(VerticalAlignment::Center);

        let written = DocxWriter::write_document(&doc);
        assert!(written.contains(
            r#"<w:tcPr><w:tcW w:w="100" w:type="dxa"/><w:vAlign w:val="center"/><w:hideMark/></w:tcPr>"#
        ));
    }

    #[test]
    fn test_cell_without_paragraph_gets_one() {
        let cell = TableCell::from_blocks(Vec::new());
        let table = Table::from_rows([TableRow::from_cells([cell])]);
        let written = DocxWriter::write_document(&Document::from_blocks(vec![Block::Table(table)]));
        assert!(written.contains("<w:tc><w:p/></w:tc>"));
    }
}
