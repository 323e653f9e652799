//! Document content model (word/document.xml)
//!
//! This module parses the main document part into a mutable tree of
//! paragraphs, runs and tables. Elements the model does not interpret
//! (section properties, hyperlinks, bookmarks, drawings, ...) are kept as
//! raw XML and written back unchanged by [`crate::writer::DocxWriter`].

use quick_xml::events::{BytesStart, Event};

use crate::error::{OoxmlError, Result};
use crate::format::RunFormat;
use crate::xml::{ElementTag, PropertySet, XmlCursor};

const DEFAULT_PROLOGUE: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    "<w:body>"
);

const DEFAULT_EPILOGUE: &str = "</w:body></w:document>";

/// A parsed Word document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Source text up to and including the `<w:body>` start tag
    prologue: String,
    /// Document body blocks
    pub blocks: Vec<Block>,
    /// Source text from the `</w:body>` end tag onwards
    epilogue: String,
}

/// Block-level elements
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A paragraph
    Paragraph(Paragraph),
    /// A table
    Table(Table),
    /// Any other body element, kept verbatim
    Raw(String),
}

/// A paragraph with its runs
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    tag: ElementTag,
    /// Paragraph properties (`w:pPr`), kept verbatim
    properties: Option<String>,
    /// Children (runs and opaque inline content)
    pub children: Vec<ParagraphChild>,
    /// Text stored on a paragraph that has no runs
    detached_text: String,
}

/// Child elements of a paragraph
#[derive(Debug, Clone, PartialEq)]
pub enum ParagraphChild {
    /// A text run
    Run(Run),
    /// Hyperlinks, bookmarks, proofing marks and other inline content
    Raw(String),
}

/// A text run with formatting
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    tag: ElementTag,
    /// Run properties
    pub format: RunFormat,
    content: Vec<RunContent>,
}

#[derive(Debug, Clone, PartialEq)]
enum RunContent {
    Text(String),
    Tab,
    Break,
    NoBreakHyphen,
    SoftHyphen,
    /// `w:ptab`, read as a tab; kept verbatim until the text is replaced
    PositionalTab(String),
    /// Drawings, symbols, field characters, page breaks and similar
    Raw(String),
}

const NO_BREAK_HYPHEN: char = '\u{2011}';
const SOFT_HYPHEN: char = '\u{00AD}';

/// Stands for one piece of non-text run content in [`Paragraph::marked_text`]
pub(crate) const OBJECT_MARK: char = '\u{FFFC}';

/// A table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    tag: ElementTag,
    /// Rows, plus table properties and grid kept verbatim
    pub children: Vec<TableChild>,
}

/// Child elements of a table
#[derive(Debug, Clone, PartialEq)]
pub enum TableChild {
    Row(TableRow),
    Raw(String),
}

/// A table row
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    tag: ElementTag,
    /// Cells, plus row properties kept verbatim
    pub children: Vec<RowChild>,
}

/// Child elements of a table row
#[derive(Debug, Clone, PartialEq)]
pub enum RowChild {
    Cell(TableCell),
    Raw(String),
}

/// A table cell
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    tag: ElementTag,
    /// Cell properties
    pub properties: CellProperties,
    /// Paragraphs and nested tables in document order
    pub blocks: Vec<Block>,
}

/// Vertical alignment of cell content (`w:vAlign`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlignment {
    Top,
    Center,
    Bottom,
    Both,
}

impl VerticalAlignment {
    fn from_val(val: &str) -> Option<Self> {
        match val {
            "top" => Some(VerticalAlignment::Top),
            "center" => Some(VerticalAlignment::Center),
            "bottom" => Some(VerticalAlignment::Bottom),
            "both" => Some(VerticalAlignment::Both),
            _ => None,
        }
    }

    fn as_val(self) -> &'static str {
        match self {
            VerticalAlignment::Top => "top",
            VerticalAlignment::Center => "center",
            VerticalAlignment::Bottom => "bottom",
            VerticalAlignment::Both => "both",
        }
    }
}

/// Child order of `w:tcPr` (CT_TcPr sequence)
const CELL_PROPERTY_ORDER: &[&str] = &[
    "cnfStyle",
    "tcW",
    "gridSpan",
    "hMerge",
    "vMerge",
    "tcBorders",
    "shd",
    "noWrap",
    "tcMar",
    "textDirection",
    "tcFitText",
    "vAlign",
    "hideMark",
    "headers",
    "cellIns",
    "cellDel",
    "cellMerge",
    "tcPrChange",
];

/// Cell properties (`w:tcPr`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellProperties {
    properties: PropertySet,
}

impl CellProperties {
    /// Vertical alignment; `None` when unset or unrecognized
    pub fn vertical_alignment(&self) -> Option<VerticalAlignment> {
        self.properties
            .find("vAlign")
            .and_then(|t| t.attr("val"))
            .and_then(|v| VerticalAlignment::from_val(&v))
    }

    pub fn set_vertical_alignment(&mut self, alignment: VerticalAlignment) {
        self.properties.set(
            ElementTag::new("vAlign").with_attr("val", alignment.as_val()),
            CELL_PROPERTY_ORDER,
        );
    }

    pub(crate) fn write(&self, out: &mut String) {
        self.properties.write("tcPr", out);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with a standard `w:document` wrapper
    pub fn new() -> Self {
        Self::from_blocks(Vec::new())
    }

    /// Create a document from body blocks
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self {
            prologue: DEFAULT_PROLOGUE.to_string(),
            blocks,
            epilogue: DEFAULT_EPILOGUE.to_string(),
        }
    }

    /// Parse a document from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut cursor = XmlCursor::new(xml);

        loop {
            let (start, event) = cursor.next()?;
            match event {
                Event::Start(e) if e.local_name().as_ref() == b"body" => {
                    let prologue = cursor.slice(0, cursor.position())?.to_string();
                    let (blocks, body_end) = parse_blocks(&mut cursor)?;
                    let epilogue = cursor.slice(body_end, xml.len())?.to_string();
                    return Ok(Self {
                        prologue,
                        blocks,
                        epilogue,
                    });
                }
                Event::Empty(e) if e.local_name().as_ref() == b"body" => {
                    // <w:body/>: expand so that blocks can be appended
                    let tag = ElementTag::from_start(&e)?;
                    let mut prologue = cursor.slice(0, start)?.to_string();
                    tag.write_open(&mut prologue);
                    let mut epilogue = String::new();
                    tag.write_close(&mut epilogue);
                    epilogue.push_str(cursor.slice(cursor.position(), xml.len())?);
                    return Ok(Self {
                        prologue,
                        blocks: Vec::new(),
                        epilogue,
                    });
                }
                Event::Eof => {
                    return Err(OoxmlError::InvalidStructure(
                        "document has no <w:body> element".to_string(),
                    ))
                }
                _ => {}
            }
        }
    }

    pub(crate) fn prologue(&self) -> &str {
        &self.prologue
    }

    pub(crate) fn epilogue(&self) -> &str {
        &self.epilogue
    }

    /// Top-level paragraphs in document order
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        paragraphs_of(&self.blocks)
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        paragraphs_of_mut(&mut self.blocks)
    }

    /// Top-level tables in document order
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        tables_of(&self.blocks)
    }

    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        tables_of_mut(&mut self.blocks)
    }

    /// Plain text of all top-level paragraphs and table cells, one line per paragraph
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        collect_text(&self.blocks, &mut lines);
        lines.join("\n")
    }
}

fn collect_text(blocks: &[Block], lines: &mut Vec<String>) {
    for block in blocks {
        match block {
            Block::Paragraph(p) => lines.push(p.text()),
            Block::Table(t) => {
                for cell in t.rows().flat_map(|r| r.cells()) {
                    collect_text(&cell.blocks, lines);
                }
            }
            Block::Raw(_) => {}
        }
    }
}

fn paragraphs_of(blocks: &[Block]) -> impl Iterator<Item = &Paragraph> {
    blocks.iter().filter_map(|block| match block {
        Block::Paragraph(p) => Some(p),
        _ => None,
    })
}

fn paragraphs_of_mut(blocks: &mut [Block]) -> impl Iterator<Item = &mut Paragraph> {
    blocks.iter_mut().filter_map(|block| match block {
        Block::Paragraph(p) => Some(p),
        _ => None,
    })
}

fn tables_of(blocks: &[Block]) -> impl Iterator<Item = &Table> {
    blocks.iter().filter_map(|block| match block {
        Block::Table(t) => Some(t),
        _ => None,
    })
}

fn tables_of_mut(blocks: &mut [Block]) -> impl Iterator<Item = &mut Table> {
    blocks.iter_mut().filter_map(|block| match block {
        Block::Table(t) => Some(t),
        _ => None,
    })
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Paragraph {
    /// Create an empty paragraph
    pub fn new() -> Self {
        Self {
            tag: ElementTag::new("p"),
            properties: None,
            children: Vec::new(),
            detached_text: String::new(),
        }
    }

    /// Create a paragraph from runs
    pub fn from_runs(runs: impl IntoIterator<Item = Run>) -> Self {
        let mut paragraph = Self::new();
        paragraph
            .children
            .extend(runs.into_iter().map(ParagraphChild::Run));
        paragraph
    }

    /// Create a paragraph that stores its text without runs
    pub fn with_detached_text(text: impl Into<String>) -> Self {
        let mut paragraph = Self::new();
        paragraph.detached_text = text.into();
        paragraph
    }

    /// Visible text: the concatenated run text, or the detached text when
    /// the paragraph has no runs
    pub fn text(&self) -> String {
        if self.has_runs() {
            self.runs().map(|r| r.text()).collect()
        } else {
            self.detached_text.clone()
        }
    }

    /// Like [`Paragraph::text`], with [`OBJECT_MARK`] where a run holds
    /// non-text content
    pub(crate) fn marked_text(&self) -> String {
        if self.has_runs() {
            self.runs().map(|r| r.marked_text()).collect()
        } else {
            self.detached_text.clone()
        }
    }

    pub(crate) fn detached_text(&self) -> &str {
        &self.detached_text
    }

    pub(crate) fn set_detached_text(&mut self, text: String) {
        self.detached_text = text;
    }

    pub(crate) fn properties(&self) -> Option<&str> {
        self.properties.as_deref()
    }

    pub(crate) fn tag(&self) -> &ElementTag {
        &self.tag
    }

    pub fn has_runs(&self) -> bool {
        self.runs().next().is_some()
    }

    /// Direct runs of this paragraph (runs inside hyperlinks are not included)
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.children.iter().filter_map(|child| match child {
            ParagraphChild::Run(run) => Some(run),
            ParagraphChild::Raw(_) => None,
        })
    }

    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut Run> {
        self.children.iter_mut().filter_map(|child| match child {
            ParagraphChild::Run(run) => Some(run),
            ParagraphChild::Raw(_) => None,
        })
    }

    /// Append a run and return it for formatting
    pub fn add_run(&mut self, text: impl Into<String>) -> &mut Run {
        self.children.push(ParagraphChild::Run(Run::new(text)));
        match self.children.last_mut() {
            Some(ParagraphChild::Run(run)) => run,
            _ => unreachable!("run pushed above"),
        }
    }
}

impl Run {
    /// Create an unformatted run
    pub fn new(text: impl Into<String>) -> Self {
        let mut run = Self {
            tag: ElementTag::new("r"),
            format: RunFormat::new(),
            content: Vec::new(),
        };
        run.set_text(&text.into());
        run
    }

    /// Run text; tabs read as `\t`, line breaks as `\n`, non-breaking and
    /// soft hyphens as U+2011 and U+00AD
    pub fn text(&self) -> String {
        self.content.iter().filter_map(RunContent::as_text).collect()
    }

    pub(crate) fn marked_text(&self) -> String {
        let mut text = String::new();
        for item in &self.content {
            match item.as_text() {
                Some(t) => text.push_str(t),
                None => text.push(OBJECT_MARK),
            }
        }
        text
    }

    /// Replace the run text. Non-text content such as drawings is kept.
    pub fn set_text(&mut self, text: &str) {
        self.content.retain(|c| matches!(c, RunContent::Raw(_)));
        self.push_text(text, &mut std::iter::empty::<String>());
    }

    /// Empty the run, returning its non-text content in order
    pub(crate) fn take_objects(&mut self) -> Vec<String> {
        std::mem::take(&mut self.content)
            .into_iter()
            .filter_map(|c| match c {
                RunContent::Raw(xml) => Some(xml),
                _ => None,
            })
            .collect()
    }

    /// Append text; each [`OBJECT_MARK`] is replaced by the next piece of
    /// `objects`, or kept as a character once they run out
    pub(crate) fn push_text(&mut self, text: &str, objects: &mut dyn Iterator<Item = String>) {
        let mut segment = String::new();
        for ch in text.chars() {
            let item = match ch {
                '\t' => RunContent::Tab,
                '\n' => RunContent::Break,
                NO_BREAK_HYPHEN => RunContent::NoBreakHyphen,
                SOFT_HYPHEN => RunContent::SoftHyphen,
                OBJECT_MARK => match objects.next() {
                    Some(xml) => RunContent::Raw(xml),
                    None => {
                        segment.push(ch);
                        continue;
                    }
                },
                _ => {
                    segment.push(ch);
                    continue;
                }
            };
            if !segment.is_empty() {
                self.content.push(RunContent::Text(std::mem::take(&mut segment)));
            }
            self.content.push(item);
        }
        if !segment.is_empty() {
            self.content.push(RunContent::Text(segment));
        }
    }

    pub(crate) fn tag(&self) -> &ElementTag {
        &self.tag
    }

    pub(crate) fn write_content(&self, out: &mut String) {
        for item in &self.content {
            match item {
                RunContent::Text(text) => {
                    out.push_str("<w:t xml:space=\"preserve\">");
                    out.push_str(&crate::xml::escape_xml(text));
                    out.push_str("</w:t>");
                }
                RunContent::Tab => out.push_str("<w:tab/>"),
                RunContent::Break => out.push_str("<w:br/>"),
                RunContent::NoBreakHyphen => out.push_str("<w:noBreakHyphen/>"),
                RunContent::SoftHyphen => out.push_str("<w:softHyphen/>"),
                RunContent::PositionalTab(xml) | RunContent::Raw(xml) => out.push_str(xml),
            }
        }
    }
}

impl RunContent {
    fn as_text(&self) -> Option<&str> {
        match self {
            RunContent::Text(t) => Some(t.as_str()),
            RunContent::Tab | RunContent::PositionalTab(_) => Some("\t"),
            RunContent::Break => Some("\n"),
            RunContent::NoBreakHyphen => Some("\u{2011}"),
            RunContent::SoftHyphen => Some("\u{00AD}"),
            RunContent::Raw(_) => None,
        }
    }
}

impl Table {
    /// Create a table from rows
    pub fn from_rows(rows: impl IntoIterator<Item = TableRow>) -> Self {
        Self {
            tag: ElementTag::new("tbl"),
            children: rows.into_iter().map(TableChild::Row).collect(),
        }
    }

    pub(crate) fn tag(&self) -> &ElementTag {
        &self.tag
    }

    pub fn rows(&self) -> impl Iterator<Item = &TableRow> {
        self.children.iter().filter_map(|child| match child {
            TableChild::Row(row) => Some(row),
            TableChild::Raw(_) => None,
        })
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut TableRow> {
        self.children.iter_mut().filter_map(|child| match child {
            TableChild::Row(row) => Some(row),
            TableChild::Raw(_) => None,
        })
    }
}

impl TableRow {
    /// Create a row from cells
    pub fn from_cells(cells: impl IntoIterator<Item = TableCell>) -> Self {
        Self {
            tag: ElementTag::new("tr"),
            children: cells.into_iter().map(RowChild::Cell).collect(),
        }
    }

    pub(crate) fn tag(&self) -> &ElementTag {
        &self.tag
    }

    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.children.iter().filter_map(|child| match child {
            RowChild::Cell(cell) => Some(cell),
            RowChild::Raw(_) => None,
        })
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut TableCell> {
        self.children.iter_mut().filter_map(|child| match child {
            RowChild::Cell(cell) => Some(cell),
            RowChild::Raw(_) => None,
        })
    }
}

impl TableCell {
    /// Create a cell from blocks (paragraphs and nested tables)
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self {
            tag: ElementTag::new("tc"),
            properties: CellProperties::default(),
            blocks,
        }
    }

    pub(crate) fn tag(&self) -> &ElementTag {
        &self.tag
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        paragraphs_of(&self.blocks)
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        paragraphs_of_mut(&mut self.blocks)
    }

    /// Tables nested directly inside this cell
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        tables_of(&self.blocks)
    }

    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        tables_of_mut(&mut self.blocks)
    }
}

// Parsing

/// Parse block content up to the end tag of the enclosing element.
/// Returns the blocks and the offset where the end tag starts.
fn parse_blocks(cursor: &mut XmlCursor<'_>) -> Result<(Vec<Block>, usize)> {
    let mut blocks = Vec::new();
    loop {
        let (start, event) = cursor.next()?;
        match event {
            Event::Start(e) => blocks.push(parse_block(cursor, start, &e)?),
            Event::Empty(e) => blocks.push(empty_block(cursor, start, &e)?),
            Event::End(_) => return Ok((blocks, start)),
            Event::Eof => return Err(unexpected_eof("w:body")),
            _ => {}
        }
    }
}

fn parse_block(cursor: &mut XmlCursor<'_>, start: usize, e: &BytesStart) -> Result<Block> {
    Ok(match e.local_name().as_ref() {
        b"p" => Block::Paragraph(parse_paragraph(cursor, ElementTag::from_start(e)?)?),
        b"tbl" => Block::Table(parse_table(cursor, ElementTag::from_start(e)?)?),
        _ => Block::Raw(cursor.capture(start, e)?),
    })
}

fn empty_block(cursor: &XmlCursor<'_>, start: usize, e: &BytesStart) -> Result<Block> {
    Ok(match e.local_name().as_ref() {
        b"p" => {
            let mut paragraph = Paragraph::new();
            paragraph.tag = ElementTag::from_start(e)?;
            Block::Paragraph(paragraph)
        }
        _ => Block::Raw(cursor.raw_since(start)?),
    })
}

fn parse_paragraph(cursor: &mut XmlCursor<'_>, tag: ElementTag) -> Result<Paragraph> {
    let mut paragraph = Paragraph::new();
    paragraph.tag = tag;

    loop {
        let (start, event) = cursor.next()?;
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"pPr" => paragraph.properties = Some(cursor.capture(start, &e)?),
                b"r" => {
                    let run = parse_run(cursor, ElementTag::from_start(&e)?)?;
                    paragraph.children.push(ParagraphChild::Run(run));
                }
                _ => {
                    let raw = cursor.capture(start, &e)?;
                    paragraph.children.push(ParagraphChild::Raw(raw));
                }
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"pPr" => paragraph.properties = Some(cursor.raw_since(start)?),
                b"r" => {
                    let mut run = Run::new("");
                    run.tag = ElementTag::from_start(&e)?;
                    paragraph.children.push(ParagraphChild::Run(run));
                }
                _ => paragraph
                    .children
                    .push(ParagraphChild::Raw(cursor.raw_since(start)?)),
            },
            Event::End(_) => return Ok(paragraph),
            Event::Eof => return Err(unexpected_eof("w:p")),
            _ => {}
        }
    }
}

fn parse_run(cursor: &mut XmlCursor<'_>, tag: ElementTag) -> Result<Run> {
    let mut run = Run::new("");
    run.tag = tag;

    loop {
        let (start, event) = cursor.next()?;
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"rPr" => run.format = RunFormat::parse(cursor, ElementTag::from_start(&e)?)?,
                b"t" => {
                    let text = cursor.read_text()?;
                    if !text.is_empty() {
                        run.content.push(RunContent::Text(text));
                    }
                }
                _ => {
                    let raw = cursor.capture(start, &e)?;
                    run.content.push(RunContent::Raw(raw));
                }
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"rPr" => run.format = RunFormat::from_empty(ElementTag::from_start(&e)?),
                b"t" => {}
                b"tab" => run.content.push(RunContent::Tab),
                b"cr" => run.content.push(RunContent::Break),
                b"noBreakHyphen" => run.content.push(RunContent::NoBreakHyphen),
                b"softHyphen" => run.content.push(RunContent::SoftHyphen),
                b"ptab" => run.content.push(RunContent::PositionalTab(cursor.raw_since(start)?)),
                b"br" => {
                    if is_line_break(&ElementTag::from_start(&e)?) {
                        run.content.push(RunContent::Break);
                    } else {
                        run.content.push(RunContent::Raw(cursor.raw_since(start)?));
                    }
                }
                _ => run.content.push(RunContent::Raw(cursor.raw_since(start)?)),
            },
            Event::End(_) => return Ok(run),
            Event::Eof => return Err(unexpected_eof("w:r")),
            _ => {}
        }
    }
}

/// Plain line breaks read as `\n`; page and column breaks stay raw
fn is_line_break(tag: &ElementTag) -> bool {
    tag.attr("type")
        .map_or(true, |t| t == "textWrapping")
        && tag.attr("clear").is_none()
}

fn parse_table(cursor: &mut XmlCursor<'_>, tag: ElementTag) -> Result<Table> {
    let mut children = Vec::new();
    loop {
        let (start, event) = cursor.next()?;
        match event {
            Event::Start(e) if e.local_name().as_ref() == b"tr" => {
                let row = parse_row(cursor, ElementTag::from_start(&e)?)?;
                children.push(TableChild::Row(row));
            }
            Event::Start(e) => children.push(TableChild::Raw(cursor.capture(start, &e)?)),
            Event::Empty(_) => children.push(TableChild::Raw(cursor.raw_since(start)?)),
            Event::End(_) => return Ok(Table { tag, children }),
            Event::Eof => return Err(unexpected_eof("w:tbl")),
            _ => {}
        }
    }
}

fn parse_row(cursor: &mut XmlCursor<'_>, tag: ElementTag) -> Result<TableRow> {
    let mut children = Vec::new();
    loop {
        let (start, event) = cursor.next()?;
        match event {
            Event::Start(e) if e.local_name().as_ref() == b"tc" => {
                let cell = parse_cell(cursor, ElementTag::from_start(&e)?)?;
                children.push(RowChild::Cell(cell));
            }
            Event::Start(e) => children.push(RowChild::Raw(cursor.capture(start, &e)?)),
            Event::Empty(_) => children.push(RowChild::Raw(cursor.raw_since(start)?)),
            Event::End(_) => return Ok(TableRow { tag, children }),
            Event::Eof => return Err(unexpected_eof("w:tr")),
            _ => {}
        }
    }
}

fn parse_cell(cursor: &mut XmlCursor<'_>, tag: ElementTag) -> Result<TableCell> {
    let mut cell = TableCell::from_blocks(Vec::new());
    cell.tag = tag;

    loop {
        let (start, event) = cursor.next()?;
        match event {
            Event::Start(e) if e.local_name().as_ref() == b"tcPr" => {
                cell.properties = CellProperties {
                    properties: PropertySet::parse(cursor, ElementTag::from_start(&e)?)?,
                };
            }
            Event::Empty(e) if e.local_name().as_ref() == b"tcPr" => {
                cell.properties = CellProperties {
                    properties: PropertySet::from_empty(ElementTag::from_start(&e)?),
                };
            }
            Event::Start(e) => cell.blocks.push(parse_block(cursor, start, &e)?),
            Event::Empty(e) => cell.blocks.push(empty_block(cursor, start, &e)?),
            Event::End(_) => return Ok(cell),
            Event::Eof => return Err(unexpected_eof("w:tc")),
            _ => {}
        }
    }
}

fn unexpected_eof(element: &str) -> OoxmlError {
    OoxmlError::InvalidStructure(format!("unexpected end of XML inside <{}>", element))
}
