//! Low-level XML helpers shared by the document parser and writer
//!
//! The document model only interprets the handful of WordprocessingML
//! elements that carry text and formatting. Everything else is captured
//! by byte span from the source XML and written back verbatim, so a
//! template survives a parse/write cycle without losing content.

use std::borrow::Cow;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};

/// Namespace prefix for elements created by docforge
pub(crate) const W_PREFIX: &str = "w";

/// An element name with its attributes, as found in the source XML
///
/// Attribute values are kept in their escaped form so that untouched
/// elements are written back byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTag {
    name: String,
    attributes: Vec<(String, String)>,
}

impl ElementTag {
    /// Create a tag in the WordprocessingML namespace (`w:` prefix)
    pub fn new(local_name: &str) -> Self {
        Self {
            name: format!("{}:{}", W_PREFIX, local_name),
            attributes: Vec::new(),
        }
    }

    pub(crate) fn from_start(e: &BytesStart) -> Result<Self> {
        let name = std::str::from_utf8(e.name().as_ref())?.to_string();
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = std::str::from_utf8(&attr.value)?.to_string();
            attributes.push((key, value));
        }
        Ok(Self { name, attributes })
    }

    /// Qualified element name (e.g. `w:p`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element name without namespace prefix
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Look up an attribute by local name, unescaped
    pub fn attr(&self, local: &str) -> Option<Cow<'_, str>> {
        self.attributes
            .iter()
            .find(|(key, _)| local_part(key) == local)
            .map(|(_, value)| unescape(value).unwrap_or(Cow::Borrowed(value.as_str())))
    }

    /// Set an attribute by local name, adding it with the `w:` prefix if absent
    pub fn set_attr(&mut self, local: &str, value: &str) {
        let escaped = escape_xml(value);
        match self
            .attributes
            .iter_mut()
            .find(|(key, _)| local_part(key) == local)
        {
            Some((_, existing)) => *existing = escaped,
            None => self
                .attributes
                .push((format!("{}:{}", W_PREFIX, local), escaped)),
        }
    }

    /// Builder form of [`ElementTag::set_attr`]
    pub fn with_attr(mut self, local: &str, value: &str) -> Self {
        self.set_attr(local, value);
        self
    }

    pub(crate) fn write_open(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        self.write_attributes(out);
        out.push('>');
    }

    pub(crate) fn write_empty(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        self.write_attributes(out);
        out.push_str("/>");
    }

    pub(crate) fn write_close(&self, out: &mut String) {
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    fn write_attributes(&self, out: &mut String) {
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
    }
}

fn local_part(name: &str) -> &str {
    match name.split_once(':') {
        Some((_, local)) => local,
        None => name,
    }
}

/// Escape special XML characters
pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Streaming reader over borrowed XML bytes that can hand out the raw
/// source text of any element it has read past.
pub(crate) struct XmlCursor<'a> {
    reader: Reader<&'a [u8]>,
    xml: &'a [u8],
}

impl<'a> XmlCursor<'a> {
    pub(crate) fn new(xml: &'a [u8]) -> Self {
        let mut reader = Reader::from_reader(xml);
        // Whitespace inside runs is content
        reader.config_mut().trim_text(false);
        Self { reader, xml }
    }

    pub(crate) fn position(&self) -> usize {
        self.reader.buffer_position() as usize
    }

    /// Read the next event together with the byte offset it started at
    pub(crate) fn next(&mut self) -> Result<(usize, Event<'a>)> {
        let start = self.position();
        let event = self.reader.read_event()?;
        Ok((start, event))
    }

    pub(crate) fn slice(&self, start: usize, end: usize) -> Result<&'a str> {
        Ok(std::str::from_utf8(&self.xml[start..end])?)
    }

    /// Source text from `start` up to the current position
    pub(crate) fn raw_since(&self, start: usize) -> Result<String> {
        Ok(self.slice(start, self.position())?.to_string())
    }

    /// Skip to the end of an element whose start tag was just read and
    /// return its complete source text
    pub(crate) fn capture(&mut self, start: usize, e: &BytesStart) -> Result<String> {
        self.reader.read_to_end(e.name())?;
        self.raw_since(start)
    }

    /// Read the character content of an element up to its end tag
    pub(crate) fn read_text(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.reader.read_event()? {
                Event::Text(t) => {
                    text.push_str(&t.unescape().map_err(quick_xml::Error::from)?)
                }
                Event::CData(c) => text.push_str(std::str::from_utf8(&c)?),
                Event::End(_) => return Ok(text),
                Event::Eof => {
                    return Err(OoxmlError::InvalidStructure(
                        "unexpected end of XML inside text element".to_string(),
                    ))
                }
                _ => {}
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PropertyElement {
    /// A self-closing property such as `<w:b/>` or `<w:sz w:val="24"/>`
    Empty(ElementTag),
    /// A property with child content, kept verbatim
    Raw { local_name: String, xml: String },
}

impl PropertyElement {
    fn local_name(&self) -> &str {
        match self {
            PropertyElement::Empty(tag) => tag.local_name(),
            PropertyElement::Raw { local_name, .. } => local_name,
        }
    }
}

/// Contents of a properties element (`w:rPr`, `w:tcPr`)
///
/// Children are kept in document order. New children are inserted at the
/// position the schema sequence expects, given by `order`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct PropertySet {
    tag: Option<ElementTag>,
    elements: Vec<PropertyElement>,
}

impl PropertySet {
    /// Parse the children of a properties element whose start tag was just read
    pub(crate) fn parse(cursor: &mut XmlCursor<'_>, tag: ElementTag) -> Result<Self> {
        let mut elements = Vec::new();
        loop {
            let (start, event) = cursor.next()?;
            match event {
                Event::Empty(e) => {
                    elements.push(PropertyElement::Empty(ElementTag::from_start(&e)?))
                }
                Event::Start(e) => {
                    let content_start = cursor.position() - start;
                    let tag = ElementTag::from_start(&e)?;
                    let xml = cursor.capture(start, &e)?;
                    // <w:b w:val="0"></w:b> is the same property as <w:b w:val="0"/>
                    let content_end = xml.len().saturating_sub(tag.name().len() + 3);
                    let has_children = xml
                        .get(content_start..content_end)
                        .map_or(true, |content| content.contains('<'));
                    if has_children {
                        let local_name = tag.local_name().to_string();
                        elements.push(PropertyElement::Raw { local_name, xml });
                    } else {
                        elements.push(PropertyElement::Empty(tag));
                    }
                }
                Event::End(_) => break,
                Event::Eof => {
                    return Err(OoxmlError::InvalidStructure(format!(
                        "unexpected end of XML inside <{}>",
                        tag.name()
                    )))
                }
                _ => {}
            }
        }
        Ok(Self {
            tag: Some(tag),
            elements,
        })
    }

    pub(crate) fn from_empty(tag: ElementTag) -> Self {
        Self {
            tag: Some(tag),
            elements: Vec::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub(crate) fn find(&self, local: &str) -> Option<&ElementTag> {
        self.elements.iter().find_map(|el| match el {
            PropertyElement::Empty(tag) if tag.local_name() == local => Some(tag),
            _ => None,
        })
    }

    /// Replace the child with the same local name, or insert in schema order
    pub(crate) fn set(&mut self, tag: ElementTag, order: &[&str]) {
        let local = tag.local_name().to_string();
        match self.elements.iter().position(|el| el.local_name() == local) {
            Some(index) => self.elements[index] = PropertyElement::Empty(tag),
            None => {
                let index = self.insertion_index(&local, order);
                self.elements.insert(index, PropertyElement::Empty(tag));
            }
        }
    }

    /// Mutable access to a child, creating an empty one in schema order if absent
    pub(crate) fn get_or_insert(&mut self, local: &str, order: &[&str]) -> &mut ElementTag {
        let existing = self.elements.iter().position(|el| el.local_name() == local);
        let index = match existing {
            Some(index) => {
                if matches!(self.elements[index], PropertyElement::Raw { .. }) {
                    self.elements[index] = PropertyElement::Empty(ElementTag::new(local));
                }
                index
            }
            None => {
                let index = self.insertion_index(local, order);
                self.elements
                    .insert(index, PropertyElement::Empty(ElementTag::new(local)));
                index
            }
        };
        match &mut self.elements[index] {
            PropertyElement::Empty(tag) => tag,
            PropertyElement::Raw { .. } => unreachable!("raw property replaced above"),
        }
    }

    pub(crate) fn remove(&mut self, local: &str) {
        self.elements.retain(|el| el.local_name() != local);
    }

    fn insertion_index(&self, local: &str, order: &[&str]) -> usize {
        let rank = |name: &str| order.iter().position(|n| *n == name).unwrap_or(order.len());
        let new_rank = rank(local);
        self.elements
            .iter()
            .position(|el| rank(el.local_name()) > new_rank)
            .unwrap_or(self.elements.len())
    }

    /// Write the properties element; nothing is written when it has no children
    pub(crate) fn write(&self, default_local: &str, out: &mut String) {
        if self.elements.is_empty() {
            return;
        }
        let default_tag;
        let tag = match &self.tag {
            Some(tag) => tag,
            None => {
                default_tag = ElementTag::new(default_local);
                &default_tag
            }
        };
        tag.write_open(out);
        for element in &self.elements {
            match element {
                PropertyElement::Empty(tag) => tag.write_empty(out),
                PropertyElement::Raw { xml, .. } => out.push_str(xml),
            }
        }
        tag.write_close(out);
    }
}
