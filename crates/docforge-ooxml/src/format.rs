//! Run formatting and the formatting carrier
//!
//! [`RunFormat`] is a typed view over a run's `w:rPr` element. Only the
//! properties the substitution engine carries between runs have accessors;
//! every other property is kept as-is.

use std::borrow::Cow;

use crate::document::Run;
use crate::error::Result;
use crate::xml::{ElementTag, PropertySet, XmlCursor};

/// Child order of `w:rPr` (CT_RPr sequence)
const RUN_PROPERTY_ORDER: &[&str] = &[
    "rStyle",
    "rFonts",
    "b",
    "bCs",
    "i",
    "iCs",
    "caps",
    "smallCaps",
    "strike",
    "dstrike",
    "outline",
    "shadow",
    "emboss",
    "imprint",
    "noProof",
    "snapToGrid",
    "vanish",
    "webHidden",
    "color",
    "spacing",
    "w",
    "kern",
    "position",
    "sz",
    "szCs",
    "highlight",
    "u",
    "effect",
    "bdr",
    "shd",
    "fitText",
    "vertAlign",
    "rtl",
    "cs",
    "em",
    "lang",
    "eastAsianLayout",
    "specVanish",
    "oMath",
];

/// Underline setting of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Underline {
    /// Explicitly not underlined (`w:val="none"`)
    Off,
    /// Single line
    Single,
    /// Any other underline style, by its OOXML value (`double`, `wave`, ...)
    Style(String),
}

impl Underline {
    fn from_val(val: Option<&str>) -> Self {
        match val {
            None | Some("single") => Underline::Single,
            Some("none") => Underline::Off,
            Some(other) => Underline::Style(other.to_string()),
        }
    }

    fn as_val(&self) -> &str {
        match self {
            Underline::Off => "none",
            Underline::Single => "single",
            Underline::Style(style) => style,
        }
    }
}

/// Formatting descriptor of a run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunFormat {
    properties: PropertySet,
}

impl RunFormat {
    /// Create an empty format (inherits everything from styles)
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn parse(cursor: &mut XmlCursor<'_>, tag: ElementTag) -> Result<Self> {
        Ok(Self {
            properties: PropertySet::parse(cursor, tag)?,
        })
    }

    pub(crate) fn from_empty(tag: ElementTag) -> Self {
        Self {
            properties: PropertySet::from_empty(tag),
        }
    }

    pub(crate) fn write(&self, out: &mut String) {
        self.properties.write("rPr", out);
    }

    /// True when no run property is set
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Font family name (the ASCII font slot)
    pub fn font_name(&self) -> Option<Cow<'_, str>> {
        self.properties.find("rFonts").and_then(|t| t.attr("ascii"))
    }

    /// Font used for East-Asian text
    pub fn east_asia_font(&self) -> Option<Cow<'_, str>> {
        self.properties.find("rFonts").and_then(|t| t.attr("eastAsia"))
    }

    /// Set the font family for ASCII and high-ANSI text
    pub fn set_font_name(&mut self, name: &str) {
        let fonts = self.properties.get_or_insert("rFonts", RUN_PROPERTY_ORDER);
        fonts.set_attr("ascii", name);
        fonts.set_attr("hAnsi", name);
    }

    /// Set the font family for East-Asian text
    pub fn set_east_asia_font(&mut self, name: &str) {
        self.properties
            .get_or_insert("rFonts", RUN_PROPERTY_ORDER)
            .set_attr("eastAsia", name);
    }

    /// Font size in half-points
    pub fn size(&self) -> Option<u32> {
        self.properties
            .find("sz")
            .and_then(|t| t.attr("val"))
            .and_then(|v| v.parse().ok())
    }

    /// Set the font size in half-points
    pub fn set_size(&mut self, half_points: u32) {
        self.properties.set(
            ElementTag::new("sz").with_attr("val", &half_points.to_string()),
            RUN_PROPERTY_ORDER,
        );
    }

    /// Explicit RGB color as hex (`FF0000`); `auto` counts as unset
    pub fn color(&self) -> Option<Cow<'_, str>> {
        self.properties
            .find("color")
            .and_then(|t| t.attr("val"))
            .filter(|v| !v.eq_ignore_ascii_case("auto"))
    }

    /// Set an explicit RGB color
    pub fn set_color(&mut self, rgb: &str) {
        self.properties.set(
            ElementTag::new("color").with_attr("val", rgb),
            RUN_PROPERTY_ORDER,
        );
    }

    /// Bold: `None` when inherited from styles
    pub fn bold(&self) -> Option<bool> {
        self.toggle("b")
    }

    pub fn set_bold(&mut self, value: Option<bool>) {
        self.set_toggle("b", value);
    }

    /// Italic: `None` when inherited from styles
    pub fn italic(&self) -> Option<bool> {
        self.toggle("i")
    }

    pub fn set_italic(&mut self, value: Option<bool>) {
        self.set_toggle("i", value);
    }

    /// Underline: `None` when inherited from styles
    pub fn underline(&self) -> Option<Underline> {
        self.properties
            .find("u")
            .map(|t| Underline::from_val(t.attr("val").as_deref()))
    }

    pub fn set_underline(&mut self, value: Option<Underline>) {
        match value {
            None => self.properties.remove("u"),
            Some(underline) => self.properties.set(
                ElementTag::new("u").with_attr("val", underline.as_val()),
                RUN_PROPERTY_ORDER,
            ),
        }
    }

    fn toggle(&self, local: &str) -> Option<bool> {
        self.properties.find(local).map(|t| {
            !matches!(
                t.attr("val").as_deref(),
                Some("0") | Some("false") | Some("off")
            )
        })
    }

    fn set_toggle(&mut self, local: &str, value: Option<bool>) {
        match value {
            None => self.properties.remove(local),
            Some(true) => self
                .properties
                .set(ElementTag::new(local), RUN_PROPERTY_ORDER),
            Some(false) => self.properties.set(
                ElementTag::new(local).with_attr("val", "0"),
                RUN_PROPERTY_ORDER,
            ),
        }
    }
}

/// Copy the visual style of `source` onto a newly created run.
///
/// A missing source leaves `target` untouched. Font family (including the
/// East-Asian slot), size and explicit color are copied only when set on
/// the source; bold, italic and underline are always copied, unset
/// included, so the target never keeps a different explicit value.
pub fn apply_run_formatting(target: &mut Run, source: Option<&Run>) {
    let Some(source) = source else {
        return;
    };
    let from = &source.format;
    let to = &mut target.format;

    if let Some(name) = from.font_name() {
        to.set_font_name(&name);
        to.set_east_asia_font(&name);
    }
    if let Some(size) = from.size() {
        to.set_size(size);
    }
    if let Some(color) = from.color() {
        to.set_color(&color);
    }
    to.set_bold(from.bold());
    to.set_italic(from.italic());
    to.set_underline(from.underline());
}
