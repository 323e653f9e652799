//! Placeholder substitution
//!
//! Placeholders such as `<<Client Name>>` are matched against the visible
//! text of a paragraph, so a token split across several runs by Word is
//! still found. A match rebuilds the paragraph's text as new runs whose
//! formatting is carried over from the original first and last runs.

use std::fmt::Display;

use indexmap::IndexMap;
use tracing::debug;

use crate::document::{Document, Paragraph, VerticalAlignment};
use crate::format::apply_run_formatting;

/// Ordered mapping from placeholder token to replacement text
///
/// Keys are tried in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    entries: IndexMap<String, String>,
}

impl PlaceholderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a placeholder; an existing key keeps its position and gets the new value
    pub fn insert(&mut self, placeholder: impl Into<String>, value: impl Display) {
        self.entries.insert(placeholder.into(), value.to_string());
    }

    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.entries.get(placeholder).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for PlaceholderMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Display> Extend<(K, V)> for PlaceholderMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Outcome of a single replacement attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    /// The placeholder was found and replaced
    Replaced,
    /// The paragraph does not contain the placeholder
    NoMatch,
}

/// Counters collected while substituting a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstitutionReport {
    /// Number of placeholders replaced
    pub replacements: usize,
    /// Paragraphs with text that were checked against the map
    pub paragraphs_visited: usize,
    /// Table cells whose vertical alignment was set to center
    pub cells_normalized: usize,
}

/// Replace the first occurrence of `placeholder` in a paragraph.
///
/// The existing runs are emptied but kept. The text before the match and
/// the value are appended as new runs formatted like the first original
/// run; the text after the match is appended formatted like the last
/// original run. A paragraph without runs has every occurrence replaced in
/// its detached text.
///
/// Drawings, symbols, page breaks and field characters inside the runs move
/// into the new runs at the same position relative to the text. A
/// placeholder interrupted by such content does not match.
pub fn replace_placeholder(
    paragraph: &mut Paragraph,
    placeholder: &str,
    value: &str,
) -> Replacement {
    if placeholder.is_empty() {
        return Replacement::NoMatch;
    }

    let full = paragraph.marked_text();
    let Some(start) = full.find(placeholder) else {
        return Replacement::NoMatch;
    };

    if !paragraph.has_runs() {
        let replaced = paragraph.detached_text().replace(placeholder, value);
        paragraph.set_detached_text(replaced);
        return Replacement::Replaced;
    }

    let end = start + placeholder.len();
    let before = &full[..start];
    let after = &full[end..];

    let first = paragraph.runs().next().cloned();
    let last = paragraph.runs().last().cloned();

    let mut objects = Vec::new();
    for run in paragraph.runs_mut() {
        objects.extend(run.take_objects());
    }
    let mut objects = objects.into_iter();

    if !before.is_empty() {
        let run = paragraph.add_run("");
        run.push_text(before, &mut objects);
        apply_run_formatting(run, first.as_ref());
    }

    let run = paragraph.add_run(value);
    apply_run_formatting(run, first.as_ref());

    if !after.is_empty() {
        let run = paragraph.add_run("");
        run.push_text(after, &mut objects);
        apply_run_formatting(run, last.as_ref());
    }

    Replacement::Replaced
}

/// Replace occurrences of `placeholder` until none is left.
///
/// The number of attempts is bounded by the occurrences present before the
/// first replacement, so a value containing its own placeholder cannot
/// loop. Returns the number of successful replacements.
pub fn replace_all_occurrences(paragraph: &mut Paragraph, placeholder: &str, value: &str) -> usize {
    if placeholder.is_empty() {
        return 0;
    }
    let bound = paragraph.text().matches(placeholder).count();
    let mut replaced = 0;
    for _ in 0..bound {
        if replace_placeholder(paragraph, placeholder, value) == Replacement::NoMatch {
            break;
        }
        replaced += 1;
    }
    replaced
}

/// Substitute every placeholder of `map` throughout the document.
///
/// Visits top-level paragraphs, then every table cell. Inside a cell the
/// paragraphs of tables nested one level deep are processed before the
/// cell's own paragraphs. Each top-level table cell is vertically centered
/// afterwards.
pub fn substitute<'d>(document: &'d mut Document, map: &PlaceholderMap) -> &'d mut Document {
    substitute_with_report(document, map);
    document
}

/// Same as [`substitute`], returning what was done
pub fn substitute_with_report(document: &mut Document, map: &PlaceholderMap) -> SubstitutionReport {
    let mut report = SubstitutionReport::default();

    for paragraph in document.paragraphs_mut() {
        substitute_paragraph(paragraph, map, &mut report);
    }

    for table in document.tables_mut() {
        for row in table.rows_mut() {
            for cell in row.cells_mut() {
                for nested in cell.tables_mut() {
                    for nested_row in nested.rows_mut() {
                        for nested_cell in nested_row.cells_mut() {
                            for paragraph in nested_cell.paragraphs_mut() {
                                substitute_paragraph(paragraph, map, &mut report);
                            }
                        }
                    }
                }
                for paragraph in cell.paragraphs_mut() {
                    substitute_paragraph(paragraph, map, &mut report);
                }
                cell.properties.set_vertical_alignment(VerticalAlignment::Center);
                report.cells_normalized += 1;
            }
        }
    }

    debug!(
        replacements = report.replacements,
        paragraphs = report.paragraphs_visited,
        cells = report.cells_normalized,
        placeholders = map.len(),
        "Substitution complete"
    );
    report
}

fn substitute_paragraph(
    paragraph: &mut Paragraph,
    map: &PlaceholderMap,
    report: &mut SubstitutionReport,
) {
    if paragraph.text().is_empty() {
        return;
    }
    report.paragraphs_visited += 1;
    for (placeholder, value) in map.iter() {
        if replace_placeholder(paragraph, placeholder, value) == Replacement::Replaced {
            report.replacements += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Run};
    use crate::format::Underline;

    fn paragraph(texts: &[&str]) -> Paragraph {
        Paragraph::from_runs(texts.iter().map(|t| Run::new(*t)))
    }

    fn run_texts(paragraph: &Paragraph) -> Vec<String> {
        paragraph.runs().map(|r| r.text()).collect()
    }

    #[test]
    fn test_no_match_leaves_paragraph_unchanged() {
        let mut p = paragraph(&["Hello ", "world"]);
        p.runs_mut().next().unwrap().format.set_bold(Some(true));
        let before = p.clone();

        assert_eq!(replace_placeholder(&mut p, "<<NAME>>", "Asha"), Replacement::NoMatch);
        assert_eq!(p, before);
    }

    #[test]
    fn test_split_run_placeholder() {
        let mut p = paragraph(&["Hello ", "<<NA", "ME>>!"]);
        assert_eq!(replace_placeholder(&mut p, "<<NAME>>", "Asha"), Replacement::Replaced);

        assert_eq!(p.text(), "Hello Asha!");
        assert_eq!(run_texts(&p), ["", "", "", "Hello ", "Asha", "!"]);
    }

    #[test]
    fn test_formatting_anchors() {
        let mut p = paragraph(&["Dear <<Client", " Name>>, welcome"]);
        p.runs_mut().next().unwrap().format.set_bold(Some(true));
        p.runs_mut().last().unwrap().format.set_italic(Some(true));

        replace_placeholder(&mut p, "<<Client Name>>", "Acme");

        let runs: Vec<_> = p.runs().filter(|r| !r.text().is_empty()).collect();
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].text(), "Dear ");
        assert_eq!(runs[0].format.bold(), Some(true));
        assert_eq!(runs[1].text(), "Acme");
        assert_eq!(runs[1].format.bold(), Some(true));
        assert_eq!(runs[2].text(), ", welcome");
        assert_eq!(runs[2].format.italic(), Some(true));
        assert_eq!(runs[2].format.bold(), None);
    }

    #[test]
    fn test_whole_paragraph_placeholder_adds_only_value_run() {
        let mut p = paragraph(&["<<Date>>"]);
        p.runs_mut().next().unwrap().format.set_underline(Some(Underline::Single));

        replace_placeholder(&mut p, "<<Date>>", "16 October, 2026");
        assert_eq!(run_texts(&p), ["", "16 October, 2026"]);
        assert_eq!(p.runs().last().unwrap().format.underline(), Some(Underline::Single));
    }

    #[test]
    fn test_empty_value_still_appends_run() {
        let mut p = paragraph(&["a<<X>>b"]);
        replace_placeholder(&mut p, "<<X>>", "");
        assert_eq!(run_texts(&p), ["", "a", "", "b"]);
        assert_eq!(p.text(), "ab");
    }

    #[test]
    fn test_only_first_occurrence_replaced() {
        let mut p = paragraph(&["<<X>> and <<X>>"]);
        replace_placeholder(&mut p, "<<X>>", "1");
        assert_eq!(p.text(), "1 and <<X>>");
    }

    #[test]
    fn test_replace_all_occurrences() {
        let mut p = paragraph(&["<<X>> and <<X>>"]);
        assert_eq!(replace_all_occurrences(&mut p, "<<X>>", "1"), 2);
        assert_eq!(p.text(), "1 and 1");
    }

    #[test]
    fn test_replace_all_is_bounded() {
        let mut p = paragraph(&["<<X>>"]);
        assert_eq!(replace_all_occurrences(&mut p, "<<X>>", "<<X>><<X>>"), 1);
        assert_eq!(p.text(), "<<X>><<X>>");
    }

    #[test]
    fn test_detached_text_replaces_every_occurrence() {
        let mut p = Paragraph::with_detached_text("<<X>>-<<X>>");
        assert_eq!(replace_placeholder(&mut p, "<<X>>", "y"), Replacement::Replaced);
        assert_eq!(p.text(), "y-y");
        assert!(!p.has_runs());
    }

    #[test]
    fn test_empty_placeholder_never_matches() {
        let mut p = paragraph(&["text"]);
        assert_eq!(replace_placeholder(&mut p, "", "x"), Replacement::NoMatch);
        assert_eq!(replace_all_occurrences(&mut p, "", "x"), 0);
    }

    #[test]
    fn test_multibyte_text_around_placeholder() {
        let mut p = paragraph(&["Café «", "<<Name>>", "» ✓"]);
        replace_placeholder(&mut p, "<<Name>>", "Zoë");
        assert_eq!(p.text(), "Café «Zoë» ✓");
    }

    #[test]
    fn test_non_breaking_hyphen_survives_rebuild() {
        let mut p = paragraph(&["<<Code>> ", "A\u{2011}B"]);
        replace_placeholder(&mut p, "<<Code>>", "X");
        assert_eq!(p.text(), "X A\u{2011}B");
    }

    #[test]
    fn test_map_keeps_insertion_order() {
        let mut map = PlaceholderMap::new();
        map.insert("<<B>>", 2);
        map.insert("<<A>>", "one");
        map.insert("<<B>>", 3);

        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["<<B>>", "<<A>>"]);
        assert_eq!(map.get("<<B>>"), Some("3"));
    }

    #[test]
    fn test_map_order_drives_replacement() {
        // "<<A>>" is tried first and consumes the inner token
        let map: PlaceholderMap = [("<<A>>", "<<B>>"), ("<<B>>", "done")].into_iter().collect();
        let mut doc = Document::from_blocks(vec![Block::Paragraph(paragraph(&["<<A>>"]))]);

        let report = substitute_with_report(&mut doc, &map);
        assert_eq!(doc.paragraphs().next().unwrap().text(), "done");
        assert_eq!(report.replacements, 2);
        assert_eq!(report.paragraphs_visited, 1);
    }

    #[test]
    fn test_empty_paragraphs_not_visited() {
        let map: PlaceholderMap = [("<<A>>", "x")].into_iter().collect();
        let mut doc = Document::from_blocks(vec![Block::Paragraph(Paragraph::new())]);
        let report = substitute_with_report(&mut doc, &map);
        assert_eq!(report, SubstitutionReport::default());
    }
}
