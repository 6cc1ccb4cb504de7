//! Layout primitives shared by all document templates.
//!
//! A document is an ordered sequence of [`Block`]s. Blocks are immutable
//! once built; they are the only channel between the per-kind template
//! builders and the renderer. Inline text understands a single markup tag,
//! `<b>…</b>`, used for header labels and clause numbering.

/// Horizontal alignment of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Justify,
}

/// Style of a single text block. Spacing values are in millimeters.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub align: Align,
    pub space_before: f32,
    pub space_after: f32,
}

/// Immutable style configuration, constructed once per renderer instance and
/// passed explicitly into block construction. No shared mutable styling state.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    pub title: TextStyle,
    pub header: TextStyle,
    pub legal: TextStyle,
    pub cert: TextStyle,
    pub clause: TextStyle,
    pub task_heading: TextStyle,
    pub table_header_size: f32,
    pub table_cell_size: f32,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            title: TextStyle {
                size: 16.0,
                bold: true,
                align: Align::Center,
                space_before: 0.0,
                space_after: 6.3,
            },
            header: TextStyle {
                size: 10.0,
                bold: false,
                align: Align::Left,
                space_before: 0.0,
                space_after: 1.1,
            },
            legal: TextStyle {
                size: 10.0,
                bold: false,
                align: Align::Justify,
                space_before: 0.0,
                space_after: 4.2,
            },
            cert: TextStyle {
                size: 10.0,
                bold: false,
                align: Align::Justify,
                space_before: 4.2,
                space_after: 7.0,
            },
            clause: TextStyle {
                size: 10.0,
                bold: false,
                align: Align::Justify,
                space_before: 0.0,
                space_after: 3.5,
            },
            task_heading: TextStyle {
                size: 10.0,
                bold: true,
                align: Align::Left,
                space_before: 3.5,
                space_after: 2.0,
            },
            table_header_size: 10.0,
            table_cell_size: 9.0,
        }
    }
}

/// One table column: header text plus its width as a fraction of the
/// content width. Fractions of a table should sum to 1.0.
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub width: f32,
}

impl Column {
    pub fn new(header: &str, width: f32) -> Self {
        Self {
            header: header.to_string(),
            width,
        }
    }
}

/// A grid of cells. The header row is stored separately so the renderer can
/// repeat it on every continuation page.
#[derive(Debug, Clone)]
pub struct TableBlock {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

/// Abstract renderable unit.
#[derive(Debug, Clone)]
pub enum Block {
    /// Centered bold title line.
    Title(String),
    /// "LABEL: value" line with a bold label.
    KeyValueLine { label: String, value: String },
    /// Flowing text paragraph; may contain `<b>` markup.
    Paragraph { text: String, style: TextStyle },
    Table(TableBlock),
    /// Vertical gap in millimeters.
    Spacer(f32),
}

impl Block {
    /// Convenience constructor escaping the value side of a header line.
    pub fn key_value(label: &str, value: &str) -> Self {
        Block::KeyValueLine {
            label: label.to_string(),
            value: escape_markup(value),
        }
    }

    pub fn paragraph(text: impl Into<String>, style: TextStyle) -> Self {
        Block::Paragraph {
            text: text.into(),
            style,
        }
    }
}

/// Escape markup-significant characters in user-supplied text so it cannot
/// corrupt the renderer's `<b>` interpretation.
pub fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// A run of text with a single weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

/// Split inline-markup text into bold/regular spans, unescaping entities.
///
/// Only `<b>`/`</b>` is recognized; anything else passes through literally.
/// Unbalanced tags degrade gracefully (the open state simply carries to the
/// end of the string).
pub fn parse_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut bold = false;
    let mut rest = text;

    while !rest.is_empty() {
        let tag = if bold { "</b>" } else { "<b>" };
        match rest.find(tag) {
            Some(idx) => {
                if idx > 0 {
                    spans.push(Span {
                        text: unescape(&rest[..idx]),
                        bold,
                    });
                }
                bold = !bold;
                rest = &rest[idx + tag.len()..];
            }
            None => {
                spans.push(Span {
                    text: unescape(rest),
                    bold,
                });
                break;
            }
        }
    }

    spans
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup() {
        assert_eq!(escape_markup("a & b <c>"), "a &amp; b &lt;c&gt;");
        assert_eq!(escape_markup("sin cambios"), "sin cambios");
    }

    #[test]
    fn test_parse_spans_plain() {
        let spans = parse_spans("solo texto");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "solo texto");
        assert!(!spans[0].bold);
    }

    #[test]
    fn test_parse_spans_bold_label() {
        let spans = parse_spans("<b>NOMBRE:</b> Juan Pérez");
        assert_eq!(
            spans,
            vec![
                Span {
                    text: "NOMBRE:".to_string(),
                    bold: true
                },
                Span {
                    text: " Juan Pérez".to_string(),
                    bold: false
                },
            ]
        );
    }

    #[test]
    fn test_parse_spans_unescapes_entities() {
        let spans = parse_spans("Guantes &amp; casco &lt;norma&gt;");
        assert_eq!(spans[0].text, "Guantes & casco <norma>");
    }

    #[test]
    fn test_escaped_tag_does_not_toggle_bold() {
        let spans = parse_spans(&escape_markup("<b>no bold</b>"));
        assert_eq!(spans.len(), 1);
        assert!(!spans[0].bold);
        assert_eq!(spans[0].text, "<b>no bold</b>");
    }

    #[test]
    fn test_unbalanced_bold_carries_to_end() {
        let spans = parse_spans("<b>todo en negrita");
        assert_eq!(spans.len(), 1);
        assert!(spans[0].bold);
    }
}
