//! Paginating PDF renderer.
//!
//! Flows blocks top-to-bottom on A4 pages with 25.4mm margins, splits tables
//! across pages repeating the header row, and stamps a fixed-position
//! signature footer on every page. Built on `printpdf` with the builtin
//! Helvetica faces; text metrics are approximated with an average glyph
//! width, which is stable across environments because no font files are
//! loaded at runtime.

use std::fs::File;
use std::io::BufWriter;
use std::ops::Range;
use std::path::Path;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};

use super::common::{download_filename, output_dir, unique_output_path};
use super::layout::{parse_spans, Align, Block, StyleSheet, TableBlock, TextStyle};
use super::model::DocumentData;
use super::{DocumentError, GeneratedDocument};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 25.4;
const CONTENT_W: f32 = PAGE_W - 2.0 * MARGIN;

// Signature footer geometry (mm from the bottom-left corner).
const FOOTER_LINE_Y: f32 = 49.4;
const FOOTER_LEFT_LINE: (f32, f32) = (35.3, 98.8);
const FOOTER_RIGHT_LINE: (f32, f32) = (112.9, 176.4);
const FOOTER_TEXT_YS: [f32; 3] = [42.3, 38.1, 33.9];

/// Flowed content must stay above the signature area.
const CONTENT_FLOOR: f32 = FOOTER_LINE_Y + 6.0;
const CONTENT_TOP: f32 = PAGE_H - MARGIN;

const PT_TO_MM: f32 = 0.352_778;
/// Average Helvetica glyph advance as a fraction of the font size.
const AVG_GLYPH_FACTOR: f32 = 0.5;
const LINE_SPACING: f32 = 1.25;
const CELL_PADDING: f32 = 1.6;

/// One signature line of the footer.
#[derive(Debug, Clone)]
pub struct SignatureParty {
    pub nombre: String,
    pub rut: String,
    pub rol: String,
}

/// Per-page footer: employer signature left, worker signature right.
#[derive(Debug, Clone)]
pub struct FooterSpec {
    pub empleador: SignatureParty,
    pub trabajador: SignatureParty,
}

/// Stateless single-shot renderer. Holds only the immutable style
/// configuration; every generation is an independent pipeline invocation.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    styles: StyleSheet,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_styles(styles: StyleSheet) -> Self {
        Self { styles }
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    /// Validate, lay out and render a document, writing the PDF under the
    /// generated-documents directory. The artifact is checked on disk after
    /// the build; a missing file is an internal rendering fault.
    pub fn generate(&self, data: &DocumentData) -> Result<GeneratedDocument, DocumentError> {
        data.validate()?;
        let blocks = data.build_blocks(&self.styles);
        let footer = data.footer();

        let dir = output_dir()?;
        let path = unique_output_path(&dir, data.kind(), data.subject_rut());
        self.render_to_file(data.title(), &blocks, &footer, &path)?;

        if !path.exists() {
            return Err(DocumentError::ArtifactMissing(path));
        }

        Ok(GeneratedDocument {
            filename: download_filename(data.kind(), data.subject_rut()),
            path,
        })
    }

    /// Render a block sequence to a concrete file path.
    pub fn render_to_file(
        &self,
        title: &str,
        blocks: &[Block],
        footer: &FooterSpec,
        path: &Path,
    ) -> Result<(), DocumentError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "contenido");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| DocumentError::Assembly(e.to_string()))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| DocumentError::Assembly(e.to_string()))?;

        let mut writer = PageWriter {
            doc: &doc,
            font: &font,
            font_bold: &font_bold,
            footer,
            styles: &self.styles,
            layer: doc.get_page(page).get_layer(layer),
            y: CONTENT_TOP,
        };
        writer.draw_footer();

        for block in blocks {
            writer.draw_block(block);
        }

        let file = File::create(path).map_err(DocumentError::WritePdf)?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| DocumentError::Assembly(e.to_string()))?;
        Ok(())
    }
}

/// Approximate width of a text run in millimeters.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_FACTOR * PT_TO_MM
}

fn line_height(size: f32) -> f32 {
    size * LINE_SPACING * PT_TO_MM
}

/// A wrapped word with its weight.
#[derive(Debug, Clone)]
struct StyledWord {
    text: String,
    bold: bool,
}

/// Wrap markup text into lines of styled words fitting `width` mm.
fn wrap_markup(text: &str, size: f32, width: f32) -> Vec<Vec<StyledWord>> {
    let space = text_width(" ", size);
    let mut lines: Vec<Vec<StyledWord>> = Vec::new();
    let mut current: Vec<StyledWord> = Vec::new();
    let mut current_w = 0.0f32;

    for span in parse_spans(text) {
        for word in span.text.split_whitespace() {
            let w = text_width(word, size);
            let needed = if current.is_empty() { w } else { current_w + space + w };
            if !current.is_empty() && needed > width {
                lines.push(std::mem::take(&mut current));
                current_w = 0.0;
            }
            current_w = if current.is_empty() { w } else { current_w + space + w };
            current.push(StyledWord {
                text: word.to_string(),
                bold: span.bold,
            });
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        // keep an empty line so empty cells still occupy height
        lines.push(Vec::new());
    }
    lines
}

fn line_width(words: &[StyledWord], size: f32) -> f32 {
    if words.is_empty() {
        return 0.0;
    }
    let space = text_width(" ", size);
    words
        .iter()
        .map(|w| text_width(&w.text, size))
        .sum::<f32>()
        + space * (words.len() - 1) as f32
}

/// Height a table row occupies given its wrapped cell lines.
fn row_height(cells: &[Vec<Vec<StyledWord>>], size: f32) -> f32 {
    let max_lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    max_lines as f32 * line_height(size) + 2.0 * CELL_PADDING
}

/// Split table rows into per-page slices. Each slice is preceded by a
/// repeated header row of height `header_h`. `first_avail` is the space left
/// on the current page, `page_avail` the space of a fresh page.
fn split_rows(
    row_heights: &[f32],
    header_h: f32,
    first_avail: f32,
    page_avail: f32,
) -> Vec<Range<usize>> {
    let mut slices = Vec::new();
    let mut start = 0usize;
    let mut avail = first_avail;

    while start < row_heights.len() {
        let mut budget = avail - header_h;
        let mut end = start;
        while end < row_heights.len() && row_heights[end] <= budget {
            budget -= row_heights[end];
            end += 1;
        }
        if end == start {
            if avail < page_avail {
                // nothing fits here, retry on a fresh page
                avail = page_avail;
                continue;
            }
            // single row taller than a page: emit it alone to guarantee progress
            end = start + 1;
        }
        slices.push(start..end);
        start = end;
        avail = page_avail;
    }

    if slices.is_empty() {
        // header-only table still renders once
        slices.push(0..0);
    }
    slices
}

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    font: &'a IndirectFontRef,
    font_bold: &'a IndirectFontRef,
    footer: &'a FooterSpec,
    styles: &'a StyleSheet,
    layer: PdfLayerReference,
    y: f32,
}

impl<'a> PageWriter<'a> {
    fn remaining(&self) -> f32 {
        self.y - CONTENT_FLOOR
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "contenido");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = CONTENT_TOP;
        self.draw_footer();
    }

    fn font_for(&self, bold: bool) -> &'a IndirectFontRef {
        if bold {
            self.font_bold
        } else {
            self.font
        }
    }

    fn draw_block(&mut self, block: &Block) {
        match block {
            Block::Title(text) => {
                let style = self.styles.title;
                self.draw_paragraph(&format!("<b>{}</b>", text), style);
            }
            Block::KeyValueLine { label, value } => {
                let style = self.styles.header;
                self.draw_paragraph(&format!("<b>{}:</b> {}", label, value), style);
            }
            Block::Paragraph { text, style } => self.draw_paragraph(text, *style),
            Block::Table(table) => self.draw_table(table),
            Block::Spacer(h) => self.y -= h,
        }
    }

    fn draw_paragraph(&mut self, text: &str, style: TextStyle) {
        self.y -= style.space_before;
        let lines = wrap_markup(text, style.size, CONTENT_W);
        let lh = line_height(style.size);

        let last = lines.len().saturating_sub(1);
        for (i, words) in lines.iter().enumerate() {
            if self.remaining() < lh {
                self.new_page();
            }
            self.y -= lh;
            self.draw_line(words, style, MARGIN, CONTENT_W, i == last);
        }
        self.y -= style.space_after;
    }

    /// Draw one wrapped line inside `[x, x + width]` honoring alignment.
    /// `is_last` suppresses justification on a paragraph's final line.
    fn draw_line(&self, words: &[StyledWord], style: TextStyle, x: f32, width: f32, is_last: bool) {
        if words.is_empty() {
            return;
        }
        let bold_all = style.bold;
        let size = style.size;
        let natural = line_width(words, size);
        let space = text_width(" ", size);

        let (start_x, gap) = match style.align {
            Align::Center => (x + (width - natural) / 2.0, space),
            Align::Justify if !is_last && words.len() > 1 && natural < width => {
                (x, space + (width - natural) / (words.len() - 1) as f32)
            }
            _ => (x, space),
        };

        let mut cursor = start_x;
        for word in words {
            let font = self.font_for(bold_all || word.bold);
            self.layer
                .use_text(word.text.clone(), size, Mm(cursor), Mm(self.y), font);
            cursor += text_width(&word.text, size) + gap;
        }
    }

    fn draw_table(&mut self, table: &TableBlock) {
        let cell_size = self.styles.table_cell_size;
        let header_size = self.styles.table_header_size;
        let widths: Vec<f32> = table.columns.iter().map(|c| c.width * CONTENT_W).collect();

        let header_cells: Vec<Vec<Vec<StyledWord>>> = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| wrap_markup(&c.header, header_size, widths[i] - 2.0 * CELL_PADDING))
            .collect();
        let header_h = row_height(&header_cells, header_size);

        let wrapped_rows: Vec<Vec<Vec<Vec<StyledWord>>>> = table
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(i, cell)| {
                        let w = widths.get(i).copied().unwrap_or(20.0);
                        wrap_markup(cell, cell_size, w - 2.0 * CELL_PADDING)
                    })
                    .collect()
            })
            .collect();
        let row_heights: Vec<f32> = wrapped_rows
            .iter()
            .map(|cells| row_height(cells, cell_size))
            .collect();

        let page_avail = CONTENT_TOP - CONTENT_FLOOR;
        let slices = split_rows(&row_heights, header_h, self.remaining(), page_avail);

        for (i, slice) in slices.iter().enumerate() {
            let first_row_h = slice
                .clone()
                .next()
                .map(|idx| row_heights[idx])
                .unwrap_or(0.0);
            let needs_fresh_page = i > 0 || self.remaining() < header_h + first_row_h;
            if needs_fresh_page && self.y < CONTENT_TOP {
                self.new_page();
            }
            self.draw_table_header(&header_cells, &widths, header_h, header_size);
            for idx in slice.clone() {
                self.draw_table_row(&wrapped_rows[idx], &widths, row_heights[idx], cell_size);
            }
        }
    }

    fn draw_table_header(
        &mut self,
        cells: &[Vec<Vec<StyledWord>>],
        widths: &[f32],
        height: f32,
        size: f32,
    ) {
        let top = self.y;
        self.fill_rect(MARGIN, top - height, CONTENT_W, height, Rgb::new(0.55, 0.55, 0.55, None));
        self.set_text_color(Rgb::new(1.0, 1.0, 1.0, None));
        self.draw_cells(cells, widths, top, height, size, true);
        self.set_text_color(Rgb::new(0.0, 0.0, 0.0, None));
        self.stroke_row_grid(top, height, widths);
        self.y = top - height;
    }

    fn draw_table_row(
        &mut self,
        cells: &[Vec<Vec<StyledWord>>],
        widths: &[f32],
        height: f32,
        size: f32,
    ) {
        let top = self.y;
        self.draw_cells(cells, widths, top, height, size, false);
        self.stroke_row_grid(top, height, widths);
        self.y = top - height;
    }

    fn draw_cells(
        &self,
        cells: &[Vec<Vec<StyledWord>>],
        widths: &[f32],
        top: f32,
        _height: f32,
        size: f32,
        bold: bool,
    ) {
        let lh = line_height(size);
        let mut x = MARGIN;
        for (i, cell) in cells.iter().enumerate() {
            let w = widths.get(i).copied().unwrap_or(20.0);
            let style = TextStyle {
                size,
                bold,
                align: Align::Left,
                space_before: 0.0,
                space_after: 0.0,
            };
            let mut baseline = top - CELL_PADDING - lh * 0.8;
            for words in cell {
                self.draw_line_at(words, style, x + CELL_PADDING, w - 2.0 * CELL_PADDING, baseline);
                baseline -= lh;
            }
            x += w;
        }
    }

    /// Like `draw_line` but at an explicit baseline (table cells do not move
    /// the flow cursor line by line).
    fn draw_line_at(&self, words: &[StyledWord], style: TextStyle, x: f32, _width: f32, y: f32) {
        let space = text_width(" ", style.size);
        let mut cursor = x;
        for word in words {
            let font = self.font_for(style.bold || word.bold);
            self.layer
                .use_text(word.text.clone(), style.size, Mm(cursor), Mm(y), font);
            cursor += text_width(&word.text, style.size) + space;
        }
    }

    fn stroke_row_grid(&self, top: f32, height: f32, widths: &[f32]) {
        let bottom = top - height;
        self.layer.set_outline_thickness(0.75);
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self.stroke_line(MARGIN, top, MARGIN + CONTENT_W, top);
        self.stroke_line(MARGIN, bottom, MARGIN + CONTENT_W, bottom);
        let mut x = MARGIN;
        self.stroke_line(x, top, x, bottom);
        for w in widths {
            x += w;
            self.stroke_line(x, top, x, bottom);
        }
    }

    fn stroke_line(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let line = Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y1)), false),
                (Point::new(Mm(x2), Mm(y2)), false),
            ],
            is_closed: false,
        };
        self.layer.add_line(line);
    }

    fn fill_rect(&self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.layer.set_fill_color(Color::Rgb(color));
        let poly = Polygon {
            rings: vec![vec![
                (Point::new(Mm(x), Mm(y)), false),
                (Point::new(Mm(x + w), Mm(y)), false),
                (Point::new(Mm(x + w), Mm(y + h)), false),
                (Point::new(Mm(x), Mm(y + h)), false),
            ]],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        };
        self.layer.add_polygon(poly);
        self.set_text_color(Rgb::new(0.0, 0.0, 0.0, None));
    }

    fn set_text_color(&self, color: Rgb) {
        self.layer.set_fill_color(Color::Rgb(color));
    }

    /// Fixed-position signature footer, independent of flowed content.
    fn draw_footer(&self) {
        self.layer.set_outline_thickness(0.9);
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self.stroke_line(FOOTER_LEFT_LINE.0, FOOTER_LINE_Y, FOOTER_LEFT_LINE.1, FOOTER_LINE_Y);
        self.stroke_line(
            FOOTER_RIGHT_LINE.0,
            FOOTER_LINE_Y,
            FOOTER_RIGHT_LINE.1,
            FOOTER_LINE_Y,
        );

        let left_center = (FOOTER_LEFT_LINE.0 + FOOTER_LEFT_LINE.1) / 2.0;
        let right_center = (FOOTER_RIGHT_LINE.0 + FOOTER_RIGHT_LINE.1) / 2.0;
        self.draw_signature(&self.footer.empleador, left_center);
        self.draw_signature(&self.footer.trabajador, right_center);
    }

    fn draw_signature(&self, party: &SignatureParty, center_x: f32) {
        let size = 10.0;
        let rows = [
            party.nombre.clone(),
            format!("RUT: {}", party.rut),
            party.rol.clone(),
        ];
        for (text, y) in rows.iter().zip(FOOTER_TEXT_YS) {
            let x = center_x - text_width(text, size) / 2.0;
            self.layer
                .use_text(text.clone(), size, Mm(x), Mm(y), self.font_bold);
        }
    }
}
