//! Plain-text display: one character column per average glyph.

use std::collections::BTreeMap;

use unicode_width::UnicodeWidthStr;
use vgrid_lib::columns::CellStyle;
use vgrid_lib::columns::TextMeasure;
use vgrid_lib::columns::TextRole;
use vgrid_lib::columns::truncate_to_width;
use vgrid_lib::display::DisplayAdapter;
use vgrid_lib::display::HeaderSpec;
use vgrid_lib::error::MeasureError;
use vgrid_lib::render::VisualRowSpec;

const SEPARATOR: &str = " │ ";

/// An exported file waiting to be written.
#[derive(Debug, Clone)]
pub struct PendingExport {
    pub file_name: String,
    pub content: String,
}

#[derive(Debug)]
pub struct TextDisplay {
    columns: usize,
    glyph_width: u32,
    header: HeaderSpec,
    rows: BTreeMap<u32, VisualRowSpec>,
    content_height: u32,
    export: Option<PendingExport>,
}

impl TextDisplay {
    /// A display `columns` characters wide.
    pub fn new(columns: usize, glyph_width: u32) -> Self {
        Self {
            columns,
            glyph_width: glyph_width.max(1),
            header: HeaderSpec::default(),
            rows: BTreeMap::new(),
            content_height: 0,
            export: None,
        }
    }

    pub fn content_height(&self) -> u32 {
        self.content_height
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn take_export(&mut self) -> Option<PendingExport> {
        self.export.take()
    }

    /// Character width of every column.
    fn widths(&self) -> Vec<usize> {
        let container = self.container_width();
        self.header
            .cells
            .iter()
            .map(|cell| (cell.style.resolve(container) / self.glyph_width).max(1) as usize)
            .collect()
    }

    /// Header and live rows as aligned lines.
    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut lines = Vec::with_capacity(self.rows.len() + 2);

        let labels: Vec<String> = self
            .header
            .cells
            .iter()
            .map(|cell| {
                let mut label = cell.label.clone();
                if let Some(direction) = cell.sort {
                    label.push(' ');
                    label.push_str(direction.indicator());
                }
                if cell.filtered {
                    label.push_str(" *");
                }
                label
            })
            .collect();
        lines.push(line(&labels, &widths));
        lines.push(
            widths
                .iter()
                .map(|w| "─".repeat(*w))
                .collect::<Vec<_>>()
                .join("─┼─"),
        );

        for row in self.rows.values() {
            lines.push(line(&row.texts(), &widths));
        }
        lines.join("\n")
    }
}

fn fit(text: &str, width: usize) -> String {
    let cut = truncate_to_width(text, width);
    let pad = width.saturating_sub(cut.width());
    format!("{}{}", cut, " ".repeat(pad))
}

fn line(texts: &[String], widths: &[usize]) -> String {
    texts
        .iter()
        .zip(widths)
        .map(|(text, width)| fit(text, *width))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
        .trim_end()
        .to_string()
}

impl TextMeasure for TextDisplay {
    fn measure_text(&self, text: &str, _role: TextRole) -> Result<u32, MeasureError> {
        Ok(text.width() as u32 * self.glyph_width)
    }
}

impl DisplayAdapter for TextDisplay {
    fn render_header(&mut self, header: &HeaderSpec) {
        self.header = header.clone();
    }

    fn set_content_height(&mut self, height: u32) {
        self.content_height = height;
    }

    fn create_row(&mut self, row: &VisualRowSpec) {
        log::trace!("row {} at {}", row.id, row.top);
        self.rows.insert(row.top, row.clone());
    }

    fn remove_row(&mut self, row: &VisualRowSpec) {
        self.rows.remove(&row.top);
    }

    fn clear_rows(&mut self) {
        self.rows.clear();
    }

    fn apply_column_styles(&mut self, styles: &[CellStyle]) {
        for (cell, style) in self.header.cells.iter_mut().zip(styles) {
            cell.style = *style;
        }
        for row in self.rows.values_mut() {
            row.restyle(styles);
        }
    }

    fn container_width(&self) -> u32 {
        self.columns as u32 * self.glyph_width
    }

    fn offer_download(&mut self, file_name: &str, _mime_type: &str, content: &str) {
        self.export = Some(PendingExport {
            file_name: file_name.to_string(),
            content: content.to_string(),
        });
    }
}
