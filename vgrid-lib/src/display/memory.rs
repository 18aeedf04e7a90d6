//! Headless display that keeps everything in memory.

use std::collections::BTreeMap;

use super::DisplayAdapter;
use super::HeaderSpec;
use crate::actions::ContextMenu;
use crate::columns::CellStyle;
use crate::columns::TextMeasure;
use crate::columns::TextRole;
use crate::error::MeasureError;
use crate::filter::FilterMenu;
use crate::render::VisualRowSpec;

/// A file handed to [`DisplayAdapter::offer_download`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub mime_type: String,
    pub content: String,
}

/// In-memory [`DisplayAdapter`] for tests and headless hosts.
///
/// Rows are keyed by their vertical offset, so iteration follows screen
/// order.
#[derive(Debug, Clone, Default)]
pub struct MemoryDisplay {
    header: HeaderSpec,
    rows: BTreeMap<u32, VisualRowSpec>,
    content_height: u32,
    container_width: u32,
    glyph_width: Option<u32>,
    column_styles: Vec<CellStyle>,
    style_passes: usize,
    created: usize,
    removed: usize,
    context_menu: Option<ContextMenu>,
    filter_menu: Option<FilterMenu>,
    downloads: Vec<Download>,
}

impl MemoryDisplay {
    /// Create a display with a header container `container_width` wide.
    /// Text measurement is unavailable.
    pub fn new(container_width: u32) -> Self {
        Self {
            container_width,
            ..Default::default()
        }
    }

    /// Measure text as `glyph_width` pixels per character.
    pub fn with_glyph_width(mut self, glyph_width: u32) -> Self {
        self.glyph_width = Some(glyph_width);
        self
    }

    /// Change the container width.
    pub fn set_container_width(&mut self, width: u32) {
        self.container_width = width;
    }

    /// The current header.
    pub fn header(&self) -> &HeaderSpec {
        &self.header
    }

    /// Live rows in screen order.
    pub fn rows(&self) -> impl Iterator<Item = &VisualRowSpec> {
        self.rows.values()
    }

    /// Identifiers of live rows in screen order.
    pub fn row_ids(&self) -> Vec<String> {
        self.rows.values().map(|r| r.id.clone()).collect()
    }

    /// Live row by identifier.
    pub fn row(&self, id: &str) -> Option<&VisualRowSpec> {
        self.rows.values().find(|r| r.id == id)
    }

    /// Number of live rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Body height last set.
    pub fn content_height(&self) -> u32 {
        self.content_height
    }

    /// Styles from the last restyle pass.
    pub fn column_styles(&self) -> &[CellStyle] {
        &self.column_styles
    }

    /// Number of restyle passes.
    pub fn style_passes(&self) -> usize {
        self.style_passes
    }

    /// Total row elements created.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Total row elements removed one by one.
    pub fn removed(&self) -> usize {
        self.removed
    }

    /// The open context menu.
    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    /// The open filter menu.
    pub fn filter_menu(&self) -> Option<&FilterMenu> {
        self.filter_menu.as_ref()
    }

    /// Files offered so far.
    pub fn downloads(&self) -> &[Download] {
        &self.downloads
    }
}

impl TextMeasure for MemoryDisplay {
    fn measure_text(&self, text: &str, _role: TextRole) -> Result<u32, MeasureError> {
        match self.glyph_width {
            Some(px) => Ok(text.chars().count() as u32 * px),
            None => Err(MeasureError::Unavailable),
        }
    }
}

impl DisplayAdapter for MemoryDisplay {
    fn render_header(&mut self, header: &HeaderSpec) {
        self.header = header.clone();
    }

    fn set_content_height(&mut self, height: u32) {
        self.content_height = height;
    }

    fn create_row(&mut self, row: &VisualRowSpec) {
        self.created += 1;
        self.rows.insert(row.top, row.clone());
    }

    fn remove_row(&mut self, row: &VisualRowSpec) {
        if self.rows.remove(&row.top).is_some() {
            self.removed += 1;
        }
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
        self.column_styles = styles.to_vec();
        self.style_passes += 1;
    }

    fn container_width(&self) -> u32 {
        self.container_width
    }

    fn show_context_menu(&mut self, menu: &ContextMenu) {
        self.context_menu = Some(menu.clone());
    }

    fn hide_context_menu(&mut self) {
        self.context_menu = None;
    }

    fn show_filter_menu(&mut self, menu: &FilterMenu) {
        self.filter_menu = Some(menu.clone());
    }

    fn hide_filter_menu(&mut self) {
        self.filter_menu = None;
    }

    fn offer_download(&mut self, file_name: &str, mime_type: &str, content: &str) {
        self.downloads.push(Download {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            content: content.to_string(),
        });
    }
}
