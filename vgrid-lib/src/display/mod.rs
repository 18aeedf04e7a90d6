//! Display adapter: the host surface rows and headers are painted on.
//!
//! The grid decides what exists and where; an adapter only creates,
//! restyles and removes the elements it is told about.

mod memory;

pub use memory::*;

use serde::Serialize;

use crate::actions::ContextMenu;
use crate::columns::CellStyle;
use crate::columns::TextMeasure;
use crate::filter::FilterMenu;
use crate::render::VisualRowSpec;
use crate::sort::SortDirection;

/// One header cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderCell {
    /// Column key.
    pub key: String,
    /// Label text.
    pub label: String,
    /// Column ordinal, used as the drag-and-drop attribute.
    pub ordinal: usize,
    /// Sort indicator.
    pub sort: Option<SortDirection>,
    /// Whether the column has an active filter.
    pub filtered: bool,
    /// Column style, shared with body cells.
    pub style: CellStyle,
}

/// The whole header row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderSpec {
    /// Cells in column order.
    pub cells: Vec<HeaderCell>,
}

/// Host surface a grid renders into.
pub trait DisplayAdapter: TextMeasure {
    /// Replace the header row.
    fn render_header(&mut self, header: &HeaderSpec);

    /// Size the scrollable body to `height` pixels.
    fn set_content_height(&mut self, height: u32);

    /// Create the element for a row.
    fn create_row(&mut self, row: &VisualRowSpec);

    /// Destroy the element for a row.
    fn remove_row(&mut self, row: &VisualRowSpec);

    /// Destroy every row element.
    fn clear_rows(&mut self);

    /// Restyle the header and every live body cell in one pass.
    fn apply_column_styles(&mut self, styles: &[CellStyle]);

    /// Current width of the header container in pixels.
    fn container_width(&self) -> u32;

    /// Show the row context menu.
    fn show_context_menu(&mut self, _menu: &ContextMenu) {}

    /// Remove the row context menu and the row selection highlight.
    fn hide_context_menu(&mut self) {}

    /// Show the column filter menu.
    fn show_filter_menu(&mut self, _menu: &FilterMenu) {}

    /// Remove the column filter menu.
    fn hide_filter_menu(&mut self) {}

    /// Hand exported content to the user.
    fn offer_download(&mut self, _file_name: &str, _mime_type: &str, _content: &str) {}
}
