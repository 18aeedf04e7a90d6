//! Grid configuration

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// Layout, timing and measurement settings for a grid.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use vgrid_lib::config::GridConfig;
///
/// let config = GridConfig::default()
///     .with_viewport_height(600)
///     .with_load_more_debounce(Duration::from_millis(150));
/// assert_eq!(config.row_height, 35);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Fixed height of every row in pixels.
    ///
    /// Default: 35
    pub row_height: u32,

    /// Height of the scrollable rows viewport in pixels.
    ///
    /// Default: 400
    pub viewport_height: u32,

    /// Rows above the viewport that stay materialized.
    ///
    /// Default: 2
    pub backward_slack_rows: u32,

    /// Tolerance added to the bottom-of-viewport test.
    ///
    /// Default: 4
    pub bottom_slack: u32,

    /// Delay collapsing scroll bursts into one "load more" request.
    ///
    /// Default: 300 ms
    pub load_more_debounce: Duration,

    /// Floor for every column width.
    ///
    /// Default: 80
    pub min_column_width: u32,

    /// Estimated width of the sort/filter affordances in a header cell.
    ///
    /// Default: 50
    pub header_actions_allowance: u32,

    /// Horizontal padding of a header or body cell (both sides).
    ///
    /// Default: 32
    pub cell_padding: u32,

    /// Materialized rows sampled for content-derived widths.
    ///
    /// Default: 10
    pub width_sample_rows: usize,

    /// Average glyph width for the text-width estimate.
    ///
    /// Default: 7
    pub average_glyph_width: u32,

    /// Window after a resize gesture during which a header click is ignored.
    ///
    /// Default: 10 ms
    pub resize_click_guard: Duration,

    /// Title of the row context menu.
    ///
    /// Default: "Title"
    pub context_menu_title: String,

    /// File name offered for CSV export.
    ///
    /// Default: "export.csv"
    pub export_file_name: String,

    /// Record field holding the unique identifier.
    ///
    /// Default: "id"
    pub id_field: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_height: 35,
            viewport_height: 400,
            backward_slack_rows: 2,
            bottom_slack: 4,
            load_more_debounce: Duration::from_millis(300),
            min_column_width: 80,
            header_actions_allowance: 50,
            cell_padding: 32,
            width_sample_rows: 10,
            average_glyph_width: 7,
            resize_click_guard: Duration::from_millis(10),
            context_menu_title: "Title".to_string(),
            export_file_name: "export.csv".to_string(),
            id_field: "id".to_string(),
        }
    }
}

impl GridConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row height.
    pub fn with_row_height(mut self, height: u32) -> Self {
        self.row_height = height.max(1);
        self
    }

    /// Sets the viewport height.
    pub fn with_viewport_height(mut self, height: u32) -> Self {
        self.viewport_height = height;
        self
    }

    /// Sets the "load more" debounce delay.
    pub fn with_load_more_debounce(mut self, delay: Duration) -> Self {
        self.load_more_debounce = delay;
        self
    }

    /// Sets the context menu title.
    pub fn with_context_menu_title(mut self, title: impl Into<String>) -> Self {
        self.context_menu_title = title.into();
        self
    }

    /// Sets the identifier field.
    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Sets the export file name.
    pub fn with_export_file_name(mut self, name: impl Into<String>) -> Self {
        self.export_file_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: GridConfig =
            serde_json::from_str(r#"{"row_height": 20, "id_field": "key"}"#).unwrap();
        assert_eq!(config.row_height, 20);
        assert_eq!(config.id_field, "key");
        assert_eq!(config.viewport_height, 400);
        assert_eq!(config.load_more_debounce, Duration::from_millis(300));
    }

    #[test]
    fn test_row_height_never_zero() {
        assert_eq!(GridConfig::new().with_row_height(0).row_height, 1);
    }
}
