//! Column manager: ordered column definitions and the header state machine
//! (reordering, resizing, auto-fit, content minimum widths, sort toggles).

mod measure;
mod width;

pub use measure::*;
pub use width::*;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use crate::config::GridConfig;
use crate::error::ColumnSpecError;
use crate::error::FormatterError;
use crate::model::Record;
use crate::model::Value;
use crate::sort::SortDirection;
use crate::sort::SortSpec;

/// Caller-supplied cell formatter. Receives the raw resolved value,
/// `Value::Null` included.
pub type Formatter = Arc<dyn Fn(&Value) -> Result<String, FormatterError> + Send + Sync>;

// =============================================================================
// Column setup
// =============================================================================

/// Caller-facing column descriptor.
#[derive(Clone, Default)]
pub struct ColumnSetup {
    /// Record key shown in this column (dotted paths allowed).
    pub name: String,
    /// Header label; defaults to `name`.
    pub display: Option<String>,
    /// Width as `"N%"`, `"Npx"` or a bare pixel count.
    pub width: Option<String>,
    /// Cell formatter.
    pub format: Option<Formatter>,
}

impl ColumnSetup {
    /// Create a descriptor for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the header label.
    pub fn display(mut self, label: impl Into<String>) -> Self {
        self.display = Some(label.into());
        self
    }

    /// Set the width.
    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    /// Set the cell formatter.
    pub fn format<F>(mut self, format: F) -> Self
    where
        F: Fn(&Value) -> Result<String, FormatterError> + Send + Sync + 'static,
    {
        self.format = Some(Arc::new(format));
        self
    }
}

impl fmt::Debug for ColumnSetup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSetup")
            .field("name", &self.name)
            .field("display", &self.display)
            .field("width", &self.width)
            .field("format", &self.format.is_some())
            .finish()
    }
}

// =============================================================================
// Column definition
// =============================================================================

/// One column of the grid.
#[derive(Clone)]
pub struct ColumnDef {
    /// Record key (dotted paths allowed).
    pub key: String,
    /// Header label.
    pub label: String,
    /// Current width spec.
    pub width: ColumnWidth,
    /// Cell formatter.
    pub format: Option<Formatter>,
    /// Sort state; `None` is unsorted.
    pub sort: Option<SortDirection>,
    /// Cached content-derived minimum width.
    pub content_min_width: Option<u32>,
    /// Position in the column order, 0..N-1.
    pub ordinal: usize,
}

impl ColumnDef {
    /// Unformatted, unsorted column with an explicit width.
    pub fn new(key: impl Into<String>, width: ColumnWidth) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            width,
            format: None,
            sort: None,
            content_min_width: None,
            ordinal: 0,
        }
    }

    /// Style applied to this column's header and body cells.
    pub fn style(&self) -> CellStyle {
        CellStyle {
            width: self.width,
            content_min_width: self.content_min_width,
        }
    }

    /// Lower bound for a manual resize.
    pub fn resize_floor(&self, min_column_width: u32) -> u32 {
        self.content_min_width.unwrap_or(min_column_width)
    }
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("width", &self.width)
            .field("format", &self.format.is_some())
            .field("sort", &self.sort)
            .field("content_min_width", &self.content_min_width)
            .field("ordinal", &self.ordinal)
            .finish()
    }
}

fn column_from_setup(setup: &ColumnSetup, default_width: ColumnWidth) -> Result<ColumnDef, ColumnSpecError> {
    if setup.name.trim().is_empty() {
        return Err(ColumnSpecError::EmptyName);
    }
    let width = match &setup.width {
        Some(raw) => raw
            .parse()
            .map_err(|_| ColumnSpecError::invalid_width(&setup.name, raw))?,
        None => default_width,
    };
    let mut column = ColumnDef::new(&setup.name, width);
    if let Some(label) = &setup.display {
        column.label = label.clone();
    }
    column.format = setup.format.clone();
    Ok(column)
}

/// Build column definitions.
///
/// With explicit setup, one column per valid descriptor; invalid ones are
/// logged and skipped. Without, one column per key of `sample`, in its
/// field order. Columns without a width share the container equally.
pub fn build_columns(setup: Option<&[ColumnSetup]>, sample: Option<&Record>) -> Vec<ColumnDef> {
    let mut columns = match setup {
        Some(setup) => {
            let valid: Vec<&ColumnSetup> = setup
                .iter()
                .filter(|s| {
                    let width_ok = s.width.as_ref().is_none_or(|w| w.parse::<ColumnWidth>().is_ok());
                    !s.name.trim().is_empty() && width_ok
                })
                .collect();
            let share = ColumnWidth::equal_share(valid.len());
            setup
                .iter()
                .filter_map(|s| match column_from_setup(s, share) {
                    Ok(column) => Some(column),
                    Err(err) => {
                        log::warn!("skipping column: {}", err);
                        None
                    }
                })
                .collect::<Vec<_>>()
        }
        None => {
            let keys: Vec<&str> = sample.map(|r| r.keys().collect()).unwrap_or_default();
            let share = ColumnWidth::equal_share(keys.len());
            keys.into_iter().map(|k| ColumnDef::new(k, share)).collect()
        }
    };
    for (ordinal, column) in columns.iter_mut().enumerate() {
        column.ordinal = ordinal;
    }
    columns
}

// =============================================================================
// Column manager
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct ResizeGesture {
    ordinal: usize,
    start_x: i32,
    start_width: u32,
}

/// Owns the ordered columns and their interactive state.
#[derive(Debug, Clone)]
pub struct ColumnManager {
    columns: Vec<ColumnDef>,
    resize: Option<ResizeGesture>,
    last_resize_end: Option<Instant>,
    min_column_width: u32,
    resize_click_guard: Duration,
}

impl ColumnManager {
    /// Wrap built columns.
    pub fn new(columns: Vec<ColumnDef>, config: &GridConfig) -> Self {
        let mut manager = Self {
            columns,
            resize: None,
            last_resize_end: None,
            min_column_width: config.min_column_width,
            resize_click_guard: config.resize_click_guard,
        };
        manager.renumber();
        manager
    }

    fn renumber(&mut self) {
        for (ordinal, column) in self.columns.iter_mut().enumerate() {
            column.ordinal = ordinal;
        }
    }

    /// Replace every column. Resets gesture state.
    pub fn replace(&mut self, columns: Vec<ColumnDef>) {
        self.columns = columns;
        self.resize = None;
        self.renumber();
    }

    /// The columns in display order.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Get a column by ordinal.
    pub fn get(&self, ordinal: usize) -> Option<&ColumnDef> {
        self.columns.get(ordinal)
    }

    /// Ordinal of the column showing `key`.
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Styles for every column, in display order.
    pub fn styles(&self) -> Vec<CellStyle> {
        self.columns.iter().map(ColumnDef::style).collect()
    }

    // -------------------------------------------------------------------------
    // Reorder
    // -------------------------------------------------------------------------

    /// Swap two columns' full definitions. Out-of-range ordinals and
    /// `source == target` are no-ops. Returns `true` if anything moved.
    pub fn reorder(&mut self, source: usize, target: usize) -> bool {
        if source == target || source >= self.columns.len() || target >= self.columns.len() {
            return false;
        }
        self.columns.swap(source, target);
        self.renumber();
        true
    }

    /// [`reorder`](Self::reorder) from raw ordinal attributes of a drop
    /// gesture. Missing or non-numeric values are a no-op.
    pub fn reorder_from_attrs(&mut self, source: Option<&str>, target: Option<&str>) -> bool {
        let parse = |raw: Option<&str>| raw.and_then(|s| s.trim().parse::<usize>().ok());
        match (parse(source), parse(target)) {
            (Some(source), Some(target)) => self.reorder(source, target),
            _ => {
                log::debug!("ignoring column drop with invalid ordinals {:?} -> {:?}", source, target);
                false
            }
        }
    }

    // -------------------------------------------------------------------------
    // Resize
    // -------------------------------------------------------------------------

    /// Set a column to `width_px`, clamped to its content minimum (or the
    /// configured floor when unmeasured). Returns the applied width.
    pub fn resize(&mut self, ordinal: usize, width_px: u32) -> Option<u32> {
        let floor = self.min_column_width;
        let column = self.columns.get_mut(ordinal)?;
        let width = width_px.max(column.resize_floor(floor));
        column.width = ColumnWidth::MinPx(width);
        Some(width)
    }

    /// Start a resize drag on `ordinal`. `rendered_width` is the column's
    /// current laid-out width.
    pub fn begin_resize(&mut self, ordinal: usize, pointer_x: i32, rendered_width: u32) -> bool {
        if ordinal >= self.columns.len() {
            return false;
        }
        self.resize = Some(ResizeGesture {
            ordinal,
            start_x: pointer_x,
            start_width: rendered_width,
        });
        true
    }

    /// Pointer moved during a resize drag. Returns the ordinal and applied
    /// width, or `None` when no drag is active.
    pub fn drag_resize(&mut self, pointer_x: i32) -> Option<(usize, u32)> {
        let gesture = self.resize?;
        let delta = pointer_x as i64 - gesture.start_x as i64;
        let requested = (gesture.start_width as i64 + delta).max(0);
        let requested = u32::try_from(requested).unwrap_or(u32::MAX);
        self.resize(gesture.ordinal, requested)
            .map(|width| (gesture.ordinal, width))
    }

    /// Finish a resize drag. Header clicks are ignored for the configured
    /// guard window after this.
    pub fn end_resize(&mut self, now: Instant) -> bool {
        if self.resize.take().is_some() {
            self.last_resize_end = Some(now);
            true
        } else {
            false
        }
    }

    /// Returns `true` while a resize drag is active.
    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    /// Whether a header click at `now` should act (not swallowed by a
    /// just-finished resize).
    pub fn accepts_click(&self, now: Instant) -> bool {
        if self.is_resizing() {
            return false;
        }
        self.last_resize_end
            .is_none_or(|end| now.saturating_duration_since(end) >= self.resize_click_guard)
    }

    // -------------------------------------------------------------------------
    // Auto-fit and content widths
    // -------------------------------------------------------------------------

    /// Give every column `container_width / count` pixels, discarding
    /// custom widths. No-op without columns.
    pub fn auto_fit(&mut self, container_width: u32) -> Option<u32> {
        if self.columns.is_empty() {
            return None;
        }
        let equal = container_width / self.columns.len() as u32;
        for column in &mut self.columns {
            column.width = ColumnWidth::Px(equal);
        }
        Some(equal)
    }

    /// Recompute every column's content-derived minimum width from the
    /// header labels and sampled cell texts (`samples[row][column]`).
    pub fn compute_content_min_widths<M, S>(&mut self, samples: &[S], measure: &M, config: &GridConfig)
    where
        M: TextMeasure + ?Sized,
        S: AsRef<[String]>,
    {
        let glyph = config.average_glyph_width;
        for (index, column) in self.columns.iter_mut().enumerate() {
            let header = measure_or_estimate(measure, &column.label, TextRole::Header, glyph)
                + config.header_actions_allowance
                + config.cell_padding;
            let cells = samples
                .iter()
                .take(config.width_sample_rows)
                .filter_map(|row| row.as_ref().get(index))
                .map(|text| measure_or_estimate(measure, text, TextRole::Cell, glyph) + config.cell_padding)
                .max()
                .unwrap_or(0);
            column.content_min_width = Some(header.max(cells).max(config.min_column_width));
        }
    }

    // -------------------------------------------------------------------------
    // Sort state
    // -------------------------------------------------------------------------

    /// Advance the sort toggle of `ordinal` and clear every other column.
    /// Returns the new active sort.
    pub fn toggle_sort(&mut self, ordinal: usize) -> Option<SortSpec> {
        let current = self.columns.get(ordinal)?.sort;
        let direction = SortDirection::toggled(current);
        for column in &mut self.columns {
            column.sort = None;
        }
        let column = &mut self.columns[ordinal];
        column.sort = Some(direction);
        Some(SortSpec::new(&column.key, direction))
    }

    /// Show `spec` as the only sorted column, or clear all indicators.
    pub fn set_sort(&mut self, spec: Option<&SortSpec>) {
        for column in &mut self.columns {
            column.sort = spec
                .filter(|s| s.key == column.key)
                .map(|s| s.direction);
        }
    }

    /// The active sort, if any column is sorted.
    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.columns
            .iter()
            .find_map(|c| c.sort.map(|d| SortSpec::new(&c.key, d)))
    }
}
