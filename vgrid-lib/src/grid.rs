//! The grid: one virtual-scroll table bound to a display.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use crate::actions::ActionRegistry;
use crate::actions::ContextMenu;
use crate::actions::RowAction;
use crate::columns::ColumnDef;
use crate::columns::ColumnManager;
use crate::columns::ColumnSetup;
use crate::columns::build_columns;
use crate::config::GridConfig;
use crate::display::DisplayAdapter;
use crate::display::HeaderCell;
use crate::display::HeaderSpec;
use crate::error::GridError;
use crate::export;
use crate::filter;
use crate::filter::AllowSet;
use crate::filter::FilterMenu;
use crate::model::Record;
use crate::pagination::LoadMoreDone;
use crate::pagination::LoadMoreHook;
use crate::pagination::Pagination;
use crate::pagination::ScrollEvent;
use crate::render;
use crate::render::VisualRowSpec;
use crate::sort::SortSpec;
use crate::source::DataSource;
use crate::store;
use crate::store::Row;
use crate::store::RowStore;
use crate::store::SharedRecord;
use crate::view;
use crate::view::ViewState;
use crate::visibility;
use crate::visibility::Window;

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`Grid`].
///
/// # Example
///
/// ```
/// use vgrid_lib::Grid;
/// use vgrid_lib::columns::ColumnSetup;
/// use vgrid_lib::display::MemoryDisplay;
/// use vgrid_lib::model::Record;
///
/// let grid = Grid::builder(MemoryDisplay::new(800))
///     .columns(vec![ColumnSetup::new("name").display("Name")])
///     .build(vec![Record::new().set("id", 1i64).set("name", "Ann")])
///     .unwrap();
/// assert_eq!(grid.display().row_ids(), vec!["1"]);
/// ```
pub struct GridBuilder<D> {
    display: D,
    config: GridConfig,
    setup: Option<Vec<ColumnSetup>>,
    row_actions: Vec<RowAction>,
    actions: ActionRegistry,
    load_more: Option<LoadMoreHook>,
}

impl<D: DisplayAdapter> GridBuilder<D> {
    /// Start a builder for a grid painting on `display`.
    pub fn new(display: D) -> Self {
        Self {
            display,
            config: GridConfig::default(),
            setup: None,
            row_actions: Vec::new(),
            actions: ActionRegistry::default(),
            load_more: None,
        }
    }

    /// Set the configuration.
    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    /// Use explicit columns instead of deriving them from the first record.
    pub fn columns(mut self, setup: Vec<ColumnSetup>) -> Self {
        self.setup = Some(setup);
        self
    }

    /// Buttons of the row context menu. No menu opens without any.
    pub fn row_actions(mut self, actions: Vec<RowAction>) -> Self {
        self.row_actions = actions;
        self
    }

    /// Callbacks the row actions refer to by name.
    pub fn actions(mut self, registry: ActionRegistry) -> Self {
        self.actions = registry;
        self
    }

    /// Hook asked for more data when the viewport reaches the bottom.
    pub fn on_load_more<F>(mut self, hook: F) -> Self
    where
        F: FnMut(LoadMoreDone) + Send + Sync + 'static,
    {
        self.load_more = Some(Box::new(hook));
        self
    }

    /// Build the grid over `records` and paint the first window.
    pub fn build(self, records: Vec<Record>) -> Result<Grid<D>, GridError> {
        let original = store::admit(records, &self.config.id_field);
        let columns = build_columns(self.setup.as_deref(), original.first().map(AsRef::as_ref));
        let mut grid = Grid {
            store: RowStore::new(self.config.row_height),
            columns: ColumnManager::new(columns, &self.config),
            pagination: Pagination::new(self.config.load_more_debounce),
            config: self.config,
            display: self.display,
            setup: self.setup,
            original,
            filtered: None,
            view: ViewState::default(),
            scroll_top: 0,
            live: BTreeMap::new(),
            load_more: self.load_more,
            actions: self.actions,
            row_actions: self.row_actions,
            context_menu: None,
            selected: None,
            filter_menu: None,
        };
        log::debug!(
            "grid created with {} records and {} columns",
            grid.original.len(),
            grid.columns.len()
        );
        grid.render_header();
        grid.rebuild()?;
        Ok(grid)
    }

    /// Build the grid once `source` yields its records.
    pub async fn build_from(self, source: DataSource) -> Result<Grid<D>, GridError> {
        let records = source.resolve().await;
        self.build(records)
    }
}

// =============================================================================
// Grid
// =============================================================================

/// A windowed, data-bound table.
///
/// Holds the original records, the current view over them (sort, filters,
/// search) and the logical rows of that view. Only rows inside the viewport,
/// plus a little slack above it, exist on the display at any time.
pub struct Grid<D> {
    config: GridConfig,
    display: D,
    setup: Option<Vec<ColumnSetup>>,
    columns: ColumnManager,
    store: RowStore,
    original: Vec<SharedRecord>,
    filtered: Option<Vec<SharedRecord>>,
    view: ViewState,
    scroll_top: u32,
    /// Visual rows on the display, keyed by position.
    live: BTreeMap<u32, VisualRowSpec>,
    pagination: Pagination,
    load_more: Option<LoadMoreHook>,
    actions: ActionRegistry,
    row_actions: Vec<RowAction>,
    context_menu: Option<ContextMenu>,
    selected: Option<SharedRecord>,
    filter_menu: Option<FilterMenu>,
}

impl<D: DisplayAdapter> Grid<D> {
    /// Start building a grid that paints on `display`.
    pub fn builder(display: D) -> GridBuilder<D> {
        GridBuilder::new(display)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// The display.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Mutable access to the display, e.g. to change its size.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// The columns in display order.
    pub fn columns(&self) -> &[ColumnDef] {
        self.columns.columns()
    }

    /// The logical rows of the current view, in display order.
    pub fn rows(&self) -> &[Row] {
        self.store.rows()
    }

    /// The current view state.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Every record, in ingestion order.
    pub fn original_records(&self) -> &[SharedRecord] {
        &self.original
    }

    /// Records passing the filters and search, in ingestion order. `None`
    /// when nothing narrows the view.
    pub fn filtered_records(&self) -> Option<&[SharedRecord]> {
        self.filtered.as_deref()
    }

    /// Current scroll offset.
    pub fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    /// Height of all rows of the view.
    pub fn content_height(&self) -> u32 {
        self.store.content_height()
    }

    /// Identifiers of materialized rows, in display order.
    pub fn materialized_ids(&self) -> Vec<String> {
        self.store
            .materialized()
            .map(|row| row.id(&self.config.id_field))
            .collect()
    }

    /// Whether a "load more" request is outstanding.
    pub fn is_loading_more(&self) -> bool {
        self.pagination.is_loading()
    }

    /// Whether more data may still be requested.
    pub fn can_load_more(&self) -> bool {
        self.pagination.can_load_more()
    }

    /// The open row context menu.
    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    /// The record the context menu was opened on.
    pub fn selected_record(&self) -> Option<&Record> {
        self.selected.as_deref()
    }

    /// The open filter menu.
    pub fn filter_menu(&self) -> Option<&FilterMenu> {
        self.filter_menu.as_ref()
    }

    // -------------------------------------------------------------------------
    // Pipeline
    // -------------------------------------------------------------------------

    /// Rerun filters, search and sort from the original records, then
    /// repaint.
    fn rebuild(&mut self) -> Result<(), GridError> {
        self.filtered = view::rebuild(&self.original, &self.view, &mut self.store);
        self.repaint()
    }

    /// Drop every visual row and paint the window from scratch.
    fn repaint(&mut self) -> Result<(), GridError> {
        self.display.clear_rows();
        self.live.clear();
        self.store.reposition();
        self.display.set_content_height(self.store.content_height());

        let max_scroll = self
            .store
            .content_height()
            .saturating_sub(self.config.viewport_height);
        self.scroll_top = self.scroll_top.min(max_scroll);

        self.refresh_visibility()?;
        self.update_column_widths();
        Ok(())
    }

    /// Materialize and dematerialize rows for the current scroll offset.
    fn refresh_visibility(&mut self) -> Result<(), GridError> {
        let window = Window {
            scroll_offset: self.scroll_top,
            viewport_height: self.config.viewport_height,
            row_height: self.store.row_height(),
            backward_slack_rows: self.config.backward_slack_rows,
        };
        let change = visibility::resolve(self.store.rows(), window);
        if change.is_empty() {
            return Ok(());
        }
        log::trace!(
            "scroll {}: +{} -{} rows",
            self.scroll_top,
            change.to_materialize.len(),
            change.to_dematerialize.len()
        );

        for index in change.to_dematerialize {
            let Some(position) = self.store.get(index).map(|row| row.position) else {
                continue;
            };
            if let Some(spec) = self.live.remove(&position) {
                self.display.remove_row(&spec);
            }
            self.store.set_materialized(index, false);
        }

        for index in change.to_materialize {
            let Some(row) = self.store.get(index) else {
                continue;
            };
            let spec = render::render_row(row, self.columns.columns(), &self.config.id_field)?;
            self.display.create_row(&spec);
            self.live.insert(spec.top, spec);
            self.store.set_materialized(index, true);
        }
        Ok(())
    }

    /// Recompute content minimum widths and restyle header and body
    /// together.
    fn update_column_widths(&mut self) {
        let samples: Vec<Vec<String>> = self
            .live
            .values()
            .take(self.config.width_sample_rows)
            .map(VisualRowSpec::texts)
            .collect();
        self.columns
            .compute_content_min_widths(&samples, &self.display, &self.config);

        let styles = self.columns.styles();
        for spec in self.live.values_mut() {
            spec.restyle(&styles);
        }
        self.display.apply_column_styles(&styles);
    }

    fn render_header(&mut self) {
        let filters = self.view.filters();
        let cells = self
            .columns
            .columns()
            .iter()
            .map(|column| HeaderCell {
                key: column.key.clone(),
                label: column.label.clone(),
                ordinal: column.ordinal,
                sort: column.sort,
                filtered: filters.contains(&column.key),
                style: column.style(),
            })
            .collect();
        self.display.render_header(&HeaderSpec { cells });
    }

    /// Derive columns from the first record when the grid started empty
    /// without explicit columns.
    fn ensure_columns(&mut self) {
        if !self.columns.is_empty() || self.setup.is_some() {
            return;
        }
        let Some(first) = self.original.first() else {
            return;
        };
        let columns = build_columns(None, Some(first.as_ref()));
        log::debug!("derived {} columns from first record", columns.len());
        self.columns.replace(columns);
        self.render_header();
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    /// Replace every record. Sort, filters and search stay in force.
    pub fn update_data(&mut self, records: Vec<Record>) -> Result<(), GridError> {
        self.original = store::admit(records, &self.config.id_field);
        log::debug!("data replaced with {} records", self.original.len());
        self.ensure_columns();
        self.close_context_menu();
        self.cancel_filter_menu();
        self.rebuild()
    }

    /// Append records. An empty batch means the source is exhausted and
    /// stops further "load more" requests.
    pub fn append_data(&mut self, records: Vec<Record>) -> Result<(), GridError> {
        if records.is_empty() {
            log::info!("empty batch appended, no more data will be requested");
            self.pagination.stop();
            return Ok(());
        }
        let appended = store::admit(records, &self.config.id_field);
        log::debug!("appending {} records", appended.len());
        self.original.extend(appended);
        self.ensure_columns();
        self.rebuild()
    }

    /// [`update_data`](Self::update_data) from a possibly deferred source.
    pub async fn update_data_from(&mut self, source: DataSource) -> Result<(), GridError> {
        let records = source.resolve().await;
        self.update_data(records)
    }

    /// [`append_data`](Self::append_data) from a possibly deferred source.
    pub async fn append_data_from(&mut self, source: DataSource) -> Result<(), GridError> {
        let records = source.resolve().await;
        self.append_data(records)
    }

    /// Stop requesting more data.
    pub fn stop_loading_more(&mut self) {
        self.pagination.stop();
    }

    /// Drop filters and search, keeping the sort.
    pub fn reset(&mut self) -> Result<(), GridError> {
        self.view = self.view.unfiltered();
        self.cancel_filter_menu();
        self.render_header();
        self.rebuild()
    }

    // -------------------------------------------------------------------------
    // Sort
    // -------------------------------------------------------------------------

    /// Header click on `ordinal`: advance its sort toggle. Ignored right
    /// after a resize gesture. Returns `true` when the sort changed.
    pub fn header_click(&mut self, ordinal: usize, now: Instant) -> Result<bool, GridError> {
        if !self.columns.accepts_click(now) {
            log::debug!("header click on {} swallowed after resize", ordinal);
            return Ok(false);
        }
        let Some(spec) = self.columns.toggle_sort(ordinal) else {
            return Ok(false);
        };
        self.apply_sort(Some(spec))?;
        Ok(true)
    }

    /// Set or clear the sort directly.
    pub fn sort_by(&mut self, spec: Option<SortSpec>) -> Result<(), GridError> {
        self.columns.set_sort(spec.as_ref());
        self.apply_sort(spec)
    }

    fn apply_sort(&mut self, spec: Option<SortSpec>) -> Result<(), GridError> {
        log::debug!("sort: {:?}", spec);
        self.view = self.view.with_sort(spec);
        self.close_context_menu();
        self.render_header();
        self.rebuild()
    }

    // -------------------------------------------------------------------------
    // Filter and search
    // -------------------------------------------------------------------------

    /// Allow only `allowed` values in column `key`. Allowing every
    /// distinct value removes the filter.
    pub fn set_column_filter(&mut self, key: &str, allowed: AllowSet) -> Result<(), GridError> {
        let unique = filter::unique_values(&self.original, key);
        let mut filters = self.view.filters().clone();
        let kept = filters.set(key, allowed, &unique);
        log::debug!("filter on '{}' {}", key, if kept { "set" } else { "removed" });
        self.view = self.view.with_filters(filters);
        self.render_header();
        self.rebuild()
    }

    /// Remove the filter on `key`.
    pub fn clear_column_filter(&mut self, key: &str) -> Result<(), GridError> {
        let mut filters = self.view.filters().clone();
        if filters.remove(key).is_none() {
            return Ok(());
        }
        self.view = self.view.with_filters(filters);
        self.render_header();
        self.rebuild()
    }

    /// Remove every column filter. Sort and search stay.
    pub fn clear_all_filters(&mut self) -> Result<(), GridError> {
        self.view = self.view.with_filters(Default::default());
        self.render_header();
        self.rebuild()
    }

    /// Show only records containing `term` in any field (case-insensitive).
    pub fn search(&mut self, term: &str) -> Result<(), GridError> {
        self.view = self.view.with_search(Some(term));
        self.rebuild()
    }

    /// Drop the search.
    pub fn clear_search(&mut self) -> Result<(), GridError> {
        self.view = self.view.with_search(None);
        self.rebuild()
    }

    /// Open the filter menu for `key`, or close it when it is already open
    /// for that column.
    pub fn toggle_filter_menu(&mut self, key: &str) -> Option<&FilterMenu> {
        if let Some(open) = self.filter_menu.take() {
            self.display.hide_filter_menu();
            if open.key() == key {
                return None;
            }
        }
        self.columns.position_of(key)?;

        let values = filter::unique_values(&self.original, key);
        let menu = FilterMenu::open(key, values, self.view.filters().get(key));
        self.display.show_filter_menu(&menu);
        self.filter_menu = Some(menu);
        self.filter_menu.as_ref()
    }

    /// Edit the open filter menu (checkboxes, search box) and redisplay it.
    pub fn edit_filter_menu<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&mut FilterMenu),
    {
        let Some(menu) = self.filter_menu.as_mut() else {
            return false;
        };
        edit(menu);
        self.display.show_filter_menu(menu);
        true
    }

    /// Apply the open filter menu's selection and close it.
    pub fn apply_filter_menu(&mut self) -> Result<bool, GridError> {
        let Some(menu) = self.filter_menu.take() else {
            return Ok(false);
        };
        self.display.hide_filter_menu();
        self.set_column_filter(menu.key(), menu.selection())?;
        Ok(true)
    }

    /// Close the filter menu without applying it.
    pub fn cancel_filter_menu(&mut self) {
        if self.filter_menu.take().is_some() {
            self.display.hide_filter_menu();
        }
    }

    // -------------------------------------------------------------------------
    // Column layout
    // -------------------------------------------------------------------------

    /// Swap two columns. Invalid ordinals are a no-op.
    pub fn reorder_columns(&mut self, source: usize, target: usize) -> Result<bool, GridError> {
        if !self.columns.reorder(source, target) {
            return Ok(false);
        }
        self.render_header();
        self.repaint()?;
        Ok(true)
    }

    /// Column drop gesture carrying raw ordinal attributes.
    pub fn drop_column(&mut self, source: Option<&str>, target: Option<&str>) -> Result<bool, GridError> {
        if !self.columns.reorder_from_attrs(source, target) {
            return Ok(false);
        }
        self.render_header();
        self.repaint()?;
        Ok(true)
    }

    /// Set a column's width, clamped to its minimum. Header and body are
    /// restyled in one pass.
    pub fn resize_column(&mut self, ordinal: usize, width_px: u32) -> Option<u32> {
        let width = self.columns.resize(ordinal, width_px)?;
        self.update_column_widths();
        Some(width)
    }

    /// Start dragging the resize handle of `ordinal`.
    pub fn begin_column_resize(&mut self, ordinal: usize, pointer_x: i32, rendered_width: u32) -> bool {
        self.columns.begin_resize(ordinal, pointer_x, rendered_width)
    }

    /// Pointer moved during a resize drag. Returns the applied width.
    pub fn drag_column_resize(&mut self, pointer_x: i32) -> Option<u32> {
        let (_, width) = self.columns.drag_resize(pointer_x)?;
        self.update_column_widths();
        Some(width)
    }

    /// Finish a resize drag and repaint.
    pub fn end_column_resize(&mut self, now: Instant) -> Result<bool, GridError> {
        if !self.columns.end_resize(now) {
            return Ok(false);
        }
        self.render_header();
        self.repaint()?;
        Ok(true)
    }

    /// Give every column an equal share of the container width.
    pub fn auto_fit_columns(&mut self) -> Result<bool, GridError> {
        let container_width = self.display.container_width();
        let Some(width) = self.columns.auto_fit(container_width) else {
            return Ok(false);
        };
        log::debug!("auto-fit columns to {}px", width);
        self.render_header();
        self.repaint()?;
        Ok(true)
    }

    // -------------------------------------------------------------------------
    // Scrolling and pagination
    // -------------------------------------------------------------------------

    /// The viewport scrolled. Rows are resolved immediately; the "load
    /// more" check waits for [`poll_pagination`](Self::poll_pagination).
    pub fn on_scroll(&mut self, event: ScrollEvent, now: Instant) -> Result<(), GridError> {
        self.scroll_top = event.scroll_top;
        self.close_context_menu();
        self.pagination.on_scroll(event, now);
        self.refresh_visibility()
    }

    /// Run the debounced bottom check. Returns `true` when the "load more"
    /// hook was called.
    pub fn poll_pagination(&mut self, now: Instant) -> bool {
        let Some(hook) = self.load_more.as_mut() else {
            return false;
        };
        let Some(done) = self
            .pagination
            .poll(now, self.config.viewport_height, self.config.bottom_slack)
        else {
            return false;
        };
        log::debug!("requesting more data at scroll offset {}", self.scroll_top);
        hook(done);
        true
    }

    /// Time until [`poll_pagination`](Self::poll_pagination) has work to do.
    pub fn next_pagination_check(&self, now: Instant) -> Option<Duration> {
        self.pagination.time_until_check(now)
    }

    // -------------------------------------------------------------------------
    // Context menu
    // -------------------------------------------------------------------------

    /// Open the row context menu for `row_id` at `(x, y)`. Nothing opens
    /// without row actions or for a row that is not materialized.
    pub fn open_context_menu(&mut self, row_id: &str, x: i32, y: i32) -> Option<&ContextMenu> {
        self.close_context_menu();
        if self.row_actions.is_empty() {
            return None;
        }
        let Some(record) = self
            .store
            .materialized()
            .find(|row| row.id(&self.config.id_field) == row_id)
            .map(|row| Arc::clone(&row.data))
        else {
            log::warn!("context menu requested for row '{}' which is not on display", row_id);
            return None;
        };

        let menu = ContextMenu {
            title: self.config.context_menu_title.clone(),
            row_id: row_id.to_string(),
            x,
            y,
            actions: self.row_actions.clone(),
        };
        self.display.show_context_menu(&menu);
        self.selected = Some(record);
        self.context_menu = Some(menu);
        self.context_menu.as_ref()
    }

    /// Run a menu action with the selected record, then close the menu.
    pub fn invoke_action(&mut self, action_name: &str) -> bool {
        let Some(menu) = &self.context_menu else {
            return false;
        };
        if !menu.actions.iter().any(|a| a.action_name == action_name) {
            log::warn!("'{}' is not in the context menu", action_name);
            return false;
        }
        let ran = match &self.selected {
            Some(record) => self.actions.invoke(action_name, record),
            None => false,
        };
        self.close_context_menu();
        ran
    }

    /// Close the row context menu and clear the selection.
    pub fn close_context_menu(&mut self) {
        if self.context_menu.take().is_some() {
            self.display.hide_context_menu();
        }
        self.selected = None;
    }

    /// A row was clicked.
    pub fn row_click(&mut self) {
        self.close_context_menu();
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    /// The rows of the current view as CSV.
    pub fn export_csv(&self) -> String {
        export::to_csv(&self.store.records())
    }

    /// Offer the CSV export to the user through the display.
    pub fn export(&mut self) {
        let csv = self.export_csv();
        log::info!("exporting {} rows", self.store.len());
        self.display
            .offer_download(&self.config.export_file_name, export::CSV_MIME_TYPE, &csv);
    }
}

impl<D> fmt::Debug for Grid<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("records", &self.original.len())
            .field("rows", &self.store.len())
            .field("columns", &self.columns.len())
            .field("view", &self.view)
            .field("scroll_top", &self.scroll_top)
            .finish()
    }
}
