//! Tests for row materialization while scrolling.

use std::time::Instant;

use vgrid_lib::Grid;
use vgrid_lib::GridConfig;
use vgrid_lib::display::MemoryDisplay;
use vgrid_lib::model::Record;
use vgrid_lib::model::Value;
use vgrid_lib::pagination::ScrollEvent;
use vgrid_lib::render::BLANK_PLACEHOLDER;

fn numbered(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| Record::new().set("id", i as i64).set("label", format!("row {}", i)))
        .collect()
}

fn ids(range: std::ops::RangeInclusive<usize>) -> Vec<String> {
    range.map(|i| i.to_string()).collect()
}

fn scroll(grid: &mut Grid<MemoryDisplay>, top: u32) {
    let event = ScrollEvent::new(top, grid.content_height() + 4);
    grid.on_scroll(event, Instant::now()).unwrap();
}

// =============================================================================
// Initial window
// =============================================================================

#[test]
fn test_initial_window() {
    let grid = Grid::builder(MemoryDisplay::new(800)).build(numbered(1000)).unwrap();

    // 400px viewport, 35px rows: offsets 0..=385 are inside.
    assert_eq!(grid.materialized_ids(), ids(0..=11));
    assert_eq!(grid.display().row_ids(), ids(0..=11));
    assert_eq!(grid.display().content_height(), 35_000);
    assert_eq!(grid.rows().len(), 1000);
}

#[test]
fn test_positions_follow_index() {
    let grid = Grid::builder(MemoryDisplay::new(800)).build(numbered(50)).unwrap();
    for (index, row) in grid.rows().iter().enumerate() {
        assert_eq!(row.position, index as u32 * 35);
    }
    let first = grid.display().rows().next().unwrap();
    assert_eq!(first.top, 0);
    assert_eq!(first.cells[1].text, "row 0");
}

#[test]
fn test_zero_records() {
    let grid = Grid::builder(MemoryDisplay::new(800)).build(Vec::new()).unwrap();
    assert!(grid.rows().is_empty());
    assert!(grid.columns().is_empty());
    assert_eq!(grid.display().row_count(), 0);
    assert_eq!(grid.content_height(), 0);
}

// =============================================================================
// Scrolling
// =============================================================================

#[test]
fn test_scroll_replaces_window() {
    let mut grid = Grid::builder(MemoryDisplay::new(800)).build(numbered(1000)).unwrap();
    scroll(&mut grid, 1000);

    assert_eq!(grid.materialized_ids(), ids(29..=40));
    assert_eq!(grid.display().row_ids(), ids(29..=40));
    assert_eq!(grid.display().removed(), 12);
}

#[test]
fn test_backward_slack_and_trailing_rows() {
    let mut grid = Grid::builder(MemoryDisplay::new(800)).build(numbered(1000)).unwrap();
    scroll(&mut grid, 1000);
    scroll(&mut grid, 960);

    // Row 28 enters at the top; 39 and 40 fall off the bottom.
    assert_eq!(grid.materialized_ids(), ids(28..=38));

    // Scrolling down a little keeps up to two rows above the viewport.
    scroll(&mut grid, 1030);
    let live = grid.materialized_ids();
    assert!(live.contains(&"28".to_string()));
    assert!(live.contains(&"40".to_string()));
    assert!(!live.contains(&"41".to_string()));
}

#[test]
fn test_every_live_row_is_materialized() {
    let mut grid = Grid::builder(MemoryDisplay::new(800)).build(numbered(300)).unwrap();
    for top in [0, 500, 520, 3000, 2990, 10, 0] {
        scroll(&mut grid, top);
        assert_eq!(grid.display().row_ids(), grid.materialized_ids());
    }
}

#[test]
fn test_config_row_height_and_viewport() {
    let config = GridConfig::default().with_row_height(20).with_viewport_height(100);
    let grid = Grid::builder(MemoryDisplay::new(800))
        .config(config)
        .build(numbered(100))
        .unwrap();
    assert_eq!(grid.materialized_ids(), ids(0..=5));
    assert_eq!(grid.content_height(), 2000);
}

// =============================================================================
// Cell content
// =============================================================================

#[test]
fn test_null_cells_show_placeholder() {
    let records = vec![
        Record::new().set("id", 1i64).set("name", "Ann").set("age", 30i64),
        Record::new().set("id", 2i64).set("name", Value::Null),
    ];
    let grid = Grid::builder(MemoryDisplay::new(800)).build(records).unwrap();
    let row = grid.display().row("2").unwrap();
    assert_eq!(row.cells[1].text, BLANK_PLACEHOLDER);
    assert_eq!(row.cells[2].text, BLANK_PLACEHOLDER);
}

#[test]
fn test_update_data_repaints_from_scratch() {
    let mut grid = Grid::builder(MemoryDisplay::new(800)).build(numbered(100)).unwrap();
    scroll(&mut grid, 700);
    grid.update_data(numbered(5)).unwrap();

    // Content shrank below the viewport, so the offset is clamped.
    assert_eq!(grid.scroll_top(), 0);
    assert_eq!(grid.display().row_ids(), ids(0..=4));
}
