//! Tests for column layout: setup, resize, reorder, auto-fit and content widths.

use std::time::Duration;
use std::time::Instant;

use vgrid_lib::Grid;
use vgrid_lib::GridError;
use vgrid_lib::columns::ColumnSetup;
use vgrid_lib::columns::ColumnWidth;
use vgrid_lib::display::MemoryDisplay;
use vgrid_lib::model::Record;
use vgrid_lib::model::Value;

fn people() -> Vec<Record> {
    vec![
        Record::new().set("id", 1i64).set("name", "Bob").set("dept", "Eng"),
        Record::new().set("id", 2i64).set("name", "Ann").set("dept", "Ops"),
        Record::new().set("id", 3i64).set("name", "Cid").set("dept", "Eng"),
    ]
}

fn grid() -> Grid<MemoryDisplay> {
    Grid::builder(MemoryDisplay::new(900)).build(people()).unwrap()
}

fn header_keys(grid: &Grid<MemoryDisplay>) -> Vec<String> {
    grid.display()
        .header()
        .cells
        .iter()
        .map(|c| c.key.clone())
        .collect()
}

/// Header and every live row carry the same style per column.
fn assert_aligned(grid: &Grid<MemoryDisplay>) {
    let header: Vec<_> = grid.display().header().cells.iter().map(|c| c.style).collect();
    for row in grid.display().rows() {
        let body: Vec<_> = row.cells.iter().map(|c| c.style).collect();
        assert_eq!(header, body);
    }
}

// =============================================================================
// Setup
// =============================================================================

#[test]
fn test_explicit_setup() {
    let grid = Grid::builder(MemoryDisplay::new(900))
        .columns(vec![
            ColumnSetup::new("name").display("Name"),
            ColumnSetup::new("dept").width("150px"),
            ColumnSetup::new("bogus").width("very wide"),
        ])
        .build(people())
        .unwrap();

    assert_eq!(header_keys(&grid), vec!["name", "dept"]);
    assert_eq!(grid.display().header().cells[0].label, "Name");
    assert_eq!(grid.columns()[0].width, ColumnWidth::Percent(50.0));
    assert_eq!(grid.columns()[1].width, ColumnWidth::MinPx(150));
    assert_eq!(grid.display().row("2").unwrap().texts(), vec!["Ann", "Ops"]);
}

#[test]
fn test_nested_key_column() {
    let records = vec![
        Record::new()
            .set("id", 1i64)
            .set("address", Record::new().set("city", "Oslo")),
    ];
    let grid = Grid::builder(MemoryDisplay::new(900))
        .columns(vec![ColumnSetup::new("address.city").display("City")])
        .build(records)
        .unwrap();
    assert_eq!(grid.display().row("1").unwrap().texts(), vec!["Oslo"]);
}

#[test]
fn test_formatter() {
    let grid = Grid::builder(MemoryDisplay::new(900))
        .columns(vec![
            ColumnSetup::new("name").format(|v| Ok(v.to_string().to_uppercase())),
            ColumnSetup::new("missing").format(|v| {
                Ok(if v.is_null() { "-".to_string() } else { v.to_string() })
            }),
        ])
        .build(people())
        .unwrap();
    assert_eq!(grid.display().row("1").unwrap().texts(), vec!["BOB", "-"]);
}

#[test]
fn test_formatter_error_surfaces() {
    let result = Grid::builder(MemoryDisplay::new(900))
        .columns(vec![ColumnSetup::new("name").format(|v| match v {
            Value::String(s) if s == "Ann" => Err("no Ann".into()),
            other => Ok(other.to_string()),
        })])
        .build(people());
    assert!(matches!(result, Err(GridError::Format { ref column, .. }) if column == "name"));
}

// =============================================================================
// Content widths
// =============================================================================

#[test]
fn test_content_min_widths_from_measurement() {
    let records = vec![
        Record::new().set("id", 1i64).set("note", "a fairly long note for this cell"),
    ];
    let grid = Grid::builder(MemoryDisplay::new(900).with_glyph_width(10))
        .build(records)
        .unwrap();

    // "id": 20 + 50 + 32 beats "1" and the 80 floor.
    assert_eq!(grid.columns()[0].content_min_width, Some(102));
    // 32 chars * 10 + 32.
    assert_eq!(grid.columns()[1].content_min_width, Some(352));
    assert_aligned(&grid);
}

#[test]
fn test_content_min_widths_fall_back_to_estimate() {
    let grid = grid();
    // "name": 4 * 7 + 50 + 32 = 110.
    assert_eq!(grid.columns()[1].content_min_width, Some(110));
}

// =============================================================================
// Resize
// =============================================================================

#[test]
fn test_resize_clamps_and_restyles_header_and_body() {
    let mut grid = grid();
    let passes = grid.display().style_passes();

    assert_eq!(grid.resize_column(1, 20), Some(110));
    assert_eq!(grid.columns()[1].width, ColumnWidth::MinPx(110));
    assert_eq!(grid.display().style_passes(), passes + 1);
    assert_aligned(&grid);

    assert_eq!(grid.resize_column(1, 400), Some(400));
    assert!(grid.display().header().cells[1].style.is_rigid());
    assert_aligned(&grid);

    assert_eq!(grid.resize_column(9, 400), None);
}

#[test]
fn test_resize_gesture_swallows_following_click() {
    let mut grid = grid();
    let start = Instant::now();

    assert!(grid.begin_column_resize(1, 500, 200));
    assert_eq!(grid.drag_column_resize(550), Some(250));
    assert_aligned(&grid);
    assert!(grid.end_column_resize(start).unwrap());

    assert!(!grid.header_click(1, start + Duration::from_millis(3)).unwrap());
    assert!(grid.view().sort().is_none());

    assert!(grid.header_click(1, start + Duration::from_millis(20)).unwrap());
    assert!(grid.view().sort().is_some());
}

// =============================================================================
// Reorder and auto-fit
// =============================================================================

#[test]
fn test_reorder_swaps_header_and_cells() {
    let mut grid = grid();
    assert!(grid.reorder_columns(0, 2).unwrap());
    assert_eq!(header_keys(&grid), vec!["dept", "name", "id"]);
    assert_eq!(grid.display().row("1").unwrap().texts(), vec!["Eng", "Bob", "1"]);

    let ordinals: Vec<usize> = grid.display().header().cells.iter().map(|c| c.ordinal).collect();
    assert_eq!(ordinals, vec![0, 1, 2]);
    assert_aligned(&grid);
}

#[test]
fn test_reorder_invalid_is_noop() {
    let mut grid = grid();
    assert!(!grid.reorder_columns(0, 7).unwrap());
    assert!(!grid.drop_column(Some("abc"), Some("1")).unwrap());
    assert!(!grid.drop_column(None, None).unwrap());
    assert_eq!(header_keys(&grid), vec!["id", "name", "dept"]);

    assert!(grid.drop_column(Some("2"), Some("1")).unwrap());
    assert_eq!(header_keys(&grid), vec!["id", "dept", "name"]);
}

#[test]
fn test_sort_state_moves_with_column() {
    let mut grid = grid();
    grid.header_click(1, Instant::now()).unwrap();
    grid.reorder_columns(1, 0).unwrap();
    assert!(grid.display().header().cells[0].sort.is_some());
    assert_eq!(grid.display().header().cells[0].key, "name");
}

#[test]
fn test_auto_fit() {
    let mut grid = grid();
    grid.resize_column(0, 300);
    assert!(grid.auto_fit_columns().unwrap());
    assert!(grid.columns().iter().all(|c| c.width == ColumnWidth::Px(300)));
    assert_aligned(&grid);

    grid.display_mut().set_container_width(600);
    assert!(grid.auto_fit_columns().unwrap());
    assert!(grid.columns().iter().all(|c| c.width == ColumnWidth::Px(200)));

    let mut empty = Grid::builder(MemoryDisplay::new(900)).build(Vec::new()).unwrap();
    assert!(!empty.auto_fit_columns().unwrap());
}
