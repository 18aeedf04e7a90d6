//! Row renderer: turns a logical row into the spec of its visual element.

use serde::Serialize;

use crate::columns::CellStyle;
use crate::columns::ColumnDef;
use crate::error::GridError;
use crate::model::Record;
use crate::store::Row;

/// Text of an unformatted null cell (a non-breaking space).
pub const BLANK_PLACEHOLDER: &str = "\u{00A0}";

/// One cell of a visual row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualCell {
    /// Rendered text.
    pub text: String,
    /// Column style, shared with the header cell.
    pub style: CellStyle,
}

/// Everything a display needs to create one row element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualRowSpec {
    /// Row identifier.
    pub id: String,
    /// Vertical offset in pixels.
    pub top: u32,
    /// Cells in column order.
    pub cells: Vec<VisualCell>,
}

impl VisualRowSpec {
    /// Cell texts in column order.
    pub fn texts(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.text.clone()).collect()
    }

    /// Overwrite every cell's style, e.g. after a width change.
    pub fn restyle(&mut self, styles: &[CellStyle]) {
        for (cell, style) in self.cells.iter_mut().zip(styles) {
            cell.style = *style;
        }
    }
}

/// Text for `column` of `record`.
///
/// A formatter sees the raw value, nulls included. Without one, nulls show
/// [`BLANK_PLACEHOLDER`] and everything else its display text.
pub fn cell_text(record: &Record, column: &ColumnDef) -> Result<String, GridError> {
    let value = record.resolve(&column.key);
    match &column.format {
        Some(format) => format(value).map_err(|source| GridError::format(&column.key, source)),
        None if value.is_null() => Ok(BLANK_PLACEHOLDER.to_string()),
        None => Ok(value.to_string()),
    }
}

/// Build the visual row for `row` under the current columns.
pub fn render_row(row: &Row, columns: &[ColumnDef], id_field: &str) -> Result<VisualRowSpec, GridError> {
    let cells = columns
        .iter()
        .map(|column| {
            Ok(VisualCell {
                text: cell_text(&row.data, column)?,
                style: column.style(),
            })
        })
        .collect::<Result<Vec<_>, GridError>>()?;
    Ok(VisualRowSpec {
        id: row.id(id_field),
        top: row.position,
        cells,
    })
}
