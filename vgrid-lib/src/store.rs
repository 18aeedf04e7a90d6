//! Row store: logical rows, positions and materialization flags.

use std::sync::Arc;

use uuid::Uuid;

use crate::model::Record;
use crate::model::Value;

/// A record shared between the working set and the rows built from it.
pub type SharedRecord = Arc<Record>;

/// A logical row: one record plus its derived layout state.
#[derive(Debug, Clone)]
pub struct Row {
    /// The record shown by this row.
    pub data: SharedRecord,
    /// Vertical offset in pixels (index in the current order × row height).
    pub position: u32,
    /// Whether a visual element currently exists for this row.
    pub materialized: bool,
}

impl Row {
    /// The row identifier as text.
    pub fn id(&self, id_field: &str) -> String {
        self.data.resolve(id_field).to_string()
    }
}

/// Generates a synthetic identifier for a record.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Returns `true` when the identifier field is absent, null or empty.
pub fn is_missing_id(record: &Record, id_field: &str) -> bool {
    record.get(id_field).is_none_or(Value::is_blank)
}

/// Stamps a generated identifier into every record that lacks one.
///
/// This mutates the caller's records in place. Returns the number of
/// identifiers assigned.
pub fn assign_missing_ids(records: &mut [Record], id_field: &str) -> usize {
    let mut assigned = 0;
    for record in records.iter_mut() {
        if is_missing_id(record, id_field) {
            record.insert(id_field, generate_id());
            assigned += 1;
        }
    }
    assigned
}

/// Takes ownership of incoming records, assigns missing identifiers and
/// wraps them for sharing. Each record gets its id exactly once here, so it
/// stays stable for as long as the record is in the working set.
pub fn admit(mut records: Vec<Record>, id_field: &str) -> Vec<SharedRecord> {
    let assigned = assign_missing_ids(&mut records, id_field);
    if assigned > 0 {
        log::debug!("assigned {} generated ids on ingest", assigned);
    }
    records.into_iter().map(Arc::new).collect()
}

/// Holds the current ordered row sequence.
#[derive(Debug, Clone)]
pub struct RowStore {
    /// Fixed row height in pixels.
    row_height: u32,
    /// The rows in display order.
    rows: Vec<Row>,
}

impl RowStore {
    /// Create an empty store.
    pub fn new(row_height: u32) -> Self {
        Self {
            row_height: row_height.max(1),
            rows: Vec::new(),
        }
    }

    /// Replace the rows with one row per record, at index-derived positions,
    /// none materialized. O(n).
    pub fn ingest(&mut self, records: &[SharedRecord]) {
        let row_height = self.row_height;
        self.rows = records
            .iter()
            .enumerate()
            .map(|(index, data)| Row {
                data: Arc::clone(data),
                position: index as u32 * row_height,
                materialized: false,
            })
            .collect();
    }

    /// Rewrite every position from the current order and clear all
    /// materialized flags. Must follow any reordering.
    pub fn reposition(&mut self) {
        let row_height = self.row_height;
        for (index, row) in self.rows.iter_mut().enumerate() {
            row.position = index as u32 * row_height;
            row.materialized = false;
        }
    }

    /// Fixed row height.
    pub fn row_height(&self) -> u32 {
        self.row_height
    }

    /// The rows in display order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Mutable access for reordering. Call [`reposition`](Self::reposition)
    /// afterwards.
    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Get a row by index.
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Set the materialized flag of the row at index.
    pub fn set_materialized(&mut self, index: usize, materialized: bool) {
        if let Some(row) = self.rows.get_mut(index) {
            row.materialized = materialized;
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total content height in pixels.
    pub fn content_height(&self) -> u32 {
        self.rows.len() as u32 * self.row_height
    }

    /// Find row index at given Y offset.
    pub fn row_at_offset(&self, y: u32) -> Option<usize> {
        let index = (y / self.row_height) as usize;
        (index < self.rows.len()).then_some(index)
    }

    /// The records in display order.
    pub fn records(&self) -> Vec<SharedRecord> {
        self.rows.iter().map(|row| Arc::clone(&row.data)).collect()
    }

    /// Rows that currently have a visual element.
    pub fn materialized(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| row.materialized)
    }
}
