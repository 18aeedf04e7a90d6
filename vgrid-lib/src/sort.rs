//! Sort engine: stable single-column ordering with nulls last.

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Record;
use crate::store::Row;

/// Direction of an active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// Next state of a column's sort toggle.
    ///
    /// An unsorted column goes ascending; after that the two directions
    /// alternate and never return to unsorted.
    pub fn toggled(current: Option<SortDirection>) -> SortDirection {
        match current {
            Some(SortDirection::Ascending) => SortDirection::Descending,
            Some(SortDirection::Descending) | None => SortDirection::Ascending,
        }
    }

    /// Returns `true` for ascending.
    pub fn is_ascending(self) -> bool {
        matches!(self, SortDirection::Ascending)
    }

    /// Header indicator glyph.
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("asc"),
            SortDirection::Descending => f.write_str("desc"),
        }
    }
}

/// The active sort: a column key and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column key, resolved like a rendered cell (dotted paths allowed).
    pub key: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Create a sort spec.
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    /// Ascending sort on `key`.
    pub fn ascending(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    /// Descending sort on `key`.
    pub fn descending(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Descending)
    }
}

/// Compare two records on `key`.
///
/// Null or missing values sort after every non-null value in both
/// directions. Non-null values use their native relational order, reversed
/// for descending.
pub fn compare(a: &Record, b: &Record, key: &str, direction: SortDirection) -> Ordering {
    let left = a.resolve(key);
    let right = b.resolve(key);
    match (left.is_null(), right.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = left.relational_cmp(right);
            if direction.is_ascending() {
                ordering
            } else {
                ordering.reverse()
            }
        }
    }
}

/// Stable sort of rows in place. Positions are stale afterwards.
pub fn sort_rows(rows: &mut [Row], spec: &SortSpec) {
    rows.sort_by(|a, b| compare(&a.data, &b.data, &spec.key, spec.direction));
}
