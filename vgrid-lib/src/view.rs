//! View state and the single rebuild pipeline every change goes through:
//! original records → column filters → search → sort → positions.

use std::sync::Arc;

use crate::filter;
use crate::filter::FilterMap;
use crate::sort;
use crate::sort::SortSpec;
use crate::store::RowStore;
use crate::store::SharedRecord;

/// Sort, filters and search applied on top of the original records.
///
/// Immutable: every change yields a new value and reruns the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    sort: Option<SortSpec>,
    filters: FilterMap,
    search: Option<String>,
}

impl ViewState {
    /// Unsorted, unfiltered view.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active sort.
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// The active column filters.
    pub fn filters(&self) -> &FilterMap {
        &self.filters
    }

    /// The active search term.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Same view with a different sort.
    pub fn with_sort(&self, sort: Option<SortSpec>) -> Self {
        Self {
            sort,
            ..self.clone()
        }
    }

    /// Same view with different filters.
    pub fn with_filters(&self, filters: FilterMap) -> Self {
        Self {
            filters,
            ..self.clone()
        }
    }

    /// Same view with a different search. Empty terms clear it.
    pub fn with_search(&self, term: Option<&str>) -> Self {
        Self {
            search: term.filter(|t| !t.is_empty()).map(str::to_string),
            ..self.clone()
        }
    }

    /// Filters and search dropped, sort kept.
    pub fn unfiltered(&self) -> Self {
        Self {
            sort: self.sort.clone(),
            ..Self::default()
        }
    }

    /// Returns `true` when filters or a search narrow the records.
    pub fn narrows(&self) -> bool {
        !self.filters.is_empty() || self.search.is_some()
    }
}

/// Records that pass the view's filters and search, in ingestion order.
/// `None` when the view does not narrow.
pub fn select(original: &[SharedRecord], view: &ViewState) -> Option<Vec<SharedRecord>> {
    if !view.narrows() {
        return None;
    }
    let mut subset = if view.filters.is_empty() {
        original.iter().map(Arc::clone).collect()
    } else {
        filter::apply_all(original, &view.filters)
    };
    if let Some(term) = &view.search {
        subset = filter::search(&subset, term);
    }
    Some(subset)
}

/// Rebuild `store` from `original` under `view`.
///
/// Returns the narrowed subset (in ingestion order) when the view narrows.
/// On return every row position is fresh and nothing is materialized.
pub fn rebuild(original: &[SharedRecord], view: &ViewState, store: &mut RowStore) -> Option<Vec<SharedRecord>> {
    let subset = select(original, view);
    store.ingest(subset.as_deref().unwrap_or(original));
    if let Some(spec) = &view.sort {
        sort::sort_rows(store.rows_mut(), spec);
    }
    store.reposition();
    subset
}
