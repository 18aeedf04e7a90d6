//! Several independent grids, looked up by container name.

use std::sync::Arc;
use std::sync::RwLock;

use dashmap::DashMap;

use crate::Grid;

/// Shared handle to one grid.
pub type GridHandle<D> = Arc<RwLock<Grid<D>>>;

/// Grids keyed by the container they render into. Each grid keeps its own
/// records, view, columns and pagination state.
pub struct GridRegistry<D> {
    grids: DashMap<String, GridHandle<D>>,
}

impl<D> Default for GridRegistry<D> {
    fn default() -> Self {
        Self {
            grids: DashMap::new(),
        }
    }
}

impl<D> GridRegistry<D> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `grid` under `container`, replacing any previous grid there.
    pub fn insert(&self, container: impl Into<String>, grid: Grid<D>) -> GridHandle<D> {
        let container = container.into();
        let handle = Arc::new(RwLock::new(grid));
        if self.grids.insert(container.clone(), Arc::clone(&handle)).is_some() {
            log::debug!("replaced grid in container '{}'", container);
        }
        handle
    }

    /// The grid in `container`.
    pub fn get(&self, container: &str) -> Option<GridHandle<D>> {
        self.grids.get(container).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove the grid in `container`.
    pub fn remove(&self, container: &str) -> Option<GridHandle<D>> {
        self.grids.remove(container).map(|(_, handle)| handle)
    }

    /// Registered container names, sorted.
    pub fn containers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.grids.iter().map(|entry| entry.key().clone()).collect();
        names.sort_unstable();
        names
    }

    /// Number of grids.
    pub fn len(&self) -> usize {
        self.grids.len()
    }

    /// Check if no grid is registered.
    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}
