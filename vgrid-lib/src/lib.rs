//! Virtual-scroll table engine
//!
//! A windowed, data-bound table: only the rows inside the viewport exist on
//! the display, while sorting, column filters, search, column layout and
//! pagination operate on the full in-memory record set.

pub mod actions;
pub mod columns;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod filter;
pub mod model;
pub mod pagination;
pub mod registry;
pub mod render;
pub mod sort;
pub mod source;
pub mod store;
pub mod view;
pub mod visibility;

mod grid;

pub use config::GridConfig;
pub use error::GridError;
pub use grid::*;
