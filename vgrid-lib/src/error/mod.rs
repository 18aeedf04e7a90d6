//! Error types

mod column;
mod grid;
mod measure;

pub use column::*;
pub use grid::*;
pub use measure::*;
