//! MeasureError for text measurement facilities

/// Error raised by a precise text-measurement facility.
///
/// Always caught by the column manager and replaced with the glyph-count
/// estimate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeasureError {
    /// The host has no measurement capability.
    #[error("Text measurement is not available")]
    Unavailable,

    /// The host reported a failure while measuring.
    #[error("Text measurement failed: {0}")]
    Failed(String),
}
