//! ColumnSpecError for column descriptors

/// Error for a malformed column descriptor.
///
/// Never returned from the public grid API: the column manager logs it as a
/// warning and skips the offending column.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColumnSpecError {
    /// The descriptor has no field name.
    #[error("Column descriptor has an empty name")]
    EmptyName,

    /// The width string is neither `N%` nor `Npx` (or a bare number).
    #[error("Column '{column}' has an invalid width '{value}'")]
    InvalidWidth { column: String, value: String },
}

impl ColumnSpecError {
    /// Creates a new invalid width error.
    pub fn invalid_width(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidWidth {
            column: column.into(),
            value: value.into(),
        }
    }
}
