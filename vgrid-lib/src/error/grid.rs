//! GridError for public grid operations

/// Boxed error returned by a caller-supplied cell formatter.
pub type FormatterError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for operations on a [`Grid`](crate::grid::Grid).
///
/// Most recoverable conditions never reach this type: malformed column
/// descriptors are skipped with a warning and lookup misses are no-ops.
/// What remains are failures the caller owns.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A column formatter failed while a row was being rendered.
    #[error("Formatter for column '{column}' failed: {source}")]
    Format {
        column: String,
        #[source]
        source: FormatterError,
    },

    /// Records could not be parsed from JSON.
    #[error("Invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl GridError {
    /// Creates a new formatter error.
    pub fn format(column: impl Into<String>, source: FormatterError) -> Self {
        Self::Format {
            column: column.into(),
            source,
        }
    }
}
