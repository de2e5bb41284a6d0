//! Table Error Types

use thiserror::Error;

/// Errors raised by table construction and concatenation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Concatenated tables have different row counts
    #[error("Table length does not match: have {expected} rows, got {actual}")]
    RowLengthMismatch { expected: usize, actual: usize },

    /// A column with this name is already present
    #[error("A column named '{0}' already exists")]
    ColumnNameCollision(String),

    /// Appended row does not match the table width
    #[error("Row width does not match: expected {expected} values, got {actual}")]
    RowWidthMismatch { expected: usize, actual: usize },

    /// ndarray conversion failed
    #[error("Invalid table shape: {0}")]
    Shape(String),
}
