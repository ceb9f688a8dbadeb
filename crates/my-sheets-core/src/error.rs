//! Error types for my-sheets-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in my-sheets-core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Range with more cells than a formula may expand
    #[error("Range {range} has {cells} cells, more than a formula may expand")]
    RangeTooLarge { range: String, cells: u64 },

    /// Row number does not fit the coordinate type
    #[error("Row number out of bounds in '{0}'")]
    RowOutOfBounds(String),

    /// Column letters do not fit the coordinate type
    #[error("Column letters out of bounds in '{0}'")]
    ColumnOutOfBounds(String),
}
