//! Error types for sheetjoin

use thiserror::Error;

use crate::join::Side;

/// Result type alias for sheetjoin operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading, validating, joining or exporting tables
#[derive(Error, Debug)]
pub enum Error {
    /// Input document is unreadable or malformed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Selected key column is missing from its table
    #[error("Column '{column}' not found in {side} table (available: {available})")]
    ColumnNotFound {
        column: String,
        side: Side,
        available: String,
    },

    /// The two key columns share no value
    #[error("No matching values found between '{left_column}' (left) and '{right_column}' (right)")]
    NoOverlap {
        left_column: String,
        right_column: String,
    },

    /// Join kind string is not one of inner, left, right, full_outer
    #[error("Unknown join kind '{0}' (expected inner, left, right or full_outer)")]
    UnknownJoinKind(String),

    /// Result table cannot be encoded in the output format
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the blocking precondition raised before a join
    pub fn is_no_overlap(&self) -> bool {
        matches!(self, Error::NoOverlap { .. })
    }
}

impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::Serialization(err.to_string())
    }
}
