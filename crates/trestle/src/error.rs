//! Error types for the Trestle library.

use thiserror::Error;

/// Main error type for Trestle operations.
#[derive(Debug, Error)]
pub enum TrestleError {
    /// One or more referenced columns do not exist in the table.
    ///
    /// All missing names are collected before reporting, not just the first.
    #[error("column(s) not found: {}", .columns.join(", "))]
    ColumnNotFound { columns: Vec<String> },

    /// A column could not be converted to a numeric vector.
    #[error("cannot convert column '{column}' to numeric: {reason}")]
    CannotConvertColumn { column: String, reason: String },

    /// A numeric extraction found no numeric columns to work with.
    #[error("no numeric columns available")]
    NoNumericColumns,

    /// Empty table or no data to operate on.
    #[error("empty data: {0}")]
    EmptyData(String),

    /// A column's length does not match the table's row count.
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    MismatchedColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A column name is already present in the table.
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    /// No direct handler, operation class, or toolbox function matches the
    /// requested operation name.
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// A registered handler, toolbox function, or render sink reported a
    /// failure.
    #[error("operation '{operation}' failed: {message}")]
    OperationFailed { operation: String, message: String },

    /// Error parsing delimited input.
    #[error("parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter detected or specified.
    #[error("invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrestleError {
    /// Build a `ColumnNotFound` error from any collection of missing names.
    pub fn columns_not_found<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TrestleError::ColumnNotFound {
            columns: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Build an `OperationFailed` error.
    pub fn operation_failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        TrestleError::OperationFailed {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for Trestle operations.
pub type Result<T> = std::result::Result<T, TrestleError>;
