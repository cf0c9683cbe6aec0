//! Error types for dataset operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// An expected column is missing or carries the wrong type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Required column is absent
    #[error("Missing column: {column}")]
    MissingColumn {
        /// Name of the absent column
        column: String,
    },

    /// Column exists but cannot be read as the expected type
    #[error("Column {column} has type {actual}, expected {expected}")]
    WrongType {
        /// Name of the column
        column: String,
        /// Expected type description
        expected: &'static str,
        /// Actual polars dtype
        actual: String,
    },

    /// The identifier column is missing or has null entries
    #[error("Identifier column {column} is missing or incomplete")]
    MissingId {
        /// Name of the identifier column
        column: String,
    },

    /// The identifier column repeats a value
    #[error("Duplicate identifier {id} in column {column}")]
    DuplicateId {
        /// Name of the identifier column
        column: String,
        /// The repeated identifier
        id: i64,
    },

    /// Neither numeric nor categorical columns survived cleaning
    #[error("No numeric or categorical columns remain after cleaning")]
    EmptySchema,
}

/// Input is too degenerate to produce any meaningful output.
///
/// Zero denominators are substituted, not raised; this is reserved for cases
/// such as a dataset with no usable rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Degenerate input: {reason}")]
pub struct DegenerateInputError {
    /// What made the input unusable
    pub reason: String,
}

impl DegenerateInputError {
    /// Create a new degenerate input error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    /// Dataset file does not exist
    #[error("Dataset not found at {}", path.display())]
    NotFound {
        /// Resolved path that was probed
        path: PathBuf,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Loaded data violates the dataset schema
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}
