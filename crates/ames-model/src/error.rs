//! Training and inference errors.

use ames_data::SchemaError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while fitting the price model.
#[derive(Debug, Error)]
pub enum TrainingError {
    /// Too few usable features after leakage removal
    #[error("Insufficient features: need at least {required}, got {actual}")]
    InsufficientFeatures {
        /// Minimum feature count
        required: usize,
        /// Features available
        actual: usize,
    },

    /// Too few rows for a train/test split
    #[error("Insufficient rows: need at least {required}, got {actual}")]
    InsufficientRows {
        /// Minimum row count
        required: usize,
        /// Rows available
        actual: usize,
    },

    /// Target column absent
    #[error("Target column {0} not found")]
    MissingTarget(String),

    /// Target values cannot be log-transformed
    #[error("Invalid target {column}: {reason}")]
    InvalidTarget {
        /// Target column
        column: String,
        /// What is wrong with it
        reason: String,
    },

    /// Configuration out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Feature matrix and target disagree in length
    #[error("Shape mismatch: {rows} feature rows but {targets} targets")]
    Shape {
        /// Rows in the feature matrix
        rows: usize,
        /// Length of the target vector
        targets: usize,
    },

    /// Training features could not be assembled
    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    /// Schema error
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Errors raised when a frame does not match the model's training schema.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// A training feature is absent from the scoring frame
    #[error("Feature {0} missing from scoring frame")]
    MissingFeature(String),

    /// A training feature is present but not numeric
    #[error("Feature {column} is {dtype}, expected numeric")]
    NonNumericFeature {
        /// Column name
        column: String,
        /// Actual dtype
        dtype: String,
    },

    /// A feature value is null or NaN
    #[error("Feature {column} has no value at row {row}")]
    MissingValue {
        /// Column name
        column: String,
        /// Row index
        row: usize,
    },

    /// Matrix width differs from the number of features the model was fit on
    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch {
        /// Features the model expects
        expected: usize,
        /// Columns supplied
        actual: usize,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}
