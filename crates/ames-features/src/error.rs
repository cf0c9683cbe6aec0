//! Error types for cleaning and feature engineering.

use ames_data::{DegenerateInputError, SchemaError};
use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by the preprocessing and feature stages.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Expected column missing or mistyped
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Input too degenerate to clean
    #[error(transparent)]
    Degenerate(#[from] DegenerateInputError),

    /// A feature group asked for a feature the registry does not declare
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}
