//! Scoring errors.

use ames_data::{DegenerateInputError, SchemaError};
use ames_model::InferenceError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while deriving scores.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// The model could not score the frame
    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    /// Expected column missing or mistyped
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Input too degenerate to score
    #[error(transparent)]
    Degenerate(#[from] DegenerateInputError),

    /// A score that needs model predictions ran before fair-price scoring
    #[error("Column PredictedPrice not found: run fair-price scoring first")]
    MissingPrediction,

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}
