//! Pipeline and configuration errors.

use ames_data::DataError;
use ames_features::FeatureError;
use ames_model::{InferenceError, TrainingError};
use ames_scoring::ScoringError;
use std::path::PathBuf;
use thiserror::Error;

/// A stage failure; aborts the whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading the raw dataset failed
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Cleaning or feature engineering failed
    #[error("Feature error: {0}")]
    Feature(#[from] FeatureError),

    /// Model fitting failed
    #[error("Training error: {0}")]
    Training(#[from] TrainingError),

    /// Held-out evaluation failed
    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    /// A scorer failed
    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),
}

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// File is not valid configuration JSON
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
