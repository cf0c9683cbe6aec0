//! Model Trainer
//!
//! Fits the sale-price regression on a [`FeatureSet`]:
//!
//! 1. target `y = ln(1 + price)`
//! 2. features: every numeric column except the target and any column the
//!    schema registry marks as leakage-sensitive
//! 3. seeded holdout split
//! 4. random forest on the training rows
//!
//! The held-out matrix and log targets stay with the [`TrainedModel`] so
//! accuracy can be reported later.

use crate::error::{InferenceError, TrainingError};
use crate::forest::{ForestConfig, RandomForest};
use crate::matrix::feature_matrix;
use crate::model::{ForestPriceModel, PriceModel};
use crate::split::train_test_split;
use ames_data::{ColumnRole, SchemaRegistry};
use ames_data::schema::is_numeric;
use ames_features::FeatureSet;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Fewest numeric features the model may be fit on.
pub const MIN_FEATURES: usize = 2;

/// Configuration for the trainer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Held-out fraction (default: 0.2)
    pub test_fraction: f64,
    /// Split seed (default: 42)
    pub seed: u64,
    /// Fewest rows accepted for a split (default: 5)
    pub min_rows: usize,
    /// Forest hyperparameters
    pub forest: ForestConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            min_rows: 5,
            forest: ForestConfig::default(),
        }
    }
}

impl TrainerConfig {
    /// Check that every parameter is in range.
    pub fn validate(&self) -> Result<(), TrainingError> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(TrainingError::InvalidConfig(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        self.forest.validate()
    }
}

/// Held-out accuracy of a trained model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelAccuracy {
    /// Mean absolute error in dollars
    pub mae: f64,
    /// Root mean squared error of the log prediction
    pub rmse_log: f64,
    /// Held-out rows evaluated
    pub test_rows: usize,
}

/// A fitted model plus its held-out evaluation data.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    /// Fitted model
    pub model: ForestPriceModel,
    /// Held-out feature matrix (columns follow `feature_names`)
    pub x_test: Array2<f64>,
    /// Held-out log targets
    pub y_test_log: Array1<f64>,
    /// Feature names in model column order
    pub feature_names: Vec<String>,
    /// Configuration used for the fit
    pub config: TrainerConfig,
}

impl TrainedModel {
    /// Accuracy on the held-out rows.
    pub fn evaluate(&self) -> Result<ModelAccuracy, InferenceError> {
        let predicted = self.model.predict_matrix(&self.x_test)?;
        let n = self.y_test_log.len() as f64;

        let mae = self
            .y_test_log
            .iter()
            .zip(&predicted)
            .map(|(y, p)| (y.exp_m1() - p.exp_m1()).abs())
            .sum::<f64>()
            / n;
        let rmse_log = ((&self.y_test_log - &predicted).mapv(|d| d * d).sum() / n).sqrt();

        Ok(ModelAccuracy {
            mae,
            rmse_log,
            test_rows: self.y_test_log.len(),
        })
    }
}

/// Fits [`TrainedModel`]s.
#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: TrainerConfig,
    schema: SchemaRegistry,
}

impl ModelTrainer {
    /// Create a trainer with the default schema registry.
    pub fn new(config: TrainerConfig) -> Self {
        Self {
            config,
            schema: SchemaRegistry::default(),
        }
    }

    /// Use a custom schema registry for leakage detection.
    pub fn with_schema(mut self, schema: SchemaRegistry) -> Self {
        self.schema = schema;
        self
    }

    /// Trainer configuration.
    pub const fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Names of the columns the model would be fit on.
    ///
    /// Keeps the numeric columns the registry classifies as plain numeric or
    /// as the identifier; target and leakage-sensitive columns are dropped.
    pub fn select_features(&self, features: &FeatureSet, target: &str) -> Vec<String> {
        let frame = features.frame();
        features
            .dataset()
            .column_names()
            .into_iter()
            .filter(|name| name != target)
            .filter(|name| {
                frame.column(name).is_ok_and(|column| {
                    matches!(
                        self.schema.role(name, column.dtype()),
                        ColumnRole::Identifier | ColumnRole::Numeric
                    ) && is_numeric(column.dtype())
                })
            })
            .collect()
    }

    /// Fit the model against `target`.
    ///
    /// # Errors
    /// * [`TrainingError::MissingTarget`] / [`TrainingError::InvalidTarget`]
    /// * [`TrainingError::InsufficientFeatures`] when fewer than two features remain
    /// * [`TrainingError::InsufficientRows`] below `min_rows`
    pub fn fit(&self, features: &FeatureSet, target: &str) -> Result<TrainedModel, TrainingError> {
        self.config.validate()?;
        let data = features.dataset();

        if !data.has_column(target) {
            return Err(TrainingError::MissingTarget(target.to_string()));
        }
        let y = log_target(&data.f64_values(target)?, target)?;

        let feature_names = self.select_features(features, target);
        if feature_names.len() < MIN_FEATURES {
            return Err(TrainingError::InsufficientFeatures {
                required: MIN_FEATURES,
                actual: feature_names.len(),
            });
        }

        let rows = data.height();
        let min_rows = self.config.min_rows.max(2);
        if rows < min_rows {
            return Err(TrainingError::InsufficientRows {
                required: min_rows,
                actual: rows,
            });
        }

        let x = feature_matrix(features.frame(), &feature_names)?;
        let split = train_test_split(rows, self.config.test_fraction, self.config.seed)?;
        debug!(
            features = feature_names.len(),
            train = split.train.len(),
            test = split.test.len(),
            "split training data"
        );

        let x_train = x.select(Axis(0), &split.train);
        let y_train = y.select(Axis(0), &split.train);
        let x_test = x.select(Axis(0), &split.test);
        let y_test_log = y.select(Axis(0), &split.test);

        let start = Instant::now();
        let forest = RandomForest::fit(&x_train, &y_train, &self.config.forest)?;
        info!(
            estimators = forest.n_estimators(),
            features = feature_names.len(),
            train_rows = split.train.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fitted price model"
        );

        Ok(TrainedModel {
            model: ForestPriceModel::new(forest, feature_names.clone())?,
            x_test,
            y_test_log,
            feature_names,
            config: self.config.clone(),
        })
    }
}

/// Fit with the default trainer.
pub fn fit(features: &FeatureSet, target: &str) -> Result<TrainedModel, TrainingError> {
    ModelTrainer::default().fit(features, target)
}

fn log_target(values: &[Option<f64>], column: &str) -> Result<Array1<f64>, TrainingError> {
    values
        .iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(v) if v.is_finite() && *v >= 0.0 => Ok(v.ln_1p()),
            Some(v) => Err(TrainingError::InvalidTarget {
                column: column.to_string(),
                reason: format!("value {v} at row {row} is not a non-negative price"),
            }),
            None => Err(TrainingError::InvalidTarget {
                column: column.to_string(),
                reason: format!("missing value at row {row}"),
            }),
        })
        .collect()
}
