//! The inference seam between training and scoring.

use crate::error::InferenceError;
use crate::forest::RandomForest;
use crate::matrix::feature_matrix;
use ndarray::{Array1, Array2};
use polars::prelude::DataFrame;
use std::fmt;

/// A regression function from named numeric features to log-scale price.
pub trait PriceModel: fmt::Debug + Send + Sync {
    /// Feature names in the column order the model was fit on.
    fn feature_names(&self) -> &[String];

    /// Predict log prices for a matrix whose columns follow [`Self::feature_names`].
    fn predict_matrix(&self, x: &Array2<f64>) -> Result<Array1<f64>, InferenceError>;

    /// Predict log prices for a frame, re-selecting the training features by name.
    ///
    /// # Errors
    /// [`InferenceError::MissingFeature`] when the frame lacks a training feature.
    fn predict_log(&self, frame: &DataFrame) -> Result<Array1<f64>, InferenceError> {
        let x = feature_matrix(frame, self.feature_names())?;
        self.predict_matrix(&x)
    }

    /// Predict dollar prices (`expm1` of the log prediction).
    fn predict_price(&self, frame: &DataFrame) -> Result<Array1<f64>, InferenceError> {
        Ok(self.predict_log(frame)?.mapv(f64::exp_m1))
    }
}

/// Random forest bound to the feature names it was fit on.
#[derive(Debug, Clone)]
pub struct ForestPriceModel {
    forest: RandomForest,
    feature_names: Vec<String>,
}

impl ForestPriceModel {
    /// Bind a fitted forest to its feature names.
    pub fn new(forest: RandomForest, feature_names: Vec<String>) -> Result<Self, InferenceError> {
        if forest.n_features() != feature_names.len() {
            return Err(InferenceError::DimensionMismatch {
                expected: forest.n_features(),
                actual: feature_names.len(),
            });
        }
        Ok(Self {
            forest,
            feature_names,
        })
    }

    /// The underlying forest.
    pub const fn forest(&self) -> &RandomForest {
        &self.forest
    }
}

impl PriceModel for ForestPriceModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_matrix(&self, x: &Array2<f64>) -> Result<Array1<f64>, InferenceError> {
        self.forest.predict(x)
    }
}

impl<M: PriceModel + ?Sized> PriceModel for std::sync::Arc<M> {
    fn feature_names(&self) -> &[String] {
        (**self).feature_names()
    }

    fn predict_matrix(&self, x: &Array2<f64>) -> Result<Array1<f64>, InferenceError> {
        (**self).predict_matrix(x)
    }
}
