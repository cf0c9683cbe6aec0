//! Bagged random forest of regression trees.
//!
//! Estimator `i` draws its bootstrap sample and its per-split feature subsets
//! from an RNG seeded with `seed + i`, so a fit is reproducible regardless of
//! how rayon schedules the trees.

use crate::error::{InferenceError, TrainingError};
use crate::tree::{RegressionTree, TreeParams};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of features considered at each split.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// Every feature
    #[default]
    All,
    /// Square root of the feature count
    Sqrt,
    /// Fraction of the feature count, in (0, 1]
    Fraction(f64),
}

impl MaxFeatures {
    /// Resolve against a feature count (at least 1).
    pub fn resolve(&self, n_features: usize) -> usize {
        let k = match *self {
            Self::All => n_features,
            Self::Sqrt => (n_features as f64).sqrt().floor() as usize,
            Self::Fraction(f) => (n_features as f64 * f).floor() as usize,
        };
        k.clamp(1, n_features.max(1))
    }
}

/// Configuration for the random forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees (default: 200)
    pub n_estimators: usize,
    /// Maximum tree depth (default: 15)
    pub max_depth: usize,
    /// Minimum rows required to split a node (default: 2)
    pub min_samples_split: usize,
    /// Minimum rows in each leaf (default: 1)
    pub min_samples_leaf: usize,
    /// Features considered per split (default: all)
    pub max_features: MaxFeatures,
    /// Draw a bootstrap sample per tree (default: true)
    pub bootstrap: bool,
    /// Base RNG seed (default: 42)
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            max_depth: 15,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::All,
            bootstrap: true,
            seed: 42,
        }
    }
}

impl ForestConfig {
    /// Check that every parameter is in range.
    pub fn validate(&self) -> Result<(), TrainingError> {
        if self.n_estimators == 0 {
            return Err(TrainingError::InvalidConfig(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(TrainingError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(TrainingError::InvalidConfig(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(TrainingError::InvalidConfig(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if let MaxFeatures::Fraction(f) = self.max_features
            && !(f > 0.0 && f <= 1.0)
        {
            return Err(TrainingError::InvalidConfig(format!(
                "max_features fraction must be in (0, 1], got {f}"
            )));
        }
        Ok(())
    }
}

/// Fitted random forest
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForest {
    /// Fit a forest on `x` (rows x features) and `y`.
    ///
    /// Trees are built on the rayon pool; the call returns once all are done.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, config: &ForestConfig) -> Result<Self, TrainingError> {
        config.validate()?;
        let rows = x.nrows();
        if rows != y.len() {
            return Err(TrainingError::Shape {
                rows,
                targets: y.len(),
            });
        }
        if rows == 0 {
            return Err(TrainingError::InsufficientRows {
                required: 1,
                actual: 0,
            });
        }

        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            min_samples_leaf: config.min_samples_leaf,
            max_features: config.max_features.resolve(x.ncols()),
        };

        let trees = (0..config.n_estimators)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(i as u64));
                let sample: Vec<usize> = if config.bootstrap {
                    (0..rows).map(|_| rng.gen_range(0..rows)).collect()
                } else {
                    (0..rows).collect()
                };
                RegressionTree::fit(x.view(), y.view(), &sample, &params, &mut rng)
            })
            .collect();

        Ok(Self {
            trees,
            n_features: x.ncols(),
        })
    }

    /// Number of fitted trees.
    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    /// Number of input features.
    pub const fn n_features(&self) -> usize {
        self.n_features
    }

    /// The fitted trees.
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Average of the tree predictions for each row of `x`.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, InferenceError> {
        if x.ncols() != self.n_features {
            return Err(InferenceError::DimensionMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }

        let n_trees = self.trees.len() as f64;
        let predictions: Vec<f64> = (0..x.nrows())
            .into_par_iter()
            .map(|i| {
                let row = x.row(i);
                self.trees.iter().map(|t| t.predict_row(row)).sum::<f64>() / n_trees
            })
            .collect();

        Ok(Array1::from_vec(predictions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rstest::rstest;

    fn small() -> ForestConfig {
        ForestConfig {
            n_estimators: 10,
            max_depth: 4,
            ..ForestConfig::default()
        }
    }

    fn linear_data() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((40, 2), |(i, j)| if j == 0 { i as f64 } else { (i % 3) as f64 });
        let y = Array1::from_shape_fn(40, |i| 2.0 * i as f64);
        (x, y)
    }

    #[test]
    fn test_defaults() {
        let config = ForestConfig::default();
        assert_eq!(config.n_estimators, 200);
        assert_eq!(config.max_depth, 15);
        assert_eq!(config.seed, 42);
        assert!(config.bootstrap);
    }

    #[rstest]
    #[case(MaxFeatures::All, 16, 16)]
    #[case(MaxFeatures::Sqrt, 16, 4)]
    #[case(MaxFeatures::Fraction(0.5), 16, 8)]
    #[case(MaxFeatures::Fraction(0.01), 16, 1)]
    fn test_max_features_resolve(#[case] mf: MaxFeatures, #[case] n: usize, #[case] expected: usize) {
        assert_eq!(mf.resolve(n), expected);
    }

    #[test]
    fn test_fit_is_reproducible() {
        let (x, y) = linear_data();
        let a = RandomForest::fit(&x, &y, &small()).unwrap().predict(&x).unwrap();
        let b = RandomForest::fit(&x, &y, &small()).unwrap().predict(&x).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fit_tracks_training_target() {
        let (x, y) = linear_data();
        let forest = RandomForest::fit(&x, &y, &small()).unwrap();
        assert_eq!(forest.n_estimators(), 10);

        let predictions = forest.predict(&x).unwrap();
        let mae = (&predictions - &y).mapv(f64::abs).mean().unwrap();
        assert!(mae < 8.0, "mae {mae}");
    }

    #[test]
    fn test_without_bootstrap_trees_agree() {
        let (x, y) = linear_data();
        let config = ForestConfig {
            bootstrap: false,
            ..small()
        };
        let forest = RandomForest::fit(&x, &y, &config).unwrap();
        let first = forest.trees()[0].predict_row(x.row(5));
        let last = forest.trees()[9].predict_row(x.row(5));
        assert_relative_eq!(first, last);
    }

    #[test]
    fn test_predict_checks_width() {
        let (x, y) = linear_data();
        let forest = RandomForest::fit(&x, &y, &small()).unwrap();
        assert!(matches!(
            forest.predict(&array![[1.0, 2.0, 3.0]]),
            Err(InferenceError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[rstest]
    #[case::no_trees(ForestConfig { n_estimators: 0, ..ForestConfig::default() })]
    #[case::no_depth(ForestConfig { max_depth: 0, ..ForestConfig::default() })]
    #[case::bad_fraction(ForestConfig { max_features: MaxFeatures::Fraction(1.5), ..ForestConfig::default() })]
    fn test_invalid_config(#[case] config: ForestConfig) {
        assert!(matches!(config.validate(), Err(TrainingError::InvalidConfig(_))));
    }

    #[test]
    fn test_shape_mismatch() {
        let x = Array2::<f64>::zeros((3, 2));
        let y = Array1::<f64>::zeros(4);
        assert!(matches!(
            RandomForest::fit(&x, &y, &small()),
            Err(TrainingError::Shape { rows: 3, targets: 4 })
        ));
    }
}
