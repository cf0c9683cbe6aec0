#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ames/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod forest;
pub mod matrix;
pub mod model;
pub mod split;
pub mod trainer;
pub mod tree;

pub use error::{InferenceError, TrainingError};
pub use forest::{ForestConfig, MaxFeatures, RandomForest};
pub use matrix::feature_matrix;
pub use model::{ForestPriceModel, PriceModel};
pub use split::{Split, train_test_split};
pub use trainer::{MIN_FEATURES, ModelAccuracy, ModelTrainer, TrainedModel, TrainerConfig, fit};
pub use tree::{RegressionTree, TreeParams};
