#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ames/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod engineer;
pub mod error;
pub mod feature_set;
pub mod groups;
pub mod preprocess;
pub mod registry;

pub use engineer::{FeatureEngineer, engineer};
pub use error::FeatureError;
pub use feature_set::FeatureSet;
pub use groups::{FeatureGroup, InputColumns};
pub use preprocess::{MISSING_FRACTION_THRESHOLD, Preprocessor, clean};

// Re-export registry types for convenience
pub use registry::{
    Fallback, FeatureInfo, Perspective, available_features, feature_names,
    features_by_perspective, get_feature_info,
};
