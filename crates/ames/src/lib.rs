#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ames/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod config;
pub mod error;
pub mod pipeline;

// Re-export main types from sub-crates
pub use ames_data as data;
pub use ames_features as features;
pub use ames_model as model;
pub use ames_scoring as scoring;

pub use cache::{CacheResult, PipelineCache};
pub use config::{DatasetConfig, PipelineConfig};
pub use error::{ConfigError, PipelineError};
pub use pipeline::{PipelineOutput, run_pipeline};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
