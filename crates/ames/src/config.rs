//! Pipeline configuration.
//!
//! Defaults can be overridden from a JSON file and then from environment
//! variables ([`PipelineConfig::with_env_overrides`]).

use crate::error::ConfigError;
use ames_data::CsvSource;
use ames_model::TrainerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the dataset.
pub const ENV_DATA_DIR: &str = "AMES_DATA_DIR";
/// Dataset file name.
pub const ENV_DATASET: &str = "AMES_DATASET";

/// Where the raw dataset lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Directory holding the dataset (default: `data`)
    pub data_dir: PathBuf,
    /// CSV file name (default: `train.csv`)
    pub file_name: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_name: "train.csv".to_string(),
        }
    }
}

impl DatasetConfig {
    /// Full path of the dataset.
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }

    /// CSV source for the dataset.
    pub fn source(&self) -> CsvSource {
        CsvSource::in_dir(&self.data_dir, &self.file_name)
    }
}

/// Configuration for a pipeline run
///
/// Column roles, the target included, come from the schema registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw dataset location
    pub dataset: DatasetConfig,
    /// Trainer and forest settings
    pub trainer: TrainerConfig,
}

impl PipelineConfig {
    /// Parse from JSON; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Apply `AMES_DATA_DIR` and `AMES_DATASET` as returned by `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.dataset.data_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup(ENV_DATASET).filter(|v| !v.is_empty()) {
            self.dataset.file_name = file;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.dataset.path(), Path::new("data").join("train.csv"));
        assert_eq!(config.trainer.forest.n_estimators, 200);
        assert_eq!(config.trainer.test_fraction, 0.2);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PipelineConfig::from_json_str(
            r#"{ "trainer": { "forest": { "n_estimators": 25, "max_features": "sqrt" } } }"#,
        )
        .unwrap();

        assert_eq!(config.trainer.forest.n_estimators, 25);
        assert_eq!(config.trainer.forest.max_depth, 15);
        assert_eq!(config.trainer.seed, 42);
        assert_eq!(config.dataset, DatasetConfig::default());
    }

    #[test]
    fn test_target_is_not_a_setting() {
        let config = PipelineConfig::from_json_str(r#"{ "target": "LotArea" }"#).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            PipelineConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [(ENV_DATA_DIR, "/srv/ames"), (ENV_DATASET, "")].into();
        let config = PipelineConfig::default()
            .with_env_overrides(|key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.dataset.data_dir, PathBuf::from("/srv/ames"));
        // empty values are ignored
        assert_eq!(config.dataset.file_name, "train.csv");
    }

    #[test]
    fn test_missing_config_file() {
        assert!(matches!(
            PipelineConfig::from_json_file(Path::new("/no/such/ames.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}
