//! Dataset sources.
//!
//! The pipeline consumes raw records through [`DatasetSource`] so the same
//! orchestration runs against a CSV file on disk or an in-memory frame.

use crate::dataset::Dataset;
use crate::error::{DataError, Result};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

/// Token used for missing values in Ames-style CSV files.
pub const CSV_NULL_TOKEN: &str = "NA";

/// Rows scanned when inferring CSV column types.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Anything that can produce the raw dataset for a pipeline run.
pub trait DatasetSource {
    /// Stable name of the dataset (used for logging and cache identity).
    fn name(&self) -> &str;

    /// Load the raw dataset.
    fn load(&self) -> Result<Dataset>;
}

/// CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    name: String,
}

impl CsvSource {
    /// Create a source for a CSV file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self { path, name }
    }

    /// Create a source for `file_name` inside `data_dir`.
    pub fn in_dir(data_dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self::new(data_dir.as_ref().join(file_name))
    }

    /// Path of the CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for CsvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Dataset> {
        if !self.path.is_file() {
            return Err(DataError::NotFound {
                path: self.path.clone(),
            });
        }

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .with_parse_options(
                CsvParseOptions::default()
                    .with_null_values(Some(NullValues::AllColumnsSingle(CSV_NULL_TOKEN.into()))),
            )
            .try_into_reader_with_file_path(Some(self.path.clone()))?
            .finish()?;

        info!(
            dataset = %self.name,
            rows = frame.height(),
            columns = frame.width(),
            "loaded dataset"
        );

        Ok(Dataset::new(frame)?)
    }
}

/// Dataset already held in memory.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    name: String,
    dataset: Dataset,
}

impl InMemorySource {
    /// Wrap an existing dataset under a name.
    pub fn new(name: impl Into<String>, dataset: Dataset) -> Self {
        Self {
            name: name.into(),
            dataset,
        }
    }
}

impl DatasetSource for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Dataset> {
        Ok(self.dataset.clone())
    }
}

impl<S: DatasetSource + ?Sized> DatasetSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load(&self) -> Result<Dataset> {
        (**self).load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_source_name_is_file_name() {
        let source = CsvSource::in_dir("data", "train.csv");
        assert_eq!(source.name(), "train.csv");
        assert_eq!(source.path(), Path::new("data").join("train.csv"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let source = CsvSource::new("/definitely/not/here/train.csv");
        assert!(matches!(source.load(), Err(DataError::NotFound { .. })));
    }

    #[test]
    fn test_in_memory_source_returns_copy() {
        let frame = df!("Id" => [1i64, 2]).unwrap();
        let source = InMemorySource::new("memory", Dataset::new(frame).unwrap());
        assert_eq!(source.name(), "memory");
        assert_eq!(source.load().unwrap().height(), 2);
    }
}
