//! Feature-enriched dataset.

use crate::registry::feature_names;
use ames_data::{Dataset, SchemaError};
use polars::prelude::*;

/// A cleaned [`Dataset`] guaranteed to carry every registered derived column.
///
/// Scorers extend a feature set with further columns; the derived columns are
/// never removed, so the guarantee holds for every value of this type.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    data: Dataset,
}

impl FeatureSet {
    /// Wrap a dataset that already carries the derived columns.
    ///
    /// # Errors
    /// [`SchemaError::MissingColumn`] naming the first absent derived column.
    pub fn new(data: Dataset) -> Result<Self, SchemaError> {
        if let Some(missing) = feature_names().into_iter().find(|n| !data.has_column(n)) {
            return Err(SchemaError::MissingColumn {
                column: missing.to_string(),
            });
        }
        Ok(Self { data })
    }

    /// Borrow the underlying dataset.
    pub const fn dataset(&self) -> &Dataset {
        &self.data
    }

    /// Borrow the underlying frame.
    pub const fn frame(&self) -> &DataFrame {
        self.data.frame()
    }

    /// Consume and return the underlying dataset.
    pub fn into_dataset(self) -> Dataset {
        self.data
    }

    /// Number of records.
    pub fn height(&self) -> usize {
        self.data.height()
    }

    /// Return a new feature set with extra columns added or replaced.
    pub fn with_columns(&self, columns: Vec<Column>) -> PolarsResult<Self> {
        Ok(Self {
            data: self.data.with_columns(columns)?,
        })
    }

    /// Return a new feature set stably sorted by one column.
    pub fn sorted_by(&self, column: &str, descending: bool) -> PolarsResult<Self> {
        Ok(Self {
            data: self.data.sorted_by(column, descending)?,
        })
    }
}

impl AsRef<Dataset> for FeatureSet {
    fn as_ref(&self) -> &Dataset {
        &self.data
    }
}
