//! Raw-record cleaning.
//!
//! Steps, in order:
//! 1. drop every column whose missing fraction is at least one half
//! 2. fill missing numeric values with the column median
//! 3. fill missing text values with the `"None"` category
//! 4. replace ordinal quality/condition labels with their integer rank

use crate::error::FeatureError;
use ames_data::schema::{MISSING_CATEGORY, is_categorical, is_numeric, ordinal_rank};
use ames_data::{ColumnRole, Dataset, DegenerateInputError, SchemaError, SchemaRegistry, stats};
use polars::prelude::*;
use tracing::{debug, info};

/// Columns missing at least this fraction of values are dropped.
pub const MISSING_FRACTION_THRESHOLD: f64 = 0.5;

/// Cleans raw datasets according to a schema registry.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    schema: SchemaRegistry,
}

impl Preprocessor {
    /// Create a preprocessor for the given registry.
    pub const fn new(schema: SchemaRegistry) -> Self {
        Self { schema }
    }

    /// The registry driving ordinal detection.
    pub const fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// Clean a raw dataset, returning a new one.
    ///
    /// # Errors
    /// * [`DegenerateInputError`] when the dataset has no rows
    /// * [`SchemaError::EmptySchema`] when no numeric or text column survives
    pub fn clean(&self, raw: &Dataset) -> Result<Dataset, FeatureError> {
        if raw.is_empty() {
            return Err(DegenerateInputError::new("dataset has no rows to clean").into());
        }

        let kept = self.drop_sparse_columns(raw)?;

        let mut numeric = Vec::new();
        let mut categorical = Vec::new();
        for name in kept.column_names() {
            let dtype = kept.dtype(&name)?;
            if is_numeric(&dtype) {
                numeric.push(name);
            } else if is_categorical(&dtype) {
                let ordinal = self.schema.role(&name, &dtype) == ColumnRole::Ordinal;
                categorical.push((name, ordinal));
            }
        }

        if numeric.is_empty() && categorical.is_empty() {
            return Err(SchemaError::EmptySchema.into());
        }

        let mut replacements = Vec::new();
        for name in &numeric {
            if let Some(column) = impute_median(&kept, name)? {
                replacements.push(column);
            }
        }

        let mut encoded = 0usize;
        for (name, ordinal) in &categorical {
            let values = kept.str_values(name)?;
            if *ordinal {
                let ranks: Vec<i32> = values
                    .iter()
                    .map(|v| ordinal_rank(v.as_deref().unwrap_or(MISSING_CATEGORY)))
                    .collect();
                replacements.push(Column::new(name.as_str().into(), ranks));
                encoded += 1;
            } else if values.iter().any(Option::is_none) {
                let filled: Vec<String> = values
                    .into_iter()
                    .map(|v| v.unwrap_or_else(|| MISSING_CATEGORY.to_string()))
                    .collect();
                replacements.push(Column::new(name.as_str().into(), filled));
            }
        }

        let cleaned = kept.with_columns(replacements)?;

        info!(
            rows = cleaned.height(),
            numeric = numeric.len(),
            categorical = categorical.len(),
            ordinal_encoded = encoded,
            "cleaned dataset"
        );

        Ok(cleaned)
    }

    fn drop_sparse_columns(&self, raw: &Dataset) -> Result<Dataset, FeatureError> {
        let height = raw.height() as f64;
        let mut kept = Vec::new();

        for name in raw.column_names() {
            let missing = missing_count(raw, &name)? as f64;
            let fraction = missing / height;
            if fraction < MISSING_FRACTION_THRESHOLD {
                kept.push(name);
            } else {
                debug!(column = %name, fraction, "dropping sparse column");
            }
        }

        Ok(raw.select(kept.iter().map(String::as_str))?)
    }
}

/// Clean a dataset with the default schema registry.
pub fn clean(raw: &Dataset) -> Result<Dataset, FeatureError> {
    Preprocessor::default().clean(raw)
}

/// Count nulls, plus NaN entries for numeric columns.
fn missing_count(data: &Dataset, name: &str) -> Result<usize, FeatureError> {
    let dtype = data.dtype(name)?;
    if is_numeric(&dtype) {
        Ok(data
            .f64_values(name)?
            .iter()
            .filter(|v| v.is_none())
            .count())
    } else if is_categorical(&dtype) {
        Ok(data
            .str_values(name)?
            .iter()
            .filter(|v| v.is_none())
            .count())
    } else {
        Ok(data.frame().column(name)?.null_count())
    }
}

/// Median-filled replacement for a numeric column, or `None` if complete.
fn impute_median(data: &Dataset, name: &str) -> Result<Option<Column>, FeatureError> {
    let values = data.f64_values(name)?;
    if values.iter().all(Option::is_some) {
        return Ok(None);
    }

    let fill = stats::median(values.iter().flatten().copied()).ok_or_else(|| {
        DegenerateInputError::new(format!("column {name} has no values to take a median of"))
    })?;
    debug!(column = %name, fill, "imputing median");

    let filled: Vec<f64> = values.into_iter().map(|v| v.unwrap_or(fill)).collect();
    Ok(Some(Column::new(name.into(), filled)))
}
