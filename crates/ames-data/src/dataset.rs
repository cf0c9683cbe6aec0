//! Immutable property-sale dataset.
//!
//! A [`Dataset`] wraps a polars [`DataFrame`] whose identifier column is
//! present, complete and unique. Every operation that adds, replaces or
//! reorders columns returns a new value; the wrapped frame is never exposed
//! mutably.

use crate::error::SchemaError;
use polars::prelude::*;
use std::collections::HashSet;

/// Default identifier column.
pub const ID_COLUMN: &str = "Id";

/// Ordered collection of property records sharing a schema.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    id_column: String,
}

impl Dataset {
    /// Wrap a frame keyed by the default `Id` column.
    pub fn new(frame: DataFrame) -> Result<Self, SchemaError> {
        Self::with_id_column(frame, ID_COLUMN)
    }

    /// Wrap a frame keyed by a custom identifier column.
    ///
    /// # Errors
    /// Fails when the identifier column is absent, not integral, has nulls or
    /// repeats a value.
    pub fn with_id_column(frame: DataFrame, id_column: &str) -> Result<Self, SchemaError> {
        let ids = read_ids(&frame, id_column)?;

        let mut seen = HashSet::with_capacity(ids.len());
        for id in ids {
            if !seen.insert(id) {
                return Err(SchemaError::DuplicateId {
                    column: id_column.to_string(),
                    id,
                });
            }
        }

        Ok(Self {
            frame,
            id_column: id_column.to_string(),
        })
    }

    /// Borrow the underlying frame.
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Consume the dataset and return the underlying frame.
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Identifier column name.
    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Number of records.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Column names in frame order.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str().to_string())
            .collect()
    }

    /// Whether a column is present.
    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// Dtype of a column.
    pub fn dtype(&self, name: &str) -> Result<DataType, SchemaError> {
        Ok(self.column(name)?.dtype().clone())
    }

    /// Record identifiers in row order.
    pub fn ids(&self) -> Result<Vec<i64>, SchemaError> {
        read_ids(&self.frame, &self.id_column)
    }

    /// Values of a numeric column as `f64`, with `None` for missing entries.
    pub fn f64_values(&self, name: &str) -> Result<Vec<Option<f64>>, SchemaError> {
        let column = self.column(name)?;
        let wrong_type = || SchemaError::WrongType {
            column: name.to_string(),
            expected: "numeric",
            actual: column.dtype().to_string(),
        };
        if !crate::schema::is_numeric(column.dtype()) {
            return Err(wrong_type());
        }

        let cast = column
            .cast(&DataType::Float64)
            .map_err(|_| wrong_type())?;
        let values = cast
            .as_materialized_series()
            .f64()
            .map_err(|_| wrong_type())?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();

        Ok(values)
    }

    /// Values of a numeric column as `f64`, with missing entries as NaN.
    pub fn f64_dense(&self, name: &str) -> Result<Vec<f64>, SchemaError> {
        Ok(self
            .f64_values(name)?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect())
    }

    /// Values of a text column, with `None` for missing entries.
    pub fn str_values(&self, name: &str) -> Result<Vec<Option<String>>, SchemaError> {
        let column = self.column(name)?;
        let values = column
            .as_materialized_series()
            .str()
            .map_err(|_| SchemaError::WrongType {
                column: name.to_string(),
                expected: "string",
                actual: column.dtype().to_string(),
            })?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();

        Ok(values)
    }

    /// Return a new dataset with the given columns added or replaced.
    pub fn with_columns(&self, columns: Vec<Column>) -> PolarsResult<Self> {
        let mut frame = self.frame.clone();
        for column in columns {
            frame.with_column(column)?;
        }
        Ok(Self {
            frame,
            id_column: self.id_column.clone(),
        })
    }

    /// Return a new dataset keeping only the named columns, in the given order.
    pub fn select<I, S>(&self, columns: I) -> PolarsResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<PlSmallStr>,
    {
        Ok(Self {
            frame: self.frame.select(columns)?,
            id_column: self.id_column.clone(),
        })
    }

    /// Return a new dataset stably sorted by one column.
    pub fn sorted_by(&self, column: &str, descending: bool) -> PolarsResult<Self> {
        let frame = self.frame.sort(
            [column],
            SortMultipleOptions::default()
                .with_order_descending(descending)
                .with_maintain_order(true),
        )?;
        Ok(Self {
            frame,
            id_column: self.id_column.clone(),
        })
    }

    fn column(&self, name: &str) -> Result<&Column, SchemaError> {
        self.frame
            .column(name)
            .map_err(|_| SchemaError::MissingColumn {
                column: name.to_string(),
            })
    }
}

fn read_ids(frame: &DataFrame, id_column: &str) -> Result<Vec<i64>, SchemaError> {
    let missing = || SchemaError::MissingId {
        column: id_column.to_string(),
    };

    let column = frame.column(id_column).map_err(|_| missing())?;
    if !matches!(
        column.dtype(),
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    ) {
        return Err(SchemaError::WrongType {
            column: id_column.to_string(),
            expected: "integer",
            actual: column.dtype().to_string(),
        });
    }

    let cast = column.cast(&DataType::Int64).map_err(|_| missing())?;
    cast.as_materialized_series()
        .i64()
        .map_err(|_| missing())?
        .into_iter()
        .map(|id| id.ok_or_else(missing))
        .collect()
}
