//! Derived business metrics.
//!
//! [`FeatureEngineer`] checks every registered input up front and then runs
//! each perspective's [`FeatureGroup`] over a lazy frame. Zero denominators
//! are replaced by 1, so on well-formed input the only failures are the
//! up-front schema checks.

use crate::error::FeatureError;
use crate::feature_set::FeatureSet;
use crate::groups::{FeatureGroup, InputColumns, default_groups};
use crate::registry::{InputKind, available_features};
use ames_data::schema::{is_categorical, is_numeric};
use ames_data::{Dataset, SchemaError};
use polars::prelude::*;
use tracing::{debug, info};

/// Computes the registered derived features.
#[derive(Debug)]
pub struct FeatureEngineer {
    groups: Vec<Box<dyn FeatureGroup>>,
}

impl Default for FeatureEngineer {
    fn default() -> Self {
        Self {
            groups: default_groups(),
        }
    }
}

impl FeatureEngineer {
    /// Create an engineer running the standard perspective groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive features from a cleaned dataset.
    ///
    /// # Errors
    /// [`SchemaError`] when a required input is absent or has the wrong type.
    pub fn engineer(&self, clean: &Dataset) -> Result<FeatureSet, FeatureError> {
        validate_inputs(clean)?;

        let inputs = InputColumns::from_dataset(clean);
        let mut lazy = clean.frame().clone().lazy();
        for group in &self.groups {
            debug!(perspective = group.perspective().name(), "computing feature group");
            lazy = group.compute(lazy, &inputs)?;
        }

        let frame = lazy.collect()?;
        let data = Dataset::with_id_column(frame, clean.id_column())?;
        let features = FeatureSet::new(data)?;

        info!(
            rows = features.height(),
            groups = self.groups.len(),
            "engineered features"
        );

        Ok(features)
    }
}

/// Derive features with the standard groups.
pub fn engineer(clean: &Dataset) -> Result<FeatureSet, FeatureError> {
    FeatureEngineer::default().engineer(clean)
}

fn validate_inputs(data: &Dataset) -> Result<(), SchemaError> {
    for feature in available_features() {
        for input in feature.required {
            let dtype = data.dtype(input.column)?;
            let (ok, expected) = match input.kind {
                InputKind::Numeric => (is_numeric(&dtype), "numeric"),
                InputKind::Text => (is_categorical(&dtype), "string"),
            };
            if !ok {
                return Err(SchemaError::WrongType {
                    column: input.column.to_string(),
                    expected,
                    actual: dtype.to_string(),
                });
            }
        }
    }
    Ok(())
}
