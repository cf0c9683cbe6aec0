//! Schema Registry
//!
//! Central, versioned description of which columns play which role in the
//! pipeline. Stages ask the registry instead of matching column names
//! themselves, so a naming convention change is a one-line registry edit.

use polars::prelude::DataType;
use serde::{Deserialize, Serialize};

/// Current registry version.
pub const SCHEMA_VERSION: u32 = 1;

/// Label used to fill missing categorical values.
pub const MISSING_CATEGORY: &str = "None";

/// Ordinal quality/condition labels and their ranks.
pub const ORDINAL_LABELS: [(&str, i32); 6] = [
    ("Ex", 5),
    ("Gd", 4),
    ("TA", 3),
    ("Fa", 2),
    ("Po", 1),
    (MISSING_CATEGORY, 0),
];

/// Zoning codes that count as residential.
pub const RESIDENTIAL_ZONES: [&str; 4] = ["RL", "RM", "RP", "RH"];

/// Role a column plays in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnRole {
    /// Unique record identifier
    Identifier,
    /// Prediction target
    Target,
    /// Ranked categorical label encoded as an integer
    Ordinal,
    /// Derived from or adjacent to the target; never a model input
    LeakageSensitive,
    /// Any other numeric column
    Numeric,
    /// Any other text column
    Categorical,
}

/// Versioned registry of column roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRegistry {
    /// Registry version
    pub version: u32,
    /// Identifier column name
    pub id_column: String,
    /// Target column name
    pub target_column: String,
    /// Name fragments marking ordinal quality/condition columns
    pub ordinal_patterns: Vec<String>,
    /// Name fragments marking leakage-sensitive columns
    pub leakage_patterns: Vec<String>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            id_column: "Id".to_string(),
            target_column: "SalePrice".to_string(),
            ordinal_patterns: vec!["Qual".to_string(), "Cond".to_string()],
            leakage_patterns: vec!["Price".to_string()],
        }
    }
}

impl SchemaRegistry {
    /// Whether the column is an ordinal quality/condition column.
    ///
    /// Matching is a case-sensitive substring test against the registered
    /// patterns. Only text columns are remapped; numeric columns such as
    /// `OverallQual` already carry ranks.
    pub fn is_ordinal(&self, column: &str) -> bool {
        self.ordinal_patterns
            .iter()
            .any(|pattern| column.contains(pattern.as_str()))
    }

    /// Whether the column must be kept out of model inputs.
    pub fn is_leakage_sensitive(&self, column: &str) -> bool {
        self.leakage_patterns
            .iter()
            .any(|pattern| column.contains(pattern.as_str()))
    }

    /// Resolve the role of a column given its dtype.
    pub fn role(&self, column: &str, dtype: &DataType) -> ColumnRole {
        if column == self.id_column {
            ColumnRole::Identifier
        } else if column == self.target_column {
            ColumnRole::Target
        } else if self.is_leakage_sensitive(column) {
            ColumnRole::LeakageSensitive
        } else if is_numeric(dtype) {
            ColumnRole::Numeric
        } else if self.is_ordinal(column) {
            ColumnRole::Ordinal
        } else {
            ColumnRole::Categorical
        }
    }
}

/// Rank of an ordinal label; unmapped labels rank 0.
pub fn ordinal_rank(label: &str) -> i32 {
    ORDINAL_LABELS
        .iter()
        .find(|(name, _)| *name == label)
        .map_or(0, |(_, rank)| *rank)
}

/// Whether a dtype counts as numeric for imputation and model input.
pub const fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Whether a dtype counts as categorical text.
pub const fn is_categorical(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String)
}
