//! City planner view: sale-price spread across neighborhoods.

use crate::columns::{NEIGHBORHOOD, SALE_PRICE, frame_f64};
use crate::error::ScoringError;
use ames_data::SchemaError;
use ames_features::FeatureSet;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale-price statistics for one neighborhood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodStats {
    /// Neighborhood name
    pub neighborhood: String,
    /// Mean sale price
    pub mean_price: f64,
    /// Median sale price
    pub median_price: f64,
    /// Sample standard deviation; `None` for a single sale
    pub std_price: Option<f64>,
    /// Number of sales
    pub count: usize,
}

/// Per-neighborhood price statistics, most expensive first.
///
/// Neighborhoods with equal means are ordered by name.
pub fn city_price_inequality(features: &FeatureSet) -> Result<Vec<NeighborhoodStats>, ScoringError> {
    let data = features.dataset();
    for column in [NEIGHBORHOOD, SALE_PRICE] {
        if !data.has_column(column) {
            return Err(SchemaError::MissingColumn {
                column: column.to_string(),
            }
            .into());
        }
    }

    let price = || col(SALE_PRICE).cast(DataType::Float64);
    let table = features
        .frame()
        .clone()
        .lazy()
        .group_by([col(NEIGHBORHOOD)])
        .agg([
            price().mean().alias("Mean"),
            price().median().alias("Median"),
            price().std(1).alias("Std"),
            len().alias("Count"),
        ])
        .sort(
            ["Mean", NEIGHBORHOOD],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .collect()?;

    let names: Vec<Option<String>> = table
        .column(NEIGHBORHOOD)?
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    let means = frame_f64(&table, "Mean")?;
    let medians = frame_f64(&table, "Median")?;
    let stds = frame_f64(&table, "Std")?;
    let counts = frame_f64(&table, "Count")?;

    Ok(names
        .into_iter()
        .zip(means)
        .zip(medians)
        .zip(stds)
        .zip(counts)
        .map(|((((name, mean), median), std), count)| NeighborhoodStats {
            neighborhood: name.unwrap_or_default(),
            mean_price: mean.unwrap_or(f64::NAN),
            median_price: median.unwrap_or(f64::NAN),
            std_price: std.filter(|s| !s.is_nan()),
            count: count.unwrap_or_default() as usize,
        })
        .collect())
}
