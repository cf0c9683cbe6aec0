//! Builder return on quality.
//!
//! Mean sale price per `OverallQual` tier, ascending by tier, with the price
//! step from the tier below. The lowest tier has no tier below it, so its
//! step is `None`.
//!
//! Tiers are read as `f64`: median imputation can leave a half-step rating
//! such as 6.5, which forms its own tier.

use crate::columns::{OVERALL_QUAL, SALE_PRICE, frame_f64};
use crate::error::ScoringError;
use ames_data::SchemaError;
use ames_features::FeatureSet;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One quality tier of the ROI table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityTierRoi {
    /// `OverallQual` rating
    pub overall_qual: f64,
    /// Mean sale price in the tier
    pub mean_price: f64,
    /// Properties in the tier
    pub count: usize,
    /// Mean price minus the previous tier's mean; `None` for the first tier
    pub price_increase: Option<f64>,
}

/// Mean sale price per quality tier and the increase between tiers.
pub fn builder_feature_roi(features: &FeatureSet) -> Result<Vec<QualityTierRoi>, ScoringError> {
    let data = features.dataset();
    for column in [OVERALL_QUAL, SALE_PRICE] {
        if !data.has_column(column) {
            return Err(SchemaError::MissingColumn {
                column: column.to_string(),
            }
            .into());
        }
    }

    let table = features
        .frame()
        .clone()
        .lazy()
        .group_by([col(OVERALL_QUAL)])
        .agg([
            col(SALE_PRICE).cast(DataType::Float64).mean().alias("MeanPrice"),
            len().alias("Count"),
        ])
        .sort([OVERALL_QUAL], SortMultipleOptions::default())
        .with_columns([(col("MeanPrice") - col("MeanPrice").shift(lit(1))).alias("PriceIncrease")])
        .collect()?;

    let tiers = frame_f64(&table, OVERALL_QUAL)?;
    let means = frame_f64(&table, "MeanPrice")?;
    let counts = frame_f64(&table, "Count")?;
    let increases = frame_f64(&table, "PriceIncrease")?;

    Ok(tiers
        .into_iter()
        .zip(means)
        .zip(counts)
        .zip(increases)
        .map(|(((tier, mean), count), increase)| QualityTierRoi {
            overall_qual: tier.unwrap_or(f64::NAN),
            mean_price: mean.unwrap_or(f64::NAN),
            count: count.unwrap_or_default() as usize,
            price_increase: increase,
        })
        .collect())
}
