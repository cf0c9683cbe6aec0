//! Column names read and written by the scorers.

use crate::error::ScoringError;
use ames_data::{Dataset, DegenerateInputError};
use polars::prelude::*;

/// Observed sale price
pub const SALE_PRICE: &str = "SalePrice";
/// Model prediction in dollars
pub const PREDICTED_PRICE: &str = "PredictedPrice";
/// Sale price minus prediction
pub const PRICE_GAP: &str = "PriceGap";
/// Fair-price label
pub const PRICE_LABEL: &str = "PriceLabel";
/// Investor flip score
pub const FLIP_SCORE: &str = "FlipScore";
/// Lender risk score
pub const RISK_SCORE: &str = "RiskScore";
/// Sale price per square foot
pub const PRICE_PER_SQFT: &str = "PricePerSqFt";
/// Weighted quality and condition
pub const QUALITY_INDEX: &str = "QualityIndex";
/// Years between construction and sale
pub const HOUSE_AGE: &str = "HouseAge";
/// Overall quality rating
pub const OVERALL_QUAL: &str = "OverallQual";
/// Overall condition rating
pub const OVERALL_COND: &str = "OverallCond";
/// Neighborhood name
pub const NEIGHBORHOOD: &str = "Neighborhood";

/// Complete values of a numeric column.
pub(crate) fn dense(data: &Dataset, name: &str) -> Result<Vec<f64>, ScoringError> {
    data.f64_values(name)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| {
                ScoringError::from(DegenerateInputError::new(format!(
                    "column {name} has no value at row {row}"
                )))
            })
        })
        .collect()
}

/// Values of a numeric column in an aggregate frame.
pub(crate) fn frame_f64(frame: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let cast = frame.column(name)?.cast(&DataType::Float64)?;
    Ok(cast.as_materialized_series().f64()?.into_iter().collect())
}
