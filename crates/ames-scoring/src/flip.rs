//! Investor flip score: underpricing plus quality upside.

use crate::columns::{FLIP_SCORE, PREDICTED_PRICE, QUALITY_INDEX, SALE_PRICE, dense};
use crate::error::ScoringError;
use ames_features::FeatureSet;
use polars::prelude::*;

/// Dollars added per point of `QualityIndex`.
pub const QUALITY_WEIGHT: f64 = 5_000.0;

/// Append `FlipScore = (PredictedPrice - SalePrice) + QualityIndex * 5000`
/// and sort rows by it, highest first.
///
/// # Errors
/// [`ScoringError::MissingPrediction`] unless fair-price scoring ran first.
pub fn investor_flip_score(scored: &FeatureSet) -> Result<FeatureSet, ScoringError> {
    let data = scored.dataset();
    if !data.has_column(PREDICTED_PRICE) {
        return Err(ScoringError::MissingPrediction);
    }

    let predicted = dense(data, PREDICTED_PRICE)?;
    let sale = dense(data, SALE_PRICE)?;
    let quality = dense(data, QUALITY_INDEX)?;

    let flip: Vec<f64> = predicted
        .iter()
        .zip(&sale)
        .zip(&quality)
        .map(|((p, s), q)| (p - s) + q * QUALITY_WEIGHT)
        .collect();

    Ok(scored
        .with_columns(vec![Column::new(FLIP_SCORE.into(), flip)])?
        .sorted_by(FLIP_SCORE, true)?)
}
