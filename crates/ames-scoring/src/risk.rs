//! Banker risk score.
//!
//! `RiskScore = HouseAge * 0.4 + (6 - OverallCond) * 8 + (PricePerSqFt / median) * 10`
//! where `median` is the market median price per square foot, replaced by 1
//! when it is exactly 0.

use crate::columns::{HOUSE_AGE, OVERALL_COND, PRICE_PER_SQFT, RISK_SCORE, dense};
use crate::error::ScoringError;
use ames_data::{DegenerateInputError, stats};
use ames_features::FeatureSet;
use polars::prelude::*;
use tracing::debug;

/// Weight per year of age.
pub const AGE_WEIGHT: f64 = 0.4;
/// Condition rating treated as neutral.
pub const NEUTRAL_CONDITION: f64 = 6.0;
/// Weight per condition point below neutral.
pub const CONDITION_WEIGHT: f64 = 8.0;
/// Weight of price per square foot relative to the market median.
pub const VALUATION_WEIGHT: f64 = 10.0;

/// Append `RiskScore` and sort rows by it, highest first.
pub fn banker_risk_score(features: &FeatureSet) -> Result<FeatureSet, ScoringError> {
    let data = features.dataset();
    let age = dense(data, HOUSE_AGE)?;
    let condition = dense(data, OVERALL_COND)?;
    let ppsf = dense(data, PRICE_PER_SQFT)?;

    let median = stats::median(ppsf.iter().copied())
        .ok_or_else(|| DegenerateInputError::new("no price per square foot to take a median of"))?;
    let median = if median == 0.0 { 1.0 } else { median };
    debug!(median_ppsf = median, "market median price per square foot");

    let risk: Vec<f64> = age
        .iter()
        .zip(&condition)
        .zip(&ppsf)
        .map(|((a, c), p)| {
            a * AGE_WEIGHT + (NEUTRAL_CONDITION - c) * CONDITION_WEIGHT + (p / median) * VALUATION_WEIGHT
        })
        .collect();

    Ok(features
        .with_columns(vec![Column::new(RISK_SCORE.into(), risk)])?
        .sorted_by(RISK_SCORE, true)?)
}
