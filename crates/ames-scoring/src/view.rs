//! Presentation rows.

use crate::columns::{
    FLIP_SCORE, HOUSE_AGE, OVERALL_COND, PREDICTED_PRICE, PRICE_GAP, PRICE_LABEL, QUALITY_INDEX,
    RISK_SCORE, SALE_PRICE, dense,
};
use crate::error::ScoringError;
use crate::fair_price::PriceLabel;
use ames_data::DegenerateInputError;
use ames_features::FeatureSet;
use serde::{Deserialize, Serialize};

/// One fully scored property, as shown to dashboards and exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProperty {
    /// Record identifier
    pub id: i64,
    /// Observed sale price
    pub sale_price: f64,
    /// Model prediction in dollars
    pub predicted_price: f64,
    /// Sale price minus prediction
    pub price_gap: f64,
    /// Deal verdict
    pub price_label: PriceLabel,
    /// Investor flip score
    pub flip_score: f64,
    /// Weighted quality and condition
    pub quality_index: f64,
    /// Lender risk score
    pub risk_score: f64,
    /// Years between construction and sale
    pub house_age: f64,
    /// Overall condition rating
    pub overall_cond: f64,
}

/// Rows of a feature set that went through every scorer, in its row order.
pub fn scored_properties(scored: &FeatureSet) -> Result<Vec<ScoredProperty>, ScoringError> {
    let data = scored.dataset();
    let ids = data.ids()?;
    let sale = dense(data, SALE_PRICE)?;
    let predicted = dense(data, PREDICTED_PRICE)?;
    let gap = dense(data, PRICE_GAP)?;
    let flip = dense(data, FLIP_SCORE)?;
    let quality = dense(data, QUALITY_INDEX)?;
    let risk = dense(data, RISK_SCORE)?;
    let age = dense(data, HOUSE_AGE)?;
    let condition = dense(data, OVERALL_COND)?;
    let labels = data.str_values(PRICE_LABEL)?;

    (0..ids.len())
        .map(|i| -> Result<ScoredProperty, ScoringError> {
            let label = labels[i]
                .as_deref()
                .ok_or_else(|| DegenerateInputError::new(format!("row {i} has no price label")))?
                .parse::<PriceLabel>()?;
            Ok(ScoredProperty {
                id: ids[i],
                sale_price: sale[i],
                predicted_price: predicted[i],
                price_gap: gap[i],
                price_label: label,
                flip_score: flip[i],
                quality_index: quality[i],
                risk_score: risk[i],
                house_age: age[i],
                overall_cond: condition[i],
            })
        })
        .collect()
}
