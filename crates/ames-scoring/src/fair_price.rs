//! Customer fair-price scoring.
//!
//! Predicts each property's price from its features, compares it with the
//! observed sale price and labels the deal.

use crate::columns::{PREDICTED_PRICE, PRICE_GAP, PRICE_LABEL, PRICE_PER_SQFT, SALE_PRICE, dense};
use crate::error::ScoringError;
use ames_data::SchemaError;
use ames_features::FeatureSet;
use ames_model::PriceModel;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Dollar band around the prediction inside which a price counts as fair.
pub const FAIR_PRICE_BAND: f64 = 20_000.0;

/// Verdict on a sale price relative to the model's prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceLabel {
    /// Sold more than the band above the prediction
    Overpriced,
    /// Within the band
    Fair,
    /// Sold more than the band below the prediction
    Bargain,
}

impl PriceLabel {
    /// Label a gap (`sale - predicted`); both band edges count as fair.
    pub fn from_gap(gap: f64) -> Self {
        if gap > FAIR_PRICE_BAND {
            Self::Overpriced
        } else if gap < -FAIR_PRICE_BAND {
            Self::Bargain
        } else {
            Self::Fair
        }
    }

    /// Label text as stored in the `PriceLabel` column.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Overpriced => "Overpriced",
            Self::Fair => "Fair",
            Self::Bargain => "Bargain",
        }
    }

    /// All labels.
    pub const fn all() -> [Self; 3] {
        [Self::Overpriced, Self::Fair, Self::Bargain]
    }
}

impl fmt::Display for PriceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceLabel {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| SchemaError::WrongType {
                column: PRICE_LABEL.to_string(),
                expected: "Overpriced, Fair or Bargain",
                actual: s.to_string(),
            })
    }
}

/// Append `PredictedPrice`, `PriceGap` and `PriceLabel`.
///
/// The model sees the feature set without `SalePrice` and `PricePerSqFt`, so a
/// model that was fit on either fails with
/// [`ames_model::InferenceError::MissingFeature`].
pub fn customer_fair_price<M>(features: &FeatureSet, model: &M) -> Result<FeatureSet, ScoringError>
where
    M: PriceModel + ?Sized,
{
    let data = features.dataset();
    let sale = dense(data, SALE_PRICE)?;

    let inputs = data.select(
        data.column_names()
            .into_iter()
            .filter(|name| name != SALE_PRICE && name != PRICE_PER_SQFT),
    )?;
    let predicted = model.predict_price(inputs.frame())?;

    let gap: Vec<f64> = sale.iter().zip(&predicted).map(|(s, p)| s - p).collect();
    let labels: Vec<&str> = gap
        .iter()
        .map(|g| PriceLabel::from_gap(*g).as_str())
        .collect();

    info!(
        rows = gap.len(),
        overpriced = labels.iter().filter(|l| **l == "Overpriced").count(),
        bargains = labels.iter().filter(|l| **l == "Bargain").count(),
        "scored fair prices"
    );

    Ok(features.with_columns(vec![
        Column::new(PREDICTED_PRICE.into(), predicted.to_vec()),
        Column::new(PRICE_GAP.into(), gap),
        Column::new(PRICE_LABEL.into(), labels),
    ])?)
}
