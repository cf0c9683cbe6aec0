//! Banker features: price per square foot of living area.
//!
//! Uses `GrLivArea` when present and the builder's `TotalSF` otherwise. When
//! the dataset carries no `SalePrice` (inference-only rows) the feature is a
//! constant 0.

use super::{FeatureGroup, InputColumns, Resolved, nonzero};
use crate::error::FeatureError;
use crate::registry::Perspective;
use polars::prelude::*;

const NAME: &str = "PricePerSqFt";

/// Computes `PricePerSqFt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BankerFeatures;

impl FeatureGroup for BankerFeatures {
    fn perspective(&self) -> Perspective {
        Perspective::Banker
    }

    fn compute(&self, data: LazyFrame, inputs: &InputColumns) -> Result<LazyFrame, FeatureError> {
        let price_per_sqft = match inputs.resolve(NAME, "SalePrice")? {
            Resolved::Constant(value) => lit(value),
            Resolved::Expr(price) => {
                let area = inputs.resolve_expr(NAME, "GrLivArea")?;
                price / nonzero(area)
            }
        };

        Ok(data.with_columns([price_per_sqft.alias(NAME)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    fn inputs(frame: &DataFrame) -> InputColumns {
        let names: HashSet<String> = frame
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        InputColumns::from_names(names)
    }

    #[test]
    fn test_uses_living_area() {
        let frame = df!(
            "SalePrice" => [200_000i64, 100_000],
            "GrLivArea" => [2000i64, 0],
            "TotalSF" => [3000.0, 500.0],
        )
        .unwrap();

        let out = BankerFeatures
            .compute(frame.clone().lazy(), &inputs(&frame))
            .unwrap()
            .collect()
            .unwrap();

        let ppsf = out.column(NAME).unwrap().f64().unwrap();
        assert_relative_eq!(ppsf.get(0).unwrap(), 100.0);
        // zero living area falls back to a unit denominator
        assert_relative_eq!(ppsf.get(1).unwrap(), 100_000.0);
    }

    #[test]
    fn test_falls_back_to_total_sf() {
        let frame = df!(
            "SalePrice" => [150_000i64],
            "TotalSF" => [1500.0],
        )
        .unwrap();

        let out = BankerFeatures
            .compute(frame.clone().lazy(), &inputs(&frame))
            .unwrap()
            .collect()
            .unwrap();

        assert_relative_eq!(out.column(NAME).unwrap().f64().unwrap().get(0).unwrap(), 100.0);
    }

    #[test]
    fn test_unlabeled_rows_are_zero() {
        let frame = df!("GrLivArea" => [1000i64, 2000]).unwrap();

        let out = BankerFeatures
            .compute(frame.clone().lazy(), &inputs(&frame))
            .unwrap()
            .collect()
            .unwrap();

        let ppsf: Vec<_> = out
            .column(NAME)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(ppsf, vec![Some(0.0), Some(0.0)]);
    }
}
