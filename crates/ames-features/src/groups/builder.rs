//! Builder features: finished area and amenity score.

use super::{FeatureGroup, InputColumns, numeric};
use crate::error::FeatureError;
use crate::registry::Perspective;
use polars::prelude::*;

/// Computes `TotalSF` and `LuxuryScore`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuilderFeatures;

impl FeatureGroup for BuilderFeatures {
    fn perspective(&self) -> Perspective {
        Perspective::Builder
    }

    fn compute(&self, data: LazyFrame, _inputs: &InputColumns) -> Result<LazyFrame, FeatureError> {
        Ok(data.with_columns([
            (numeric("TotalBsmtSF") + numeric("1stFlrSF") + numeric("2ndFlrSF")).alias("TotalSF"),
            (numeric("FullBath") + lit(0.5) * numeric("HalfBath") + numeric("Fireplaces"))
                .alias("LuxuryScore"),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_builder_features() {
        let frame = df!(
            "TotalBsmtSF" => [856i64, 0],
            "1stFlrSF" => [856i64, 1200],
            "2ndFlrSF" => [854i64, 0],
            "FullBath" => [2i64, 1],
            "HalfBath" => [1i64, 0],
            "Fireplaces" => [0i64, 2],
        )
        .unwrap();

        let out = BuilderFeatures
            .compute(frame.lazy(), &InputColumns::default())
            .unwrap()
            .collect()
            .unwrap();

        let total = out.column("TotalSF").unwrap().f64().unwrap();
        assert_relative_eq!(total.get(0).unwrap(), 2566.0);
        assert_relative_eq!(total.get(1).unwrap(), 1200.0);

        let luxury = out.column("LuxuryScore").unwrap().f64().unwrap();
        assert_relative_eq!(luxury.get(0).unwrap(), 2.5);
        assert_relative_eq!(luxury.get(1).unwrap(), 3.0);
    }
}
