//! Investor features: quality and age of the structure.

use super::{FeatureGroup, InputColumns, numeric};
use crate::error::FeatureError;
use crate::registry::Perspective;
use polars::prelude::*;

/// Weight of `OverallQual` in the quality index.
pub const QUALITY_WEIGHT: f64 = 0.6;

/// Weight of `OverallCond` in the quality index.
pub const CONDITION_WEIGHT: f64 = 0.4;

/// Computes `QualityIndex`, `HouseAge`, `YearsSinceRemodel` and `RemodelDelta`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvestorFeatures;

impl FeatureGroup for InvestorFeatures {
    fn perspective(&self) -> Perspective {
        Perspective::Investor
    }

    fn compute(&self, data: LazyFrame, _inputs: &InputColumns) -> Result<LazyFrame, FeatureError> {
        Ok(data.with_columns([
            (lit(QUALITY_WEIGHT) * numeric("OverallQual")
                + lit(CONDITION_WEIGHT) * numeric("OverallCond"))
            .alias("QualityIndex"),
            (numeric("YrSold") - numeric("YearBuilt")).alias("HouseAge"),
            (numeric("YrSold") - numeric("YearRemodAdd")).alias("YearsSinceRemodel"),
            (numeric("YearRemodAdd") - numeric("YearBuilt")).alias("RemodelDelta"),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_investor_features() {
        let frame = df!(
            "OverallQual" => [7i64],
            "OverallCond" => [5i64],
            "YearBuilt" => [2000i64],
            "YearRemodAdd" => [2004i64],
            "YrSold" => [2010i64],
        )
        .unwrap();

        let out = InvestorFeatures
            .compute(frame.lazy(), &InputColumns::default())
            .unwrap()
            .collect()
            .unwrap();

        let get = |name: &str| out.column(name).unwrap().f64().unwrap().get(0).unwrap();
        assert_relative_eq!(get("QualityIndex"), 6.2, epsilon = 1e-12);
        assert_relative_eq!(get("HouseAge"), 10.0);
        assert_relative_eq!(get("YearsSinceRemodel"), 6.0);
        assert_relative_eq!(get("RemodelDelta"), 4.0);
    }
}
