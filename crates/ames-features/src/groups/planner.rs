//! Urban planner features: lot density, utilities and zoning.

use super::{FeatureGroup, InputColumns, flag, nonzero, numeric};
use crate::error::FeatureError;
use crate::registry::Perspective;
use ames_data::schema::RESIDENTIAL_ZONES;
use polars::prelude::*;

/// Computes `LotUtilization`, `IsFullyConnected` and `IsResidentialZone`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlannerFeatures;

impl FeatureGroup for PlannerFeatures {
    fn perspective(&self) -> Perspective {
        Perspective::UrbanPlanner
    }

    fn compute(&self, data: LazyFrame, _inputs: &InputColumns) -> Result<LazyFrame, FeatureError> {
        let residential = RESIDENTIAL_ZONES
            .iter()
            .map(|zone| col("MSZoning").eq(lit(*zone)))
            .reduce(|any, zone| any.or(zone))
            .unwrap_or_else(|| lit(false));

        Ok(data.with_columns([
            (numeric("1stFlrSF") / nonzero(numeric("LotArea"))).alias("LotUtilization"),
            flag(col("Utilities").eq(lit("AllPub"))).alias("IsFullyConnected"),
            flag(residential).alias("IsResidentialZone"),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn compute(frame: DataFrame) -> DataFrame {
        PlannerFeatures
            .compute(frame.lazy(), &InputColumns::default())
            .unwrap()
            .collect()
            .unwrap()
    }

    #[test]
    fn test_zero_lot_area_uses_unit_denominator() {
        let out = compute(
            df!(
                "1stFlrSF" => [800i64, 1000],
                "LotArea" => [0i64, 4000],
                "Utilities" => ["AllPub", "NoSeWa"],
                "MSZoning" => ["RL", "C (all)"],
            )
            .unwrap(),
        );

        let util = out.column("LotUtilization").unwrap().f64().unwrap();
        assert_relative_eq!(util.get(0).unwrap(), 800.0);
        assert_relative_eq!(util.get(1).unwrap(), 0.25);
        assert!(util.into_iter().flatten().all(f64::is_finite));
    }

    #[test]
    fn test_flags() {
        let out = compute(
            df!(
                "1stFlrSF" => [1i64, 1, 1, 1],
                "LotArea" => [1i64, 1, 1, 1],
                "Utilities" => ["AllPub", "NoSeWa", "AllPub", "None"],
                "MSZoning" => ["RL", "FV", "RH", "C (all)"],
            )
            .unwrap(),
        );

        let connected: Vec<_> = out
            .column("IsFullyConnected")
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(connected, vec![Some(1), Some(0), Some(1), Some(0)]);

        let residential: Vec<_> = out
            .column("IsResidentialZone")
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(residential, vec![Some(1), Some(0), Some(1), Some(0)]);
    }
}
