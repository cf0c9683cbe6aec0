//! Customer features: outdoor living space and bathroom count.

use super::{FeatureGroup, InputColumns, numeric};
use crate::error::FeatureError;
use crate::registry::Perspective;
use polars::prelude::*;

/// Computes `OutdoorSpace` and `TotalBaths`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerFeatures;

impl FeatureGroup for CustomerFeatures {
    fn perspective(&self) -> Perspective {
        Perspective::Customer
    }

    fn compute(&self, data: LazyFrame, inputs: &InputColumns) -> Result<LazyFrame, FeatureError> {
        let bsmt_full = inputs.resolve_expr("TotalBaths", "BsmtFullBath")?;
        let bsmt_half = inputs.resolve_expr("TotalBaths", "BsmtHalfBath")?;

        Ok(data.with_columns([
            (numeric("WoodDeckSF") + numeric("OpenPorchSF") + numeric("EnclosedPorch"))
                .alias("OutdoorSpace"),
            (numeric("FullBath")
                + lit(0.5) * numeric("HalfBath")
                + bsmt_full
                + lit(0.5) * bsmt_half)
                .alias("TotalBaths"),
        ]))
    }
}
