//! Feature groups - one per stakeholder perspective
//!
//! Each group turns cleaned columns into the derived metrics its perspective
//! relies on. Groups run in [`Perspective::all`] order as separate
//! `with_columns` passes, so later groups may read columns produced by
//! earlier ones (the banker's price per square foot falls back to the
//! builder's `TotalSF`).

pub mod banker;
pub mod builder;
pub mod customer;
pub mod investor;
pub mod planner;

pub use banker::BankerFeatures;
pub use builder::BuilderFeatures;
pub use customer::CustomerFeatures;
pub use investor::InvestorFeatures;
pub use planner::PlannerFeatures;

use crate::error::FeatureError;
use crate::registry::{Fallback, FeatureInfo, Perspective, get_feature_info};
use ames_data::Dataset;
use polars::prelude::*;
use std::collections::HashSet;
use std::fmt;

/// A set of derived features computed together.
pub trait FeatureGroup: fmt::Debug + Send + Sync {
    /// Perspective served by this group.
    fn perspective(&self) -> Perspective;

    /// Append this group's columns to the lazy frame.
    fn compute(&self, data: LazyFrame, inputs: &InputColumns) -> Result<LazyFrame, FeatureError>;
}

/// Columns available to feature groups, with optional-input resolution.
#[derive(Debug, Clone, Default)]
pub struct InputColumns {
    present: HashSet<String>,
}

/// How an optional input resolved.
#[derive(Debug, Clone)]
pub enum Resolved {
    /// Use this expression in the formula
    Expr(Expr),
    /// Replace the whole feature with this constant
    Constant(f64),
}

impl InputColumns {
    /// Columns of a dataset.
    pub fn from_dataset(data: &Dataset) -> Self {
        Self {
            present: data.column_names().into_iter().collect(),
        }
    }

    /// Columns from an explicit list of names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            present: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a column is present.
    pub fn contains(&self, column: &str) -> bool {
        self.present.contains(column)
    }

    /// Resolve an optional input of `feature` declared in the registry.
    pub fn resolve(&self, feature: &str, column: &str) -> Result<Resolved, FeatureError> {
        let info = feature_info(feature)?;
        let optional = info
            .optional_input(column)
            .ok_or_else(|| FeatureError::UnknownFeature(format!("{feature}.{column}")))?;

        if self.contains(column) {
            return Ok(Resolved::Expr(numeric(column)));
        }

        Ok(match optional.fallback {
            Fallback::Default(value) => Resolved::Expr(lit(value)),
            Fallback::Column(other) => Resolved::Expr(numeric(other)),
            Fallback::Feature(value) => Resolved::Constant(value),
        })
    }

    /// Resolve an optional input that must yield an expression.
    pub fn resolve_expr(&self, feature: &str, column: &str) -> Result<Expr, FeatureError> {
        match self.resolve(feature, column)? {
            Resolved::Expr(expr) => Ok(expr),
            Resolved::Constant(value) => Ok(lit(value)),
        }
    }
}

/// Look up a registry entry.
pub(crate) fn feature_info(name: &str) -> Result<&'static FeatureInfo, FeatureError> {
    get_feature_info(name).ok_or_else(|| FeatureError::UnknownFeature(name.to_string()))
}

/// A column read as `f64`.
pub(crate) fn numeric(column: &str) -> Expr {
    col(column).cast(DataType::Float64)
}

/// Substitute 1 for a zero denominator.
pub(crate) fn nonzero(expr: Expr) -> Expr {
    when(expr.clone().eq(lit(0.0)))
        .then(lit(1.0))
        .otherwise(expr)
}

/// 1/0 indicator from a boolean expression.
pub(crate) fn flag(condition: Expr) -> Expr {
    when(condition).then(lit(1i32)).otherwise(lit(0i32))
}

/// The groups in computation order.
pub fn default_groups() -> Vec<Box<dyn FeatureGroup>> {
    vec![
        Box::new(PlannerFeatures),
        Box::new(BuilderFeatures),
        Box::new(BankerFeatures),
        Box::new(InvestorFeatures),
        Box::new(CustomerFeatures),
    ]
}
