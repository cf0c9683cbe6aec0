//! Feature Registry
//!
//! Central registry of every derived column. Each entry declares the inputs it
//! needs and what happens when an optional input is absent, so feature groups
//! never probe the frame for columns on their own.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stakeholder perspective a feature serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Perspective {
    /// Density and zoning (lot utilization, utilities, zoning)
    UrbanPlanner,
    /// Size and finish (total area, luxury amenities)
    Builder,
    /// Collateral valuation (price per square foot)
    Banker,
    /// Renovation upside (quality, age, remodel history)
    Investor,
    /// Lifestyle (outdoor space, bathrooms)
    Customer,
}

impl Perspective {
    /// All perspectives in computation order.
    pub const fn all() -> [Self; 5] {
        [
            Self::UrbanPlanner,
            Self::Builder,
            Self::Banker,
            Self::Investor,
            Self::Customer,
        ]
    }

    /// Display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UrbanPlanner => "Urban Planner",
            Self::Builder => "Builder",
            Self::Banker => "Banker",
            Self::Investor => "Investor",
            Self::Customer => "Customer",
        }
    }
}

/// Expected type of an input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Integer or floating point
    Numeric,
    /// Text category
    Text,
}

/// A required input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Input {
    /// Column name
    pub column: &'static str,
    /// Expected type
    pub kind: InputKind,
}

impl Input {
    /// A numeric input.
    pub const fn numeric(column: &'static str) -> Self {
        Self {
            column,
            kind: InputKind::Numeric,
        }
    }

    /// A text input.
    pub const fn text(column: &'static str) -> Self {
        Self {
            column,
            kind: InputKind::Text,
        }
    }
}

/// What to use when an optional input is absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    /// Treat the input as this constant
    Default(f64),
    /// Read this other (possibly derived) column instead
    Column(&'static str),
    /// Skip the formula and set the whole feature to this constant
    Feature(f64),
}

/// An optional input column and its fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionalInput {
    /// Column name
    pub column: &'static str,
    /// Fallback when the column is absent
    pub fallback: Fallback,
}

impl OptionalInput {
    const fn new(column: &'static str, fallback: Fallback) -> Self {
        Self { column, fallback }
    }
}

/// Derived feature metadata
#[derive(Debug, Clone)]
pub struct FeatureInfo {
    /// Output column name (unique identifier)
    pub name: &'static str,
    /// Perspective the feature belongs to
    pub perspective: Perspective,
    /// What the feature measures
    pub description: &'static str,
    /// Inputs that must be present
    pub required: &'static [Input],
    /// Inputs that may be absent
    pub optional: &'static [OptionalInput],
}

impl FeatureInfo {
    /// Look up an optional input by column name.
    pub fn optional_input(&self, column: &str) -> Option<&'static OptionalInput> {
        self.optional.iter().find(|o| o.column == column)
    }
}

static FEATURES: [FeatureInfo; 12] = [
    // Urban planner
    FeatureInfo {
        name: "LotUtilization",
        perspective: Perspective::UrbanPlanner,
        description: "First-floor footprint over lot area",
        required: &[Input::numeric("1stFlrSF"), Input::numeric("LotArea")],
        optional: &[],
    },
    FeatureInfo {
        name: "IsFullyConnected",
        perspective: Perspective::UrbanPlanner,
        description: "1 when all public utilities are available",
        required: &[Input::text("Utilities")],
        optional: &[],
    },
    FeatureInfo {
        name: "IsResidentialZone",
        perspective: Perspective::UrbanPlanner,
        description: "1 when zoned RL, RM, RP or RH",
        required: &[Input::text("MSZoning")],
        optional: &[],
    },
    // Builder
    FeatureInfo {
        name: "TotalSF",
        perspective: Perspective::Builder,
        description: "Basement plus first and second floor area",
        required: &[
            Input::numeric("TotalBsmtSF"),
            Input::numeric("1stFlrSF"),
            Input::numeric("2ndFlrSF"),
        ],
        optional: &[],
    },
    FeatureInfo {
        name: "LuxuryScore",
        perspective: Perspective::Builder,
        description: "Full baths, half a point per half bath, plus fireplaces",
        required: &[
            Input::numeric("FullBath"),
            Input::numeric("HalfBath"),
            Input::numeric("Fireplaces"),
        ],
        optional: &[],
    },
    // Banker
    FeatureInfo {
        name: "PricePerSqFt",
        perspective: Perspective::Banker,
        description: "Sale price over living area",
        required: &[
            Input::numeric("TotalBsmtSF"),
            Input::numeric("1stFlrSF"),
            Input::numeric("2ndFlrSF"),
        ],
        optional: &[
            OptionalInput::new("SalePrice", Fallback::Feature(0.0)),
            OptionalInput::new("GrLivArea", Fallback::Column("TotalSF")),
        ],
    },
    // Investor
    FeatureInfo {
        name: "QualityIndex",
        perspective: Perspective::Investor,
        description: "Weighted quality (0.6) and condition (0.4)",
        required: &[Input::numeric("OverallQual"), Input::numeric("OverallCond")],
        optional: &[],
    },
    FeatureInfo {
        name: "HouseAge",
        perspective: Perspective::Investor,
        description: "Years between construction and sale",
        required: &[Input::numeric("YrSold"), Input::numeric("YearBuilt")],
        optional: &[],
    },
    FeatureInfo {
        name: "YearsSinceRemodel",
        perspective: Perspective::Investor,
        description: "Years between last remodel and sale",
        required: &[Input::numeric("YrSold"), Input::numeric("YearRemodAdd")],
        optional: &[],
    },
    FeatureInfo {
        name: "RemodelDelta",
        perspective: Perspective::Investor,
        description: "Years between construction and last remodel",
        required: &[Input::numeric("YearRemodAdd"), Input::numeric("YearBuilt")],
        optional: &[],
    },
    // Customer
    FeatureInfo {
        name: "OutdoorSpace",
        perspective: Perspective::Customer,
        description: "Deck plus open and enclosed porch area",
        required: &[
            Input::numeric("WoodDeckSF"),
            Input::numeric("OpenPorchSF"),
            Input::numeric("EnclosedPorch"),
        ],
        optional: &[],
    },
    FeatureInfo {
        name: "TotalBaths",
        perspective: Perspective::Customer,
        description: "Above-grade and basement baths, half baths counted as 0.5",
        required: &[Input::numeric("FullBath"), Input::numeric("HalfBath")],
        optional: &[
            OptionalInput::new("BsmtFullBath", Fallback::Default(0.0)),
            OptionalInput::new("BsmtHalfBath", Fallback::Default(0.0)),
        ],
    },
];

/// Get all available feature info
pub fn available_features() -> Vec<FeatureInfo> {
    FEATURES.to_vec()
}

/// Get features by perspective
pub fn features_by_perspective(perspective: Perspective) -> Vec<FeatureInfo> {
    FEATURES
        .iter()
        .filter(|f| f.perspective == perspective)
        .cloned()
        .collect()
}

/// Get feature info by name
pub fn get_feature_info(name: &str) -> Option<&'static FeatureInfo> {
    FEATURES.iter().find(|f| f.name == name)
}

/// List all derived feature names
pub fn feature_names() -> Vec<&'static str> {
    FEATURES.iter().map(|f| f.name).collect()
}

/// Count features by perspective
pub fn count_by_perspective() -> HashMap<Perspective, usize> {
    let mut counts = HashMap::new();
    for feature in &FEATURES {
        *counts.entry(feature.perspective).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_features_count() {
        assert_eq!(available_features().len(), 12);
    }

    #[test]
    fn test_names_are_unique() {
        let names = feature_names();
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
    }

    #[test]
    fn test_count_by_perspective() {
        let counts = count_by_perspective();
        assert_eq!(counts.get(&Perspective::UrbanPlanner), Some(&3));
        assert_eq!(counts.get(&Perspective::Builder), Some(&2));
        assert_eq!(counts.get(&Perspective::Banker), Some(&1));
        assert_eq!(counts.get(&Perspective::Investor), Some(&4));
        assert_eq!(counts.get(&Perspective::Customer), Some(&2));
    }

    #[test]
    fn test_get_feature_info() {
        let ppsf = get_feature_info("PricePerSqFt").unwrap();
        assert_eq!(ppsf.perspective, Perspective::Banker);
        assert_eq!(
            ppsf.optional_input("GrLivArea").unwrap().fallback,
            Fallback::Column("TotalSF")
        );
        assert!(get_feature_info("NotAFeature").is_none());
    }

    #[test]
    fn test_all_features_have_inputs() {
        for feature in available_features() {
            assert!(
                !feature.required.is_empty(),
                "Feature {} has no required inputs",
                feature.name
            );
        }
    }

    #[test]
    fn test_no_derived_name_reads_as_leakage_except_price_per_sqft() {
        let schema = ames_data::SchemaRegistry::default();
        let leaky: Vec<_> = feature_names()
            .into_iter()
            .filter(|name| schema.is_leakage_sensitive(name))
            .collect();
        assert_eq!(leaky, vec!["PricePerSqFt"]);
    }
}
