#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ames/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod columns;
pub mod error;
pub mod export;
pub mod fair_price;
pub mod flip;
pub mod neighborhood;
pub mod risk;
pub mod roi;
pub mod summary;
pub mod view;

pub use error::ScoringError;
pub use export::{ExportError, ExportFormat, export_records, export_to_string};
pub use fair_price::{FAIR_PRICE_BAND, PriceLabel, customer_fair_price};
pub use flip::investor_flip_score;
pub use neighborhood::{NeighborhoodStats, city_price_inequality};
pub use risk::banker_risk_score;
pub use roi::{QualityTierRoi, builder_feature_roi};
pub use summary::MarketSummary;
pub use view::{ScoredProperty, scored_properties};
