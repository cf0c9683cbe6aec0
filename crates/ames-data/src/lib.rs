#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ames/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dataset;
pub mod error;
pub mod schema;
pub mod source;
pub mod stats;

pub use dataset::{Dataset, ID_COLUMN};
pub use error::{DataError, DegenerateInputError, Result, SchemaError};
pub use schema::{ColumnRole, SCHEMA_VERSION, SchemaRegistry, ordinal_rank};
pub use source::{CsvSource, DatasetSource, InMemorySource};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
