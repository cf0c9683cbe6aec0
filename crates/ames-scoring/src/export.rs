//! CSV and JSON export of scored rows and tables.

use serde::Serialize;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values, one record per row
    Csv,
    /// Compact JSON array
    Json,
    /// Pretty-printed JSON array
    PrettyJson,
}

impl ExportFormat {
    /// File extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Write `records` to `writer` in `format`.
pub fn export_records<T, W>(records: &[T], format: ExportFormat, mut writer: W) -> Result<(), ExportError>
where
    T: Serialize,
    W: Write,
{
    match format {
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(writer);
            for record in records {
                wtr.serialize(record)?;
            }
            wtr.flush()?;
        }
        ExportFormat::Json => {
            serde_json::to_writer(&mut writer, records)?;
            writer.flush()?;
        }
        ExportFormat::PrettyJson => {
            serde_json::to_writer_pretty(&mut writer, records)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// Render `records` as a string in `format`.
pub fn export_to_string<T: Serialize>(records: &[T], format: ExportFormat) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    export_records(records, format, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fair_price::PriceLabel;
    use crate::roi::QualityTierRoi;
    use crate::view::ScoredProperty;

    fn property() -> ScoredProperty {
        ScoredProperty {
            id: 1,
            sale_price: 200_000.0,
            predicted_price: 180_000.0,
            price_gap: 20_000.0,
            price_label: PriceLabel::Fair,
            flip_score: 15_000.0,
            quality_index: 6.2,
            risk_score: 18.0,
            house_age: 10.0,
            overall_cond: 5.0,
        }
    }

    #[test]
    fn test_csv_has_header_and_label() {
        let csv = export_to_string(&[property()], ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,sale_price,predicted_price,price_gap,price_label,flip_score,quality_index,risk_score,house_age,overall_cond"
        );
        assert!(lines.next().unwrap().contains(",Fair,"));
    }

    #[test]
    fn test_json_round_trips() {
        let json = export_to_string(&[property()], ExportFormat::Json).unwrap();
        let parsed: Vec<ScoredProperty> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![property()]);
    }

    #[test]
    fn test_missing_increase_exports_empty_field() {
        let tiers = [
            QualityTierRoi {
                overall_qual: 4.0,
                mean_price: 100_000.0,
                count: 2,
                price_increase: None,
            },
            QualityTierRoi {
                overall_qual: 5.0,
                mean_price: 130_000.0,
                count: 3,
                price_increase: Some(30_000.0),
            },
        ];
        let csv = export_to_string(&tiers, ExportFormat::Csv).unwrap();
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows[1], "4.0,100000.0,2,");
        assert_eq!(rows[2], "5.0,130000.0,3,30000.0");

        let json = export_to_string(&tiers, ExportFormat::Json).unwrap();
        assert!(json.contains("\"price_increase\":null"));
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }
}
