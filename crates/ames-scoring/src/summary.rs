//! Market overview.

use crate::columns::{HOUSE_AGE, PRICE_LABEL, SALE_PRICE, dense};
use crate::error::ScoringError;
use crate::fair_price::PriceLabel;
use ames_data::{DegenerateInputError, stats};
use ames_features::FeatureSet;
use ames_model::ModelAccuracy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Headline market figures for a scored feature set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    /// Number of properties
    pub properties: usize,
    /// Median sale price
    pub median_price: f64,
    /// Mean years between construction and sale
    pub mean_house_age: f64,
    /// Properties labelled overpriced
    pub overpriced: usize,
    /// Properties labelled fair
    pub fair: usize,
    /// Properties labelled bargains
    pub bargains: usize,
    /// Held-out model accuracy, when known
    pub accuracy: Option<ModelAccuracy>,
}

impl MarketSummary {
    /// Summarise a feature set that went through fair-price scoring.
    pub fn from_scored(scored: &FeatureSet, accuracy: Option<ModelAccuracy>) -> Result<Self, ScoringError> {
        let data = scored.dataset();
        let prices = dense(data, SALE_PRICE)?;
        let ages = dense(data, HOUSE_AGE)?;

        let median_price = stats::median(prices.iter().copied())
            .ok_or_else(|| DegenerateInputError::new("no sale prices to summarise"))?;
        let mean_house_age = stats::mean(&ages)
            .ok_or_else(|| DegenerateInputError::new("no house ages to summarise"))?;

        let (mut overpriced, mut fair, mut bargains) = (0, 0, 0);
        for label in data.str_values(PRICE_LABEL)?.into_iter().flatten() {
            match label.parse::<PriceLabel>()? {
                PriceLabel::Overpriced => overpriced += 1,
                PriceLabel::Fair => fair += 1,
                PriceLabel::Bargain => bargains += 1,
            }
        }

        Ok(Self {
            properties: data.height(),
            median_price,
            mean_house_age,
            overpriced,
            fair,
            bargains,
            accuracy,
        })
    }

    /// Share of labelled properties carrying `label`, in percent.
    pub fn label_share(&self, label: PriceLabel) -> f64 {
        let total = self.overpriced + self.fair + self.bargains;
        if total == 0 {
            return 0.0;
        }
        let count = match label {
            PriceLabel::Overpriced => self.overpriced,
            PriceLabel::Fair => self.fair,
            PriceLabel::Bargain => self.bargains,
        };
        count as f64 / total as f64 * 100.0
    }

    /// Render as a fixed-width text table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str("\nAmes Housing Market Overview\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("  Properties:          {}\n", self.properties));
        output.push_str(&format!("  Median Sale Price:   ${:.0}\n", self.median_price));
        output.push_str(&format!("  Mean House Age:      {:.1} years\n", self.mean_house_age));

        output.push_str("\nFair-Price Labels:\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for (label, count) in self.label_counts() {
            output.push_str(&format!(
                "  {:<12} {:>8} ({:.1}%)\n",
                label.as_str(),
                count,
                self.label_share(label)
            ));
        }

        if let Some(accuracy) = &self.accuracy {
            output.push_str("\nModel Accuracy (held out):\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            output.push_str(&format!("  MAE:                 ${:.0}\n", accuracy.mae));
            output.push_str(&format!("  RMSE (log):          {:.4}\n", accuracy.rmse_log));
            output.push_str(&format!("  Test rows:           {}\n", accuracy.test_rows));
        }

        output
    }

    /// Render as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Ames Housing Market Overview\n\n");
        output.push_str(&format!("- **Properties:** {}\n", self.properties));
        output.push_str(&format!("- **Median Sale Price:** ${:.0}\n", self.median_price));
        output.push_str(&format!(
            "- **Mean House Age:** {:.1} years\n\n",
            self.mean_house_age
        ));

        output.push_str("## Fair-Price Labels\n\n");
        output.push_str("| Label | Count | Share |\n");
        output.push_str("|-------|-------|-------|\n");
        for (label, count) in self.label_counts() {
            output.push_str(&format!(
                "| {} | {} | {:.1}% |\n",
                label.as_str(),
                count,
                self.label_share(label)
            ));
        }

        if let Some(accuracy) = &self.accuracy {
            output.push_str("\n## Model Accuracy\n\n");
            output.push_str(&format!("- **MAE:** ${:.0}\n", accuracy.mae));
            output.push_str(&format!("- **RMSE (log):** {:.4}\n", accuracy.rmse_log));
        }

        output
    }

    fn label_counts(&self) -> [(PriceLabel, usize); 3] {
        [
            (PriceLabel::Overpriced, self.overpriced),
            (PriceLabel::Fair, self.fair),
            (PriceLabel::Bargain, self.bargains),
        ]
    }
}

impl fmt::Display for MarketSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} properties, median ${:.0}, {} overpriced / {} fair / {} bargains",
            self.properties, self.median_price, self.overpriced, self.fair, self.bargains
        )
    }
}
