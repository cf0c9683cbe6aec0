//! The valuation chain.
//!
//! Stages run strictly in sequence, each on the complete output of the one
//! before it. Any stage error aborts the run.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use ames_data::{DatasetSource, SchemaRegistry};
use ames_features::{FeatureEngineer, FeatureSet, Preprocessor};
use ames_model::{ModelAccuracy, ModelTrainer, TrainedModel};
use ames_scoring::{
    QualityTierRoi, banker_risk_score, builder_feature_roi, customer_fair_price,
    investor_flip_score,
};
use std::time::Instant;
use tracing::info;

/// Everything a pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Name of the dataset the run consumed
    pub dataset: String,
    /// Rows in the raw dataset
    pub raw_rows: usize,
    /// Cleaned and feature-enriched records, before scoring
    pub features: FeatureSet,
    /// Final records with every score column, sorted by `RiskScore` descending
    pub scored: FeatureSet,
    /// Mean sale price per quality tier
    pub roi: Vec<QualityTierRoi>,
    /// Fitted model and held-out data
    pub trained: TrainedModel,
    /// Held-out accuracy of `trained`
    pub accuracy: ModelAccuracy,
}

/// Run the full chain once.
pub fn run_pipeline<S>(source: &S, config: &PipelineConfig) -> Result<PipelineOutput, PipelineError>
where
    S: DatasetSource + ?Sized,
{
    let start = Instant::now();

    let schema = SchemaRegistry::default();
    let raw = source.load()?;
    let clean = Preprocessor::new(schema.clone()).clean(&raw)?;
    let features = FeatureEngineer::default().engineer(&clean)?;

    let trained = ModelTrainer::new(config.trainer.clone())
        .with_schema(schema.clone())
        .fit(&features, &schema.target_column)?;
    let accuracy = trained.evaluate()?;

    let scored = customer_fair_price(&features, &trained.model)?;
    let scored = investor_flip_score(&scored)?;
    let scored = banker_risk_score(&scored)?;
    let roi = builder_feature_roi(&features)?;

    info!(
        dataset = source.name(),
        rows = scored.height(),
        mae = accuracy.mae,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "pipeline complete"
    );

    Ok(PipelineOutput {
        dataset: source.name().to_string(),
        raw_rows: raw.height(),
        features,
        scored,
        roi,
        trained,
        accuracy,
    })
}
