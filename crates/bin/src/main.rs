//! Ames CLI binary.
//!
//! Runs the valuation pipeline once per invocation and prints the view of one
//! stakeholder perspective.

mod telemetry;

use ames::data::CsvSource;
use ames::features::{Perspective, available_features, features_by_perspective};
use ames::scoring::{
    ExportFormat, MarketSummary, PriceLabel, ScoredProperty, city_price_inequality,
    export_records, scored_properties,
};
use ames::{CacheResult, PipelineCache, PipelineConfig, PipelineOutput};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Parser)]
#[command(name = "ames")]
#[command(about = "Ames: multi-perspective property valuation", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the dataset
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Dataset file name inside the data directory
    #[arg(long, global = true)]
    dataset: Option<String>,

    /// Log level or filter directive
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Market summary, label counts and model accuracy
    Overview {
        /// Render as Markdown
        #[arg(long)]
        markdown: bool,
    },

    /// Fair-price verdicts, largest bargains first
    Customer {
        /// Only show this label (overpriced, fair, bargain)
        #[arg(long, value_parser = parse_label)]
        label: Option<PriceLabel>,

        /// Rows to show
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Mean sale price per quality tier
    Builder,

    /// Best flip candidates
    Investor {
        /// Rows to show
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Riskiest collateral first
    Banker {
        /// Rows to show
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Sale-price spread across neighborhoods
    City,

    /// Held-out accuracy of the price model
    Accuracy,

    /// List derived features
    Features {
        /// Filter by perspective
        #[arg(long)]
        perspective: Option<String>,
    },

    /// Export every scored property
    Export {
        /// Output format (csv, json or pretty-json)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let level = cli
        .log_level
        .clone()
        .or_else(|| std::env::var(telemetry::ENV_LOG_LEVEL).ok())
        .unwrap_or_else(|| telemetry::DEFAULT_LOG_LEVEL.to_string());
    telemetry::init(&level)?;

    if let Commands::Features { perspective } = &cli.command {
        return list_features(perspective.as_deref());
    }

    let config = resolve_config(&cli)?;
    debug!(
        dataset = %config.dataset.path().display(),
        trees = config.trainer.forest.n_estimators,
        "resolved configuration"
    );
    let cache = PipelineCache::new(config.dataset.source(), config);
    let output = compute_with_spinner(&cache)?;

    match cli.command {
        Commands::Overview { markdown } => print_overview(&output, markdown)?,
        Commands::Customer { label, top } => print_customer(&output, label, top)?,
        Commands::Builder => print_builder(&output),
        Commands::Investor { top } => print_investor(&output, top)?,
        Commands::Banker { top } => print_banker(&output, top)?,
        Commands::City => print_city(&output)?,
        Commands::Accuracy => print_accuracy(&output),
        Commands::Export { format, output: path } => {
            export_scored(&output, parse_format(&format)?, path)?;
        }
        Commands::Features { .. } => {}
    }

    Ok(())
}

/// Defaults, then the config file, then environment, then flags.
fn resolve_config(cli: &Cli) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let base = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    let mut config = base.with_env_overrides(|key| std::env::var(key).ok());

    if let Some(dir) = &cli.data_dir {
        config.dataset.data_dir = dir.clone();
    }
    if let Some(name) = &cli.dataset {
        config.dataset.file_name = name.clone();
    }
    Ok(config)
}

fn compute_with_spinner(
    cache: &PipelineCache<CsvSource>,
) -> Result<Arc<PipelineOutput>, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!(
        "Running valuation pipeline on {}...",
        cache.config().dataset.path().display()
    ));

    let result: CacheResult = cache.get_or_compute();
    match &result {
        Ok(output) => pb.finish_with_message(format!(
            "Scored {} properties with {} features",
            output.scored.height(),
            output.trained.feature_names.len()
        )),
        Err(_) => pb.finish_with_message("Failed!"),
    }
    Ok(result?)
}

fn print_header(title: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{:^62}║", title);
    println!("╚══════════════════════════════════════════════════════════════╝\n");
}

fn print_overview(output: &PipelineOutput, markdown: bool) -> Result<(), Box<dyn std::error::Error>> {
    let summary = MarketSummary::from_scored(&output.scored, Some(output.accuracy))?;
    if markdown {
        println!("{}", summary.to_markdown());
    } else {
        print_header(&format!("MARKET OVERVIEW: {}", output.dataset));
        println!("{}", summary.to_ascii_table());
    }
    Ok(())
}

fn print_customer(
    output: &PipelineOutput,
    label: Option<PriceLabel>,
    top: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rows: Vec<ScoredProperty> = scored_properties(&output.scored)?
        .into_iter()
        .filter(|row| label.is_none_or(|l| row.price_label == l))
        .collect();
    rows.sort_by(|a, b| a.price_gap.total_cmp(&b.price_gap));

    print_header("CUSTOMER: FAIR PRICE");
    println!(
        "{:>6}  {:>12}  {:>12}  {:>12}  {:<10}",
        "Id", "Sale", "Predicted", "Gap", "Label"
    );
    println!("{}", "-".repeat(60));
    for row in rows.iter().take(top) {
        println!(
            "{:>6}  {:>12.0}  {:>12.0}  {:>12.0}  {:<10}",
            row.id, row.sale_price, row.predicted_price, row.price_gap, row.price_label.as_str()
        );
    }
    println!("\n{} of {} properties shown", rows.len().min(top), rows.len());
    Ok(())
}

fn print_builder(output: &PipelineOutput) {
    print_header("BUILDER: QUALITY TIER ROI");
    println!(
        "{:>7}  {:>7}  {:>14}  {:>14}",
        "Quality", "Count", "Mean Price", "Increase"
    );
    println!("{}", "-".repeat(60));
    for tier in &output.roi {
        let increase = tier
            .price_increase
            .map_or_else(|| "-".to_string(), |v| format!("{:.0}", v));
        println!(
            "{:>7}  {:>7}  {:>14.0}  {:>14}",
            tier.overall_qual, tier.count, tier.mean_price, increase
        );
    }
}

fn print_investor(output: &PipelineOutput, top: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mut rows = scored_properties(&output.scored)?;
    rows.sort_by(|a, b| b.flip_score.total_cmp(&a.flip_score));

    print_header("INVESTOR: FLIP CANDIDATES");
    println!(
        "{:>6}  {:>12}  {:>8}  {:>12}  {:>12}",
        "Id", "Flip Score", "Quality", "Predicted", "Sale"
    );
    println!("{}", "-".repeat(60));
    for row in rows.iter().take(top) {
        println!(
            "{:>6}  {:>12.0}  {:>8.2}  {:>12.0}  {:>12.0}",
            row.id, row.flip_score, row.quality_index, row.predicted_price, row.sale_price
        );
    }
    Ok(())
}

fn print_banker(output: &PipelineOutput, top: usize) -> Result<(), Box<dyn std::error::Error>> {
    let rows = scored_properties(&output.scored)?;

    print_header("BANKER: COLLATERAL RISK");
    println!(
        "{:>6}  {:>10}  {:>6}  {:>9}  {:>12}",
        "Id", "Risk", "Age", "Condition", "Gap"
    );
    println!("{}", "-".repeat(60));
    for row in rows.iter().take(top) {
        println!(
            "{:>6}  {:>10.2}  {:>6.0}  {:>9.0}  {:>12.0}",
            row.id, row.risk_score, row.house_age, row.overall_cond, row.price_gap
        );
    }
    Ok(())
}

fn print_city(output: &PipelineOutput) -> Result<(), Box<dyn std::error::Error>> {
    let table = city_price_inequality(&output.features)?;

    print_header("CITY PLANNER: NEIGHBORHOOD PRICES");
    println!(
        "{:<10}  {:>6}  {:>12}  {:>12}  {:>12}",
        "Area", "Count", "Mean", "Median", "Std Dev"
    );
    println!("{}", "-".repeat(60));
    for stats in &table {
        let std = stats
            .std_price
            .map_or_else(|| "-".to_string(), |v| format!("{:.0}", v));
        println!(
            "{:<10}  {:>6}  {:>12.0}  {:>12.0}  {:>12}",
            stats.neighborhood, stats.count, stats.mean_price, stats.median_price, std
        );
    }
    Ok(())
}

fn print_accuracy(output: &PipelineOutput) {
    let forest = &output.trained.config.forest;

    print_header("MODEL ACCURACY");
    println!("  Mean Absolute Error:  ${:.0}", output.accuracy.mae);
    println!("  RMSE (log scale):     {:.4}", output.accuracy.rmse_log);
    println!("  Held-out rows:        {}", output.accuracy.test_rows);
    println!("  Features used:        {}", output.trained.feature_names.len());
    println!(
        "  Forest:               {} trees, max depth {}",
        forest.n_estimators, forest.max_depth
    );
}

fn list_features(perspective: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let features = match perspective {
        Some(name) => features_by_perspective(parse_perspective(name)?),
        None => available_features(),
    };

    println!("Derived Features");
    println!("================\n");
    for feature in features {
        println!(
            "  {:20} {:15} {}",
            feature.name,
            feature.perspective.name(),
            feature.description
        );
    }
    Ok(())
}

fn export_scored(
    output: &PipelineOutput,
    format: ExportFormat,
    path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let rows = scored_properties(&output.scored)?;
    match path {
        Some(path) => {
            let file = std::fs::File::create(&path)?;
            export_records(&rows, format, BufWriter::new(file))?;
            eprintln!("Wrote {} rows to {}", rows.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            export_records(&rows, format, &mut handle)?;
            writeln!(handle)?;
        }
    }
    Ok(())
}

fn parse_format(name: &str) -> Result<ExportFormat, Box<dyn std::error::Error>> {
    match name.to_lowercase().as_str() {
        "csv" => Ok(ExportFormat::Csv),
        "json" => Ok(ExportFormat::Json),
        "pretty-json" | "pretty" => Ok(ExportFormat::PrettyJson),
        _ => Err(format!("Unknown export format: {}", name).into()),
    }
}

fn parse_label(name: &str) -> Result<PriceLabel, String> {
    PriceLabel::all()
        .into_iter()
        .find(|label| label.as_str().eq_ignore_ascii_case(name))
        .ok_or_else(|| format!("Unknown price label: {}", name))
}

fn parse_perspective(name: &str) -> Result<Perspective, Box<dyn std::error::Error>> {
    let wanted = name.to_lowercase().replace(['-', '_', ' '], "");
    Perspective::all()
        .into_iter()
        .find(|p| p.name().to_lowercase().replace(' ', "") == wanted)
        .ok_or_else(|| format!("Unknown perspective: {}", name).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("csv", ExportFormat::Csv)]
    #[case("JSON", ExportFormat::Json)]
    #[case("pretty-json", ExportFormat::PrettyJson)]
    fn test_parse_format(#[case] name: &str, #[case] expected: ExportFormat) {
        assert_eq!(parse_format(name).unwrap(), expected);
    }

    #[test]
    fn test_parse_format_unknown() {
        assert!(parse_format("xml").is_err());
    }

    #[rstest]
    #[case("banker", Perspective::Banker)]
    #[case("urban-planner", Perspective::UrbanPlanner)]
    #[case("Urban Planner", Perspective::UrbanPlanner)]
    fn test_parse_perspective(#[case] name: &str, #[case] expected: Perspective) {
        assert_eq!(parse_perspective(name).unwrap(), expected);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "ames",
            "--data-dir",
            "/srv/ames",
            "--dataset",
            "houses.csv",
            "overview",
        ]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.dataset.path(), PathBuf::from("/srv/ames/houses.csv"));
    }

    #[test]
    fn test_customer_label_parses() {
        let cli = Cli::parse_from(["ames", "customer", "--label", "bargain", "--top", "3"]);
        assert!(matches!(
            cli.command,
            Commands::Customer {
                label: Some(PriceLabel::Bargain),
                top: 3
            }
        ));
    }
}
