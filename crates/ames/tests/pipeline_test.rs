//! End-to-end runs over a synthetic Ames-style CSV.

use ames::data::{CsvSource, DataError, Dataset, DatasetSource, InMemorySource};
use ames::model::{ForestConfig, TrainerConfig};
use ames::scoring::{PriceLabel, scored_properties};
use ames::{PipelineCache, PipelineConfig, PipelineError, run_pipeline};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

const ROWS: usize = 60;

const HEADER: &str = "Id,MSZoning,LotFrontage,LotArea,Utilities,Neighborhood,OverallQual,\
OverallCond,YearBuilt,YearRemodAdd,ExterQual,BsmtQual,TotalBsmtSF,1stFlrSF,2ndFlrSF,GrLivArea,\
BsmtFullBath,BsmtHalfBath,FullBath,HalfBath,KitchenQual,Fireplaces,FireplaceQu,WoodDeckSF,\
OpenPorchSF,EnclosedPorch,PoolQC,YrSold,SalePrice";

fn quality_label(q: usize) -> &'static str {
    match q {
        8.. => "Ex",
        6..=7 => "Gd",
        4..=5 => "TA",
        _ => "Fa",
    }
}

fn synthetic_csv(rows: usize) -> String {
    let mut lines = vec![HEADER.to_string()];
    for i in 0..rows {
        let qual = 3 + i % 7;
        let cond = 3 + (i * 3) % 6;
        let built = 1920 + (i * 7) % 86;
        let remod = built.max(1950 + (i * 5) % 58);
        let sold = 2006 + i % 5;
        let first = 700 + (i * 37) % 900;
        let second = if i % 3 == 0 { 0 } else { 400 + (i * 11) % 300 };
        let bsmt = (i * 53) % 1200;
        let living = first + second;
        let fireplaces = i % 3;
        let price = 15_000 * qual + 55 * living + 20 * bsmt + 1_000 * (i % 4);
        let price = price - 300 * (sold - built);

        let frontage = if i % 6 == 0 {
            "NA".to_string()
        } else {
            (50 + i % 40).to_string()
        };
        let bsmt_qual = if bsmt == 0 { "NA" } else { quality_label(qual) };
        let fireplace_qu = if fireplaces == 0 { "NA" } else { "Gd" };
        let pool = if i == 7 { "Ex" } else { "NA" };

        lines.push(format!(
            "{id},{zone},{frontage},{lot},{util},{hood},{qual},{cond},{built},{remod},{exter},\
             {bsmt_qual},{bsmt},{first},{second},{living},{bfull},0,{full},{half},{kitchen},\
             {fireplaces},{fireplace_qu},{deck},{porch},{enclosed},{pool},{sold},{price}",
            id = i + 1,
            zone = ["RL", "RM", "RL", "FV", "RH"][i % 5],
            lot = 5_000 + (i * 131) % 7_000,
            util = if i % 17 == 0 { "NoSeWa" } else { "AllPub" },
            hood = ["NAmes", "CollgCr", "OldTown", "Edwards", "Somerst"][(i / 7) % 5],
            exter = quality_label(qual),
            bfull = i % 2,
            full = 1 + i % 3,
            half = i % 2,
            kitchen = ["TA", "Gd"][i % 2],
            deck = (i * 17) % 300,
            porch = (i * 13) % 120,
            enclosed = if i % 5 == 0 { 80 } else { 0 },
        ));
    }
    lines.join("\n") + "\n"
}

fn write_dataset(rows: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("train.csv"), synthetic_csv(rows)).unwrap();
    dir
}

fn quick_config(dir: &TempDir) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.dataset.data_dir = dir.path().to_path_buf();
    config.trainer = TrainerConfig {
        forest: ForestConfig {
            n_estimators: 10,
            max_depth: 6,
            ..ForestConfig::default()
        },
        ..TrainerConfig::default()
    };
    config
}

#[test]
fn test_full_run_from_csv() {
    let dir = write_dataset(ROWS);
    let config = quick_config(&dir);
    let output = run_pipeline(&config.dataset.source(), &config).unwrap();

    assert_eq!(output.dataset, "train.csv");
    assert_eq!(output.raw_rows, ROWS);

    // leakage guard
    assert!(!output.trained.feature_names.is_empty());
    assert!(output.trained.feature_names.iter().all(|n| !n.contains("Price")));
    // sparse pool column dropped, ordinal columns encoded and used
    assert!(!output.features.dataset().has_column("PoolQC"));
    assert!(output.trained.feature_names.contains(&"ExterQual".to_string()));
    assert_eq!(output.trained.x_test.nrows(), 12);

    // no rows lost, final order is riskiest first
    let scored = output.scored.dataset();
    assert_eq!(scored.height(), ROWS);
    let mut ids = scored.ids().unwrap();
    ids.sort_unstable();
    assert_eq!(ids, (1..=ROWS as i64).collect::<Vec<_>>());

    let rows = scored_properties(&output.scored).unwrap();
    assert!(rows.windows(2).all(|w| w[0].risk_score >= w[1].risk_score));
    for row in &rows {
        assert_eq!(row.price_label, PriceLabel::from_gap(row.price_gap));
        assert!((row.sale_price - row.predicted_price - row.price_gap).abs() < 1e-6);
        assert!(row.predicted_price.is_finite() && row.predicted_price > 0.0);
    }

    // ROI ascending by tier with an undefined first step
    let tiers: Vec<f64> = output.roi.iter().map(|t| t.overall_qual).collect();
    assert_eq!(tiers, (3..=9).map(f64::from).collect::<Vec<_>>());
    assert_eq!(output.roi[0].price_increase, None);
    assert!(output.roi[1..].iter().all(|t| t.price_increase.is_some()));

    assert!(output.accuracy.mae.is_finite());
    assert_eq!(output.accuracy.test_rows, 12);
}

#[test]
fn test_missing_file_aborts_run() {
    let dir = TempDir::new().unwrap();
    let config = quick_config(&dir);
    assert!(matches!(
        run_pipeline(&config.dataset.source(), &config),
        Err(PipelineError::Data(DataError::NotFound { .. }))
    ));
}

#[test]
fn test_too_few_rows_is_training_error() {
    let dir = write_dataset(4);
    let config = quick_config(&dir);
    assert!(matches!(
        run_pipeline(&config.dataset.source(), &config),
        Err(PipelineError::Training(_))
    ));
}

/// Counts loads and fails the first `failures` of them.
#[derive(Debug)]
struct CountingSource {
    inner: CsvSource,
    loads: AtomicUsize,
    failures: usize,
}

impl CountingSource {
    fn new(inner: CsvSource, failures: usize) -> Self {
        Self {
            inner,
            loads: AtomicUsize::new(0),
            failures,
        }
    }
}

impl DatasetSource for CountingSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn load(&self) -> ames::data::Result<Dataset> {
        let n = self.loads.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            return Err(DataError::NotFound {
                path: self.inner.path().to_path_buf(),
            });
        }
        self.inner.load()
    }
}

#[test]
fn test_concurrent_callers_share_one_run() {
    let dir = write_dataset(ROWS);
    let config = quick_config(&dir);
    let cache = PipelineCache::new(CountingSource::new(config.dataset.source(), 0), config);

    let outputs: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| cache.get_or_compute().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(cache.runs(), 1);
    assert!(outputs.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    let cached = cache.get().unwrap();
    assert!(Arc::ptr_eq(&cached, &outputs[0]));
    assert!(Arc::ptr_eq(&cache.get_or_compute().unwrap(), &cached));
}

#[test]
fn test_failed_run_is_not_cached() {
    let dir = write_dataset(ROWS);
    let config = quick_config(&dir);
    let cache = PipelineCache::new(CountingSource::new(config.dataset.source(), 1), config);

    assert!(cache.get_or_compute().is_err());
    assert!(cache.get().is_none());

    let output = cache.get_or_compute().unwrap();
    assert_eq!(output.scored.height(), ROWS);
    assert_eq!(cache.runs(), 2);
}

/// Sleeps, then always reports the dataset as missing.
#[derive(Debug)]
struct SlowFailingSource {
    path: PathBuf,
}

impl DatasetSource for SlowFailingSource {
    fn name(&self) -> &str {
        "slow-failing"
    }

    fn load(&self) -> ames::data::Result<Dataset> {
        std::thread::sleep(Duration::from_millis(50));
        Err(DataError::NotFound {
            path: self.path.clone(),
        })
    }
}

#[test]
fn test_waiters_share_a_failed_run() {
    let source = SlowFailingSource {
        path: PathBuf::from("missing/train.csv"),
    };
    let cache = PipelineCache::new(source, PipelineConfig::default());

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| cache.get_or_compute())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(cache.runs(), 1);
    assert_eq!(results.len(), 8);
    for result in &results {
        let err = result.as_ref().unwrap_err();
        assert!(matches!(
            err.as_ref(),
            PipelineError::Data(DataError::NotFound { .. })
        ));
    }
    assert!(cache.get().is_none());

    // a call after the failed attempt has finished starts a new run
    assert!(cache.get_or_compute().is_err());
    assert_eq!(cache.runs(), 2);
}

#[test]
fn test_in_memory_source_matches_csv() {
    let dir = write_dataset(ROWS);
    let config = quick_config(&dir);
    let csv = config.dataset.source();
    let memory = InMemorySource::new("memory", csv.load().unwrap());

    let from_csv = run_pipeline(&csv, &config).unwrap();
    let from_memory = run_pipeline(&memory, &config).unwrap();

    assert_eq!(from_memory.dataset, "memory");
    assert_eq!(from_csv.trained.feature_names, from_memory.trained.feature_names);
    assert_eq!(
        from_csv.scored.dataset().ids().unwrap(),
        from_memory.scored.dataset().ids().unwrap()
    );
}
