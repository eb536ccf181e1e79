//! End-to-end training run
//!
//! parameters → ingest/clean → encode → split → fit → evaluate →
//! artifacts → metrics. Every stage runs once, in order, and the first
//! error ends the run.

use crate::config::Params;
use crate::dataset::{category_counts, CleanedTable};
use crate::encode::encode_categoricals;
use crate::errors::Result;
use crate::forest::{ForestConfig, ForestTrainer};
use crate::metrics::RegressionMetrics;
use crate::split::{train_test_split, SplitIndices};
use pricing_core::ArtifactBundle;
use std::path::{Path, PathBuf};
use tracing::info;

/// Input and output locations of one run
#[derive(Clone, Debug)]
pub struct RunPaths {
    pub params: PathBuf,
    pub data: PathBuf,
    pub output_dir: PathBuf,
    pub metrics: PathBuf,
}

impl Default for RunPaths {
    fn default() -> Self {
        Self {
            params: PathBuf::from("params.yaml"),
            data: PathBuf::from("data/Entities.csv"),
            output_dir: PathBuf::from("models"),
            metrics: PathBuf::from("metrics.json"),
        }
    }
}

/// What a finished run produced
#[derive(Clone, Debug)]
pub struct RunReport {
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub split: SplitIndices,
    pub feature_names: Vec<String>,
    pub metrics: RegressionMetrics,
    pub model_hash: String,
    pub artifacts: Vec<PathBuf>,
}

/// Load parameters from `paths.params` and run the pipeline
pub fn run(paths: &RunPaths) -> Result<RunReport> {
    let params = Params::from_file(&paths.params)?;
    run_with_params(&params, paths)
}

pub fn run_with_params(params: &Params, paths: &RunPaths) -> Result<RunReport> {
    info!(
        "Target `{}`, features: {}",
        params.data.target,
        params.data.feature_columns().join(", ")
    );
    info!("Loading dataset from: {}", paths.data.display());
    let mut table = CleanedTable::from_csv(&paths.data, &params.data)?;
    info!(
        "Read {} rows, dropped {} incomplete, kept {}",
        table.rows_read,
        table.rows_dropped,
        table.len()
    );

    for (column, classes) in category_counts(&table) {
        info!("  {}: {} categories", column, classes);
    }
    let encoders = encode_categoricals(&mut table, &params.data.categorical)?;

    let rows_read = table.rows_read;
    let rows_dropped = table.rows_dropped;
    let dataset = table.into_dataset(&params.data.target)?;
    info!(
        "Dataset has {} samples with {} features",
        dataset.len(),
        dataset.feature_count()
    );
    dataset.log_feature_stats();

    let split = train_test_split(
        dataset.len(),
        params.train.test_size,
        params.train.random_state,
    )?;
    info!(
        "Split with seed {}: {} train / {} test",
        params.train.random_state,
        split.train.len(),
        split.test.len()
    );
    let train = dataset.subset(&split.train);
    let test = dataset.subset(&split.test);

    let config = ForestConfig::from_params(&params.model, params.train.random_state);
    info!("Training configuration:");
    info!("  Trees: {}", config.n_estimators);
    info!(
        "  Max depth: {}",
        config
            .max_depth
            .map_or_else(|| "unlimited".to_string(), |d| d.to_string())
    );
    info!("  Min samples split: {}", config.min_samples_split);
    info!("  Min samples leaf: {}", config.min_samples_leaf);
    info!("  Max features: {}", config.max_features);
    info!("  Bootstrap: {}", config.bootstrap);

    let model = ForestTrainer::new(config).train(&train)?;

    let predictions = model.predict_batch(&test.features)?;
    let metrics = RegressionMetrics::evaluate(&test.targets, &predictions)?;
    info!("MSE: {}", metrics.mse);
    info!("R²: {}", metrics.r2);

    let feature_names = dataset.feature_names.clone();
    let bundle = ArtifactBundle::new(model, feature_names.clone(), encoders)?;
    let model_hash = bundle.model.hash_hex()?;
    let artifacts = write_artifacts(&bundle, &paths.output_dir)?;

    metrics.write_json(&paths.metrics)?;
    info!("Metrics saved to {}", paths.metrics.display());

    Ok(RunReport {
        rows_read,
        rows_dropped,
        split,
        feature_names,
        metrics,
        model_hash,
        artifacts,
    })
}

/// Save the bundle and log the resulting directory listing
pub fn write_artifacts(bundle: &ArtifactBundle, dir: &Path) -> Result<Vec<PathBuf>> {
    let written = bundle.save(dir)?;
    info!("Saved model and artifacts to {}", dir.display());

    let mut listing: Vec<String> = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<_>>()?;
    listing.sort();

    info!("Files:");
    for name in listing {
        info!(" - {}", name);
    }

    Ok(written)
}
