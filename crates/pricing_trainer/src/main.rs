//! Property price trainer CLI
//!
//! Runs the full training pipeline once and writes the model artifacts and
//! holdout metrics.

use anyhow::{Context, Result};
use clap::Parser;
use pricing_trainer::{run, RunPaths, VERSION};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "price-train")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deterministic random forest trainer for property prices", long_about = None)]
struct Args {
    /// Parameter file (train.test_size, train.random_state, model.n_estimators)
    #[arg(long, default_value = "params.yaml")]
    params: PathBuf,

    /// Input CSV with a header row
    #[arg(short, long, default_value = "data/Entities.csv")]
    data: PathBuf,

    /// Output directory for the model and its artifacts
    #[arg(short, long, default_value = "models")]
    output: PathBuf,

    /// Metrics file for run tracking
    #[arg(long, default_value = "metrics.json")]
    metrics: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Property price trainer v{}", VERSION);
    info!("═══════════════════════════════════════════");

    let paths = RunPaths {
        params: args.params,
        data: args.data,
        output_dir: args.output,
        metrics: args.metrics,
    };

    let report = run(&paths).context("Training run failed")?;

    info!("═══════════════════════════════════════════");
    info!("✓ Training completed successfully");
    info!("  Model hash: {}", report.model_hash);
    info!(
        "  Holdout: {} rows, MSE {}, R² {}",
        report.split.test.len(),
        report.metrics.mse,
        report.metrics.r2
    );

    Ok(())
}
