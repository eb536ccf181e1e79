//! Pricing Trainer - deterministic offline random forest trainer
//!
//! Trains a property price regressor from a listing CSV and writes the
//! artifacts a serving component loads with [`pricing_core::ArtifactBundle`].

pub mod cart;
pub mod config;
pub mod dataset;
pub mod deterministic;
pub mod encode;
pub mod errors;
pub mod forest;
pub mod metrics;
pub mod pipeline;
pub mod split;

pub use config::{DataParams, ModelParams, Params, TrainParams};
pub use dataset::{CleanedTable, Dataset};
pub use deterministic::LcgRng;
pub use errors::TrainerError;
pub use forest::{ForestConfig, ForestTrainer};
pub use metrics::RegressionMetrics;
pub use pipeline::{run, run_with_params, RunPaths, RunReport};
pub use split::{train_test_split, SplitIndices};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
