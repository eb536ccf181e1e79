use pricing_core::ModelError;
use thiserror::Error;

/// Errors returned by the training pipeline.
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("input is missing expected column `{0}`")]
    MissingColumn(String),

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("split error: {0}")]
    Split(String),

    #[error("training error: {0}")]
    Training(String),

    #[error("evaluation error: {0}")]
    Evaluation(String),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrainerError>;
