use thiserror::Error;

use crate::serde_canon::CanonicalError;

/// Errors raised while building, validating, or loading model artifacts.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model validation failed: {0}")]
    ValidationFailed(String),

    #[error("Feature vector has {actual} values, model expects {expected}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("Cannot fit an encoder on zero values")]
    EmptyEncoder,

    #[error("Value `{0}` was not seen when the encoder was fit")]
    UnknownCategory(String),

    #[error("Code {code} is out of range for an encoder with {classes} classes")]
    UnknownCode { code: usize, classes: usize },

    #[error("Record is missing feature `{0}`")]
    MissingFeature(String),

    #[error("Feature `{feature}`: {reason}")]
    InvalidFeature { feature: String, reason: String },

    #[error("Model hash mismatch: expected {expected}, computed {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Canonical serialization error: {0}")]
    Canonical(#[from] CanonicalError),
}
