//! Run parameters loaded from `params.yaml`
//!
//! `train.test_size`, `train.random_state` and `model.n_estimators` are
//! required and have no fallback. Everything else is optional and defaults
//! to a standard random forest over the property listing columns.

use crate::errors::{Result, TrainerError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Top-level parameter file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    pub train: TrainParams,
    pub model: ModelParams,
    #[serde(default)]
    pub data: DataParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainParams {
    /// Fraction of rows held out for evaluation, strictly between 0 and 1
    pub test_size: f64,
    /// Seed for the split and for every tree
    pub random_state: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub n_estimators: usize,
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
    #[serde(default = "default_min_samples_leaf")]
    pub min_samples_leaf: usize,
    /// Fraction of features considered at each split
    #[serde(default = "default_max_features")]
    pub max_features: f64,
    #[serde(default = "default_bootstrap")]
    pub bootstrap: bool,
}

/// Which input columns are retained and how they are interpreted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DataSection")]
pub struct DataParams {
    /// Retained columns, in feature order (the target is removed from it)
    pub columns: Vec<String>,
    pub target: String,
    pub categorical: Vec<String>,
}

/// `data:` as written in the file
///
/// Without an explicit `categorical` list, the default categoricals that are
/// retained (and are not the target) stay categorical.
#[derive(Deserialize)]
struct DataSection {
    #[serde(default = "default_columns")]
    columns: Vec<String>,
    #[serde(default = "default_target")]
    target: String,
    #[serde(default)]
    categorical: Option<Vec<String>>,
}

impl From<DataSection> for DataParams {
    fn from(section: DataSection) -> Self {
        let categorical = section.categorical.unwrap_or_else(|| {
            default_categorical()
                .into_iter()
                .filter(|c| *c != section.target && section.columns.contains(c))
                .collect()
        });
        Self {
            columns: section.columns,
            target: section.target,
            categorical,
        }
    }
}

fn default_min_samples_split() -> usize {
    2
}

fn default_min_samples_leaf() -> usize {
    1
}

fn default_max_features() -> f64 {
    1.0
}

fn default_bootstrap() -> bool {
    true
}

fn default_columns() -> Vec<String> {
    [
        "property_type",
        "price",
        "city",
        "province_name",
        "latitude",
        "longitude",
        "baths",
        "purpose",
        "bedrooms",
        "Area Size",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_target() -> String {
    "price".to_string()
}

fn default_categorical() -> Vec<String> {
    ["property_type", "city", "province_name", "purpose"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for DataParams {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            target: default_target(),
            categorical: default_categorical(),
        }
    }
}

impl DataParams {
    pub fn is_categorical(&self, column: &str) -> bool {
        self.categorical.iter().any(|c| c == column)
    }

    /// Retained columns minus the target, in order
    pub fn feature_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| **c != self.target)
            .cloned()
            .collect()
    }
}

impl Params {
    /// Load and validate parameters from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading parameters from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            TrainerError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let params: Params = serde_yaml::from_str(yaml)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        let test_size = self.train.test_size;
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(TrainerError::Config(format!(
                "train.test_size must be between 0 and 1, got {test_size}"
            )));
        }

        let model = &self.model;
        if model.n_estimators == 0 {
            return Err(TrainerError::Config(
                "model.n_estimators must be at least 1".to_string(),
            ));
        }
        if model.max_depth == Some(0) {
            return Err(TrainerError::Config(
                "model.max_depth must be at least 1 when set".to_string(),
            ));
        }
        if model.min_samples_split < 2 {
            return Err(TrainerError::Config(
                "model.min_samples_split must be at least 2".to_string(),
            ));
        }
        if model.min_samples_leaf == 0 {
            return Err(TrainerError::Config(
                "model.min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if !(model.max_features > 0.0 && model.max_features <= 1.0) {
            return Err(TrainerError::Config(format!(
                "model.max_features must be in (0, 1], got {}",
                model.max_features
            )));
        }

        let data = &self.data;
        let mut seen = HashSet::new();
        for column in &data.columns {
            if !seen.insert(column.as_str()) {
                return Err(TrainerError::Config(format!(
                    "data.columns lists `{column}` more than once"
                )));
            }
        }
        if !seen.contains(data.target.as_str()) {
            return Err(TrainerError::Config(format!(
                "target `{}` is not one of data.columns",
                data.target
            )));
        }
        if data.columns.len() < 2 {
            return Err(TrainerError::Config(
                "data.columns needs the target and at least one feature".to_string(),
            ));
        }
        for column in &data.categorical {
            if !seen.contains(column.as_str()) {
                return Err(TrainerError::Config(format!(
                    "categorical column `{column}` is not one of data.columns"
                )));
            }
            if *column == data.target {
                return Err(TrainerError::Config(format!(
                    "target `{column}` cannot be categorical"
                )));
            }
        }

        Ok(())
    }
}
