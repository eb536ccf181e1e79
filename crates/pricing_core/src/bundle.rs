//! Artifact bundle written by a training run
//!
//! A bundle is the set of files a serving component needs to turn a raw
//! property record into a price: the fitted forest, the ordered feature
//! names, the categorical encoders and the sanitized feature identifiers.

use crate::encoding::LabelEncoder;
use crate::errors::ModelError;
use crate::features::feature_field_map;
use crate::forest::ForestModel;
use crate::serde_canon::{digest_hex, to_canonical_json};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const MODEL_FILE: &str = "house_price_model.json";
pub const MODEL_HASH_FILE: &str = "house_price_model.hash";
pub const FEATURES_FILE: &str = "model_features.json";
pub const ENCODERS_FILE: &str = "label_encoders.json";
pub const FIELD_MAP_FILE: &str = "feature_field_map.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactBundle {
    pub model: ForestModel,
    /// Feature names in the column order the model was fit on
    pub features: Vec<String>,
    pub encoders: BTreeMap<String, LabelEncoder>,
    pub field_map: BTreeMap<String, String>,
}

impl ArtifactBundle {
    pub fn new(
        model: ForestModel,
        features: Vec<String>,
        encoders: BTreeMap<String, LabelEncoder>,
    ) -> Result<Self, ModelError> {
        let field_map = feature_field_map(&features);
        let bundle = Self {
            model,
            features,
            encoders,
            field_map,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    /// Check that the pieces of the bundle agree with each other
    pub fn validate(&self) -> Result<(), ModelError> {
        self.model.validate()?;

        if self.features.len() != self.model.n_features {
            return Err(ModelError::FeatureMismatch {
                expected: self.model.n_features,
                actual: self.features.len(),
            });
        }

        for column in self.encoders.keys() {
            if !self.features.contains(column) {
                return Err(ModelError::ValidationFailed(format!(
                    "encoder for `{column}` does not match any model feature"
                )));
            }
        }

        for feature in &self.features {
            if !self.field_map.contains_key(feature) {
                return Err(ModelError::ValidationFailed(format!(
                    "feature `{feature}` has no field identifier"
                )));
            }
        }

        Ok(())
    }

    /// Write all artifacts into `dir`, creating it if needed.
    ///
    /// Existing files are overwritten. Returns the written paths.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>, ModelError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let model_json = self.model.to_canonical_json()?;
        let hash_hex = digest_hex(&model_json);

        let outputs = [
            (MODEL_FILE, model_json),
            (MODEL_HASH_FILE, hash_hex),
            (FEATURES_FILE, to_canonical_json(&self.features)?),
            (ENCODERS_FILE, to_canonical_json(&self.encoders)?),
            (FIELD_MAP_FILE, to_canonical_json(&self.field_map)?),
        ];

        let mut written = Vec::with_capacity(outputs.len());
        for (name, contents) in outputs {
            let path = dir.join(name);
            debug!("Writing {}", path.display());
            fs::write(&path, contents)?;
            written.push(path);
        }

        Ok(written)
    }

    /// Load a bundle from `dir`.
    ///
    /// When a hash file is present the model digest must match it.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, ModelError> {
        let dir = dir.as_ref();

        let model_json = fs::read_to_string(dir.join(MODEL_FILE))?;

        let hash_path = dir.join(MODEL_HASH_FILE);
        if hash_path.exists() {
            let expected = fs::read_to_string(&hash_path)?.trim().to_string();
            let actual = digest_hex(&model_json);
            if expected != actual {
                return Err(ModelError::HashMismatch { expected, actual });
            }
        } else {
            warn!("No model hash found at {}", hash_path.display());
        }

        let bundle = Self {
            model: ForestModel::from_json(&model_json)?,
            features: read_json(&dir.join(FEATURES_FILE))?,
            encoders: read_json(&dir.join(ENCODERS_FILE))?,
            field_map: read_json(&dir.join(FIELD_MAP_FILE))?,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    /// Build a feature vector from a raw record keyed by column name.
    ///
    /// Categorical features go through their encoder, all others must parse
    /// as finite numbers. Extra keys in the record are ignored.
    pub fn encode_record(&self, record: &HashMap<String, String>) -> Result<Vec<f64>, ModelError> {
        self.features
            .iter()
            .map(|feature| {
                let raw = record
                    .get(feature)
                    .ok_or_else(|| ModelError::MissingFeature(feature.clone()))?;

                match self.encoders.get(feature) {
                    Some(encoder) => encoder
                        .transform(raw)
                        .map(|code| code as f64)
                        .map_err(|e| ModelError::InvalidFeature {
                            feature: feature.clone(),
                            reason: e.to_string(),
                        }),
                    None => parse_finite(raw.trim()).ok_or_else(|| ModelError::InvalidFeature {
                        feature: feature.clone(),
                        reason: format!("`{raw}` is not a finite number"),
                    }),
                }
            })
            .collect()
    }

    /// Encode a raw record and predict its price
    pub fn predict_record(&self, record: &HashMap<String, String>) -> Result<f64, ModelError> {
        let features = self.encode_record(record)?;
        self.model.predict(&features)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}
