//! Random forest regression model
//!
//! A fitted forest is a list of regression trees over a fixed-width feature
//! vector. The prediction is the arithmetic mean of the tree outputs.

use super::tree::Tree;
use crate::errors::ModelError;
use crate::serde_canon::{hash_canonical_hex, to_canonical_json};
use serde::{Deserialize, Serialize};

/// Current artifact format version
pub const FORMAT_VERSION: i32 = 1;

/// Random forest regressor as persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForestModel {
    /// Model format version
    pub version: i32,

    /// Width of the feature vector the trees were fit on
    pub n_features: usize,

    /// Trees in the ensemble
    pub trees: Vec<Tree>,
}

impl ForestModel {
    pub fn new(n_features: usize, trees: Vec<Tree>) -> Self {
        Self {
            version: FORMAT_VERSION,
            n_features,
            trees,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.version != FORMAT_VERSION {
            return Err(ModelError::ValidationFailed(format!(
                "Unsupported model version: {}",
                self.version
            )));
        }

        if self.trees.is_empty() {
            return Err(ModelError::ValidationFailed(
                "Forest has no trees".to_string(),
            ));
        }

        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features).map_err(|e| {
                ModelError::ValidationFailed(format!("Tree {} validation failed: {}", i, e))
            })?;
        }

        Ok(())
    }

    /// Predict the target for one feature vector
    pub fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.n_features {
            return Err(ModelError::FeatureMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }
        if self.trees.is_empty() {
            return Err(ModelError::ValidationFailed(
                "Forest has no trees".to_string(),
            ));
        }

        let sum: f64 = self.trees.iter().map(|t| t.evaluate(features)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    /// Predict every row of a feature matrix
    pub fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        rows.iter().map(|row| self.predict(row)).collect()
    }

    pub fn to_canonical_json(&self) -> Result<String, ModelError> {
        Ok(to_canonical_json(self)?)
    }

    /// BLAKE3 digest of the canonical JSON, hex encoded
    pub fn hash_hex(&self) -> Result<String, ModelError> {
        Ok(hash_canonical_hex(self)?)
    }

    /// Parse a persisted model and check its structure
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: ForestModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::tree::Node;

    fn create_test_model() -> ForestModel {
        let tree1 = Tree::new(vec![
            Node::internal(0, 0, 50.0, 1, 2),
            Node::leaf(1, 100.0),
            Node::leaf(2, 200.0),
        ]);
        let tree2 = Tree::new(vec![
            Node::internal(0, 1, 30.0, 1, 2),
            Node::leaf(1, 50.0),
            Node::leaf(2, 150.0),
        ]);
        ForestModel::new(2, vec![tree1, tree2])
    }

    #[test]
    fn test_model_creation() {
        let model = create_test_model();
        assert_eq!(model.version, FORMAT_VERSION);
        assert_eq!(model.num_trees(), 2);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_predict_is_mean_of_trees() {
        let model = create_test_model();
        // tree1 -> 100, tree2 -> 50
        assert_eq!(model.predict(&[30.0, 20.0]).unwrap(), 75.0);
        // tree1 -> 200, tree2 -> 150
        assert_eq!(model.predict(&[60.0, 40.0]).unwrap(), 175.0);
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let model = create_test_model();
        let err = model.predict(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::FeatureMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_empty_forest_is_invalid() {
        let model = ForestModel::new(2, vec![]);
        assert!(model.validate().is_err());
        assert!(model.predict(&[0.0, 0.0]).is_err());
    }

    #[test]
    fn test_json_roundtrip_preserves_hash() {
        let original = create_test_model();
        let json = original.to_canonical_json().unwrap();
        let restored = ForestModel::from_json(&json).unwrap();

        assert_eq!(original, restored);
        assert_eq!(original.hash_hex().unwrap(), restored.hash_hex().unwrap());
    }

    #[test]
    fn test_json_roundtrip_is_bit_exact_for_awkward_floats() {
        // Values whose shortest decimal form is long enough to trip an
        // approximate float parser.
        let awkward: Vec<f64> = (1..200)
            .map(|i| (i as f64).sqrt() * std::f64::consts::PI / 7.0 + 1e-9 * i as f64)
            .collect();
        let trees = awkward
            .chunks(2)
            .map(|pair| {
                let threshold = pair[0];
                let leaf = pair.get(1).copied().unwrap_or(threshold) * 123_456.789;
                Tree::new(vec![
                    Node::internal(0, 0, threshold, 1, 2),
                    Node::leaf(1, leaf),
                    Node::leaf(2, -leaf / 3.0),
                ])
            })
            .collect();
        let original = ForestModel::new(1, trees);

        let restored = ForestModel::from_json(&original.to_canonical_json().unwrap()).unwrap();
        for (a, b) in original.trees.iter().zip(&restored.trees) {
            for (na, nb) in a.nodes.iter().zip(&b.nodes) {
                assert_eq!(na.threshold.to_bits(), nb.threshold.to_bits());
                assert_eq!(na.leaf.map(f64::to_bits), nb.leaf.map(f64::to_bits));
            }
        }
        assert_eq!(original, restored);
    }

    #[test]
    fn test_from_json_rejects_invalid_model() {
        let json = ForestModel::new(2, vec![]).to_canonical_json().unwrap();
        assert!(matches!(
            ForestModel::from_json(&json),
            Err(ModelError::ValidationFailed(_))
        ));
    }
}
