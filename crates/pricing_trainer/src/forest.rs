//! Random forest trainer
//!
//! Each tree is grown on a bootstrap sample of the training rows with its
//! own RNG stream. Tree seeds are drawn from a master generator seeded with
//! `random_state`, so the whole ensemble is reproducible.

use crate::cart::{CartBuilder, TreeConfig};
use crate::config::ModelParams;
use crate::dataset::Dataset;
use crate::deterministic::LcgRng;
use crate::errors::{Result, TrainerError};
use pricing_core::ForestModel;
use tracing::{debug, info};

/// Random forest training configuration
#[derive(Clone, Debug)]
pub struct ForestConfig {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Fraction of features considered at each split
    pub max_features: f64,
    pub bootstrap: bool,
    pub random_state: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: 1.0,
            bootstrap: true,
            random_state: 0,
        }
    }
}

impl ForestConfig {
    pub fn from_params(model: &ModelParams, random_state: u64) -> Self {
        Self {
            n_estimators: model.n_estimators,
            max_depth: model.max_depth,
            min_samples_split: model.min_samples_split,
            min_samples_leaf: model.min_samples_leaf,
            max_features: model.max_features,
            bootstrap: model.bootstrap,
            random_state,
        }
    }

    /// Number of features examined per split for `n_features` columns
    pub fn features_per_split(&self, n_features: usize) -> usize {
        ((self.max_features * n_features as f64).ceil() as usize).clamp(1, n_features.max(1))
    }
}

pub struct ForestTrainer {
    config: ForestConfig,
}

impl ForestTrainer {
    pub fn new(config: ForestConfig) -> Self {
        Self { config }
    }

    /// Fit a forest on the given dataset
    pub fn train(&self, dataset: &Dataset) -> Result<ForestModel> {
        let n_samples = dataset.len();
        let feature_count = dataset.feature_count();

        if n_samples == 0 {
            return Err(TrainerError::Training(
                "cannot fit on an empty dataset".to_string(),
            ));
        }
        if self.config.n_estimators == 0 {
            return Err(TrainerError::Training(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if let Some(row) = dataset.features.iter().position(|r| r.len() != feature_count) {
            return Err(TrainerError::Training(format!(
                "row {} has {} features, expected {}",
                row,
                dataset.features[row].len(),
                feature_count
            )));
        }

        let tree_config = TreeConfig {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            min_samples_leaf: self.config.min_samples_leaf,
            max_features: self.config.features_per_split(feature_count),
        };
        let builder = CartBuilder::new(&dataset.features, &dataset.targets, tree_config);

        info!(
            "Fitting {} trees on {} rows x {} features",
            self.config.n_estimators, n_samples, feature_count
        );

        let mut master = LcgRng::new(self.config.random_state);
        let mut trees = Vec::with_capacity(self.config.n_estimators);

        for tree_idx in 0..self.config.n_estimators {
            let mut rng = LcgRng::new(master.next_u64());

            let indices: Vec<usize> = if self.config.bootstrap {
                (0..n_samples).map(|_| rng.next_below(n_samples)).collect()
            } else {
                (0..n_samples).collect()
            };

            let tree = builder.build(&indices, &mut rng);
            debug!(
                "Tree {}/{}: {} nodes, depth {}",
                tree_idx + 1,
                self.config.n_estimators,
                tree.nodes.len(),
                tree.depth()
            );
            trees.push(tree);
        }

        let model = ForestModel::new(feature_count, trees);
        model.validate()?;
        Ok(model)
    }
}
