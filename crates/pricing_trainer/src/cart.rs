//! CART regression tree builder
//!
//! Exact-greedy splits on squared error. Candidate thresholds are the
//! midpoints between consecutive distinct values of a feature within the
//! node. Feature order at each node is drawn from the tree's RNG, and the
//! first candidate with the best gain wins, so a fixed seed always yields
//! the same tree.

use crate::deterministic::LcgRng;
use pricing_core::forest::{Node, Tree};

/// Growth limits for a single tree
#[derive(Clone, Debug)]
pub struct TreeConfig {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features examined per split, at least 1
    pub max_features: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: usize::MAX,
        }
    }
}

#[derive(Debug, Clone)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

/// Build a regression tree over borrowed training rows
pub struct CartBuilder<'a> {
    config: TreeConfig,
    features: &'a [Vec<f64>],
    targets: &'a [f64],
    feature_count: usize,
}

impl<'a> CartBuilder<'a> {
    pub fn new(features: &'a [Vec<f64>], targets: &'a [f64], config: TreeConfig) -> Self {
        assert_eq!(features.len(), targets.len());

        let feature_count = features.first().map(|row| row.len()).unwrap_or(0);

        Self {
            config,
            features,
            targets,
            feature_count,
        }
    }

    /// Grow a tree on the given rows (duplicates allowed, as in a bootstrap sample)
    pub fn build(&self, indices: &[usize], rng: &mut LcgRng) -> Tree {
        let mut nodes = Vec::new();
        let mut scratch = Vec::with_capacity(indices.len());
        self.build_node(indices, 0, &mut nodes, &mut scratch, rng);
        Tree::new(nodes)
    }

    fn build_node(
        &self,
        indices: &[usize],
        depth: usize,
        nodes: &mut Vec<Node>,
        scratch: &mut Vec<(f64, f64)>,
        rng: &mut LcgRng,
    ) -> i32 {
        let current_idx = nodes.len() as i32;
        let leaf_value = self.mean_target(indices);

        let depth_reached = self.config.max_depth.is_some_and(|max| depth >= max);
        if depth_reached
            || indices.len() < self.config.min_samples_split
            || indices.len() < self.config.min_samples_leaf.saturating_mul(2)
            || self.is_pure(indices)
        {
            nodes.push(Node::leaf(current_idx, leaf_value));
            return current_idx;
        }

        let Some(split) = self.find_best_split(indices, scratch, rng) else {
            nodes.push(Node::leaf(current_idx, leaf_value));
            return current_idx;
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| self.features[i][split.feature_idx] <= split.threshold);

        // Reserve the slot; children are filled in below.
        nodes.push(Node::internal(
            current_idx,
            split.feature_idx as i32,
            split.threshold,
            -1,
            -1,
        ));

        let left = self.build_node(&left_indices, depth + 1, nodes, scratch, rng);
        let right = self.build_node(&right_indices, depth + 1, nodes, scratch, rng);

        nodes[current_idx as usize].left = left;
        nodes[current_idx as usize].right = right;

        current_idx
    }

    fn find_best_split(
        &self,
        indices: &[usize],
        scratch: &mut Vec<(f64, f64)>,
        rng: &mut LcgRng,
    ) -> Option<SplitCandidate> {
        let mut order: Vec<usize> = (0..self.feature_count).collect();
        rng.shuffle(&mut order);
        order.truncate(self.config.max_features.max(1));

        let n = indices.len();
        let min_leaf = self.config.min_samples_leaf;
        let (total_sum, _) = self.target_sums(indices);
        let parent_score = total_sum * total_sum / n as f64;

        let mut best: Option<SplitCandidate> = None;

        for feature_idx in order {
            scratch.clear();
            scratch.extend(
                indices
                    .iter()
                    .map(|&i| (self.features[i][feature_idx], self.targets[i])),
            );
            scratch.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            for pos in 0..n - 1 {
                left_sum += scratch[pos].1;
                let left_n = pos + 1;
                let right_n = n - left_n;

                if scratch[pos].0 == scratch[pos + 1].0 {
                    continue;
                }
                if left_n < min_leaf || right_n < min_leaf {
                    continue;
                }

                // Maximizing sum_l²/n_l + sum_r²/n_r minimizes the children's squared error.
                let right_sum = total_sum - left_sum;
                let gain = left_sum * left_sum / left_n as f64
                    + right_sum * right_sum / right_n as f64
                    - parent_score;

                if best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(SplitCandidate {
                        feature_idx,
                        threshold: midpoint(scratch[pos].0, scratch[pos + 1].0),
                        gain,
                    });
                }
            }
        }

        best.filter(|b| b.gain > 0.0)
    }

    fn target_sums(&self, indices: &[usize]) -> (f64, usize) {
        let sum = indices.iter().map(|&i| self.targets[i]).sum();
        (sum, indices.len())
    }

    fn mean_target(&self, indices: &[usize]) -> f64 {
        let (sum, n) = self.target_sums(indices);
        if n == 0 {
            return 0.0;
        }
        sum / n as f64
    }

    fn is_pure(&self, indices: &[usize]) -> bool {
        let Some(&head) = indices.first() else {
            return true;
        };
        let first = self.targets[head];
        indices.iter().all(|&i| self.targets[i] == first)
    }
}

/// Midpoint of two distinct sorted values that still separates them
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo / 2.0 + hi / 2.0;
    if mid >= hi || mid < lo {
        lo
    } else {
        mid
    }
}
