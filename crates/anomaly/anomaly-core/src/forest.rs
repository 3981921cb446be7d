//! Isolation forest model.
//!
//! Trees are grown on random subsamples by splitting a random feature at a
//! uniform point between its minimum and maximum. Anomalies isolate in
//! fewer splits, so their average path length is short and their
//! `score_samples` value is low.

use anomaly_api::IsolationConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::stats;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Average path length of an unsuccessful search in a binary search tree of `n` nodes.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone)]
struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    fn grow(data: &[Vec<f64>], rows: &mut [usize], height_limit: usize, rng: &mut StdRng) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow_node(data, rows, 0, height_limit, rng);
        tree
    }

    fn grow_node(
        &mut self,
        data: &[Vec<f64>],
        rows: &mut [usize],
        depth: usize,
        height_limit: usize,
        rng: &mut StdRng,
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { size: rows.len() });
        if depth >= height_limit || rows.len() <= 1 {
            return id;
        }

        let dims = data[rows[0]].len();
        let splittable: Vec<(usize, f64, f64)> = (0..dims)
            .filter_map(|feature| {
                let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                    (lo.min(data[r][feature]), hi.max(data[r][feature]))
                });
                (hi > lo).then_some((feature, lo, hi))
            })
            .collect();
        if splittable.is_empty() {
            return id;
        }

        let (feature, lo, hi) = splittable[rng.gen_range(0..splittable.len())];
        let threshold = rng.gen_range(lo..hi);

        // threshold is in [lo, hi), so both sides are non-empty.
        let mut mid = 0;
        for i in 0..rows.len() {
            if data[rows[i]][feature] <= threshold {
                rows.swap(i, mid);
                mid += 1;
            }
        }

        let (left_rows, right_rows) = rows.split_at_mut(mid);
        let left = self.grow_node(data, left_rows, depth + 1, height_limit, rng);
        let right = self.grow_node(data, right_rows, depth + 1, height_limit, rng);
        self.nodes[id] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        id
    }

    fn path_length(&self, x: &[f64]) -> f64 {
        let mut id = 0;
        let mut depth = 0.0;
        loop {
            match self.nodes[id] {
                Node::Leaf { size } => return depth + average_path_length(size),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if x[feature] <= threshold { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

/// Fitted isolation forest.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    sample_size: usize,
    offset: f64,
}

impl IsolationForest {
    /// Fit on row-major data. Returns `None` for empty input.
    ///
    /// Tree `t` draws from an RNG seeded with `seed + t`, so the model does
    /// not depend on how trees are scheduled across threads.
    pub fn fit(data: &[Vec<f64>], config: &IsolationConfig) -> Option<Self> {
        if data.is_empty() || data[0].is_empty() {
            return None;
        }
        let n = data.len();
        let sample_size = config.max_samples.clamp(1, n);
        let height_limit = (sample_size.max(2) as f64).log2().ceil() as usize;

        let trees: Vec<IsolationTree> = (0..config.n_estimators.max(1))
            .into_par_iter()
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(t as u64));
                let mut rows = rand::seq::index::sample(&mut rng, n, sample_size).into_vec();
                IsolationTree::grow(data, &mut rows, height_limit, &mut rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            sample_size,
            offset: 0.0,
        };
        let training = forest.score_samples(data);
        forest.offset = stats::quantile(&training, config.contamination).unwrap_or(0.0);
        Some(forest)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Contamination percentile of the training scores.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Mean path length of one row across all trees.
    pub fn path_length(&self, x: &[f64]) -> f64 {
        self.trees.iter().map(|t| t.path_length(x)).sum::<f64>() / self.trees.len() as f64
    }

    /// `-2^(-E[h(x)] / c(sample_size))`: lower means more isolated.
    pub fn score_samples(&self, data: &[Vec<f64>]) -> Vec<f64> {
        let norm = average_path_length(self.sample_size);
        let norm = if norm > 0.0 { norm } else { 1.0 };
        data.par_iter()
            .map(|x| -(2f64).powf(-self.path_length(x) / norm))
            .collect()
    }

    /// `score_samples - offset`: negative values are predicted outliers.
    pub fn decision_function(&self, data: &[Vec<f64>]) -> Vec<f64> {
        self.score_samples(data)
            .into_iter()
            .map(|s| s - self.offset)
            .collect()
    }

    pub fn predicted_outliers(&self, data: &[Vec<f64>]) -> Vec<bool> {
        self.decision_function(data)
            .into_iter()
            .map(|d| d < 0.0)
            .collect()
    }
}
