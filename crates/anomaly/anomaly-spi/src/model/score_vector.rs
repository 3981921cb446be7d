//! Per-detector score vectors.

use serde::{Deserialize, Serialize};

use super::DetectorKind;

/// One detector's scores, aligned with the dataset by record index.
///
/// Every present value lies in `[0, 1]`; `None` marks a record the
/// detector could not evaluate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    kind: DetectorKind,
    scores: Vec<Option<f64>>,
}

impl ScoreVector {
    /// Wrap raw scores, forcing present values into `[0, 1]`.
    ///
    /// NaN becomes 0; infinities saturate.
    pub fn new(kind: DetectorKind, scores: Vec<Option<f64>>) -> Self {
        Self {
            kind,
            scores: scores.into_iter().map(|s| s.map(unit)).collect(),
        }
    }

    /// A vector of zeros, used when a detector degrades.
    pub fn zeros(kind: DetectorKind, len: usize) -> Self {
        Self {
            kind,
            scores: vec![Some(0.0); len],
        }
    }

    /// A vector with every record absent.
    pub fn absent(kind: DetectorKind, len: usize) -> Self {
        Self {
            kind,
            scores: vec![None; len],
        }
    }

    pub fn kind(&self) -> DetectorKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Score of one record, `None` if absent or out of range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.scores.get(index).copied().flatten()
    }

    pub fn scores(&self) -> &[Option<f64>] {
        &self.scores
    }

    pub fn present_count(&self) -> usize {
        self.scores.iter().filter(|s| s.is_some()).count()
    }

    /// Highest present score, if any.
    pub fn max(&self) -> Option<f64> {
        self.scores.iter().flatten().copied().reduce(f64::max)
    }
}

fn unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}
