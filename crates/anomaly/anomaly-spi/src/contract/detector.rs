//! Detector trait definitions.

use crate::error::Result;
use crate::model::{
    Dataset, DegradationReason, DegradationWarning, DetectorCapability, DetectorKind,
    FeatureColumn, ScoreVector,
};

/// Output of one detector run.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// One entry per dataset record, in dataset order.
    pub scores: ScoreVector,
    /// Degradations hit while scoring.
    pub warnings: Vec<DegradationWarning>,
}

impl Detection {
    pub fn new(scores: ScoreVector) -> Self {
        Self {
            scores,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(scores: ScoreVector, warnings: Vec<DegradationWarning>) -> Self {
        Self { scores, warnings }
    }
}

/// Anomaly detector trait.
///
/// Implementations read the dataset, never reorder or mutate it, and
/// return exactly one score slot per record. A detector that cannot
/// execute returns zeros (or absent slots) plus a warning; only input
/// errors such as an unknown target feature are returned as `Err`.
pub trait Detector: Send + Sync {
    /// Which strategy this detector implements.
    fn kind(&self) -> DetectorKind;

    /// Score every record of the dataset.
    fn score(&self, dataset: &Dataset) -> Result<Detection>;

    /// What the detector needs from the dataset.
    fn capability(&self) -> DetectorCapability {
        self.kind().capability()
    }
}

/// Scores of one feature column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnScore {
    /// Normalized scores aligned with the column; `None` where the value is missing.
    pub scores: Vec<Option<f64>>,
    /// Set when the scorer fell back to zeros.
    pub degradation: Option<DegradationReason>,
}

impl ColumnScore {
    pub fn new(scores: Vec<Option<f64>>) -> Self {
        Self {
            scores,
            degradation: None,
        }
    }

    /// Zero for every present value, absent elsewhere.
    pub fn degraded(column: &FeatureColumn, reason: DegradationReason) -> Self {
        Self {
            scores: column.values().iter().map(|v| v.map(|_| 0.0)).collect(),
            degradation: Some(reason),
        }
    }
}

/// Per-feature scoring strategy.
pub trait ColumnScorer: Send + Sync {
    fn kind(&self) -> DetectorKind;

    /// Score the present values of one column.
    fn score_column(&self, column: &FeatureColumn) -> ColumnScore;
}
