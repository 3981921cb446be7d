//! Scoring report types.

use serde::{Deserialize, Serialize};

use super::{DegradationWarning, DetectorKind};

/// Summary statistics over the full combined-score vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub mean: f64,
    /// Sample standard deviation; 0 for fewer than two scores.
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

/// One detector's contribution to a flagged record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorScore {
    pub kind: DetectorKind,
    /// `None` when the detector did not evaluate this record.
    pub score: Option<f64>,
}

/// A record at or above the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecord {
    /// Position of the record in the input dataset.
    pub index: usize,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detector_scores: Option<Vec<DetectorScore>>,
}

/// Coarse classification of the anomaly rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyRateLevel {
    /// At most 5% of records flagged.
    Normal,
    /// More than 5% and at most 10%.
    Elevated,
    /// More than 10%.
    High,
}

impl AnomalyRateLevel {
    pub fn from_rate(rate: f64) -> Self {
        if rate > 0.10 {
            AnomalyRateLevel::High
        } else if rate > 0.05 {
            AnomalyRateLevel::Elevated
        } else {
            AnomalyRateLevel::Normal
        }
    }
}

/// Result of one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub total_records: usize,
    pub anomaly_count: usize,
    pub anomaly_rate: f64,
    pub rate_level: AnomalyRateLevel,
    /// Threshold the selection used.
    pub threshold: f64,
    /// Detectors that ran, in combination order.
    pub detectors: Vec<DetectorKind>,
    pub stats: ScoreStats,
    /// Flagged records, highest score first.
    pub anomalies: Vec<RankedRecord>,
    /// Combined score of every record, in input order.
    pub scores: Vec<f64>,
    /// Records no detector evaluated; their combined score is 0.
    pub insufficient_data: Vec<usize>,
    pub warnings: Vec<DegradationWarning>,
}

impl ScoreReport {
    /// Indices of flagged records, in rank order.
    pub fn anomaly_indices(&self) -> Vec<usize> {
        self.anomalies.iter().map(|r| r.index).collect()
    }

    /// Whether a record was flagged.
    pub fn is_anomaly(&self, index: usize) -> bool {
        self.anomalies.iter().any(|r| r.index == index)
    }

    /// Combined score of a record.
    pub fn score(&self, index: usize) -> Option<f64> {
        self.scores.get(index).copied()
    }

    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}
