//! Z-score column scorer.

use anomaly_api::ZScoreConfig;
use anomaly_spi::{ColumnScore, ColumnScorer, DegradationReason, DetectorKind, FeatureColumn};

use crate::normalize::threshold_clip;
use crate::stats;

/// Z-score based scorer.
///
/// Scores each present value by `min(|x - mean| / std / threshold, 1)`.
/// A constant column scores 0 everywhere.
///
/// @algorithm ZScore
/// @category StatisticalDetector
/// @complexity O(n)
#[derive(Debug, Clone)]
pub struct ZScoreDetector {
    threshold: f64,
    min_samples: usize,
}

impl ZScoreDetector {
    /// Create a new Z-Score scorer.
    ///
    /// # Arguments
    ///
    /// * `threshold` - Z-score that maps to a full score of 1.0
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            min_samples: 2,
        }
    }

    /// Create from configuration.
    pub fn from_config(config: &ZScoreConfig) -> Self {
        Self::new(config.threshold)
    }

    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples.max(2);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for ZScoreDetector {
    fn default() -> Self {
        Self::from_config(&ZScoreConfig::default())
    }
}

impl ColumnScorer for ZScoreDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::PointwiseStatistical
    }

    fn score_column(&self, column: &FeatureColumn) -> ColumnScore {
        let present = column.present_values();
        if present.is_empty() {
            return ColumnScore::degraded(column, DegradationReason::AllMissing);
        }
        if present.len() < self.min_samples {
            return ColumnScore::degraded(
                column,
                DegradationReason::InsufficientSamples {
                    required: self.min_samples,
                    got: present.len(),
                },
            );
        }
        if stats::is_constant(&present) {
            return ColumnScore::degraded(column, DegradationReason::ConstantFeature);
        }

        let moments = match stats::Moments::sample(&present) {
            Some(m) if m.has_spread() => m,
            _ => return ColumnScore::degraded(column, DegradationReason::ConstantFeature),
        };

        ColumnScore::new(
            column
                .values()
                .iter()
                .map(|v| v.map(|x| threshold_clip(moments.standardize(x), self.threshold)))
                .collect(),
        )
    }
}
