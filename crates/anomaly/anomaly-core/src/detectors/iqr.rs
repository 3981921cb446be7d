//! IQR-based column scorer.

use anomaly_api::IQRConfig;
use anomaly_spi::{ColumnScore, ColumnScorer, DegradationReason, DetectorKind, FeatureColumn};

use crate::normalize::clip_unit;
use crate::stats;

/// Interquartile Range (IQR) based scorer.
///
/// Values inside `[Q1 - k*IQR, Q3 + k*IQR]` score 0; values outside score
/// their distance to the nearest fence divided by `k*IQR`, clipped to 1.
///
/// @algorithm IQR
/// @category StatisticalDetector
/// @complexity O(n log n)
#[derive(Debug, Clone)]
pub struct IQRDetector {
    multiplier: f64,
    min_samples: usize,
}

/// Quartiles and fences fitted on one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fences {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Fences {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// How far `x` lies outside the fences; 0 inside them.
    pub fn distance(&self, x: f64) -> f64 {
        if x < self.lower {
            self.lower - x
        } else if x > self.upper {
            x - self.upper
        } else {
            0.0
        }
    }
}

impl IQRDetector {
    /// Create a new IQR scorer.
    ///
    /// # Arguments
    ///
    /// * `multiplier` - IQR multiplier for outlier bounds (typically 1.5)
    pub fn new(multiplier: f64) -> Self {
        Self {
            multiplier,
            min_samples: 2,
        }
    }

    /// Create from configuration.
    pub fn from_config(config: &IQRConfig) -> Self {
        Self::new(config.multiplier)
    }

    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples.max(1);
        self
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Fit quartiles and fences on the given values.
    pub fn fences(&self, data: &[f64]) -> Option<Fences> {
        let sorted = stats::sorted(data);
        let q1 = stats::quantile_sorted(&sorted, 0.25)?;
        let q3 = stats::quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Fences {
            q1,
            q3,
            lower: q1 - self.multiplier * iqr,
            upper: q3 + self.multiplier * iqr,
        })
    }
}

impl Default for IQRDetector {
    fn default() -> Self {
        Self::from_config(&IQRConfig::default())
    }
}

impl ColumnScorer for IQRDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::RangeBased
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

        // Fit on values divided by the largest magnitude so the IQR stays finite.
        let magnitude = stats::magnitude(&present);
        let scaled: Vec<f64> = present.iter().map(|x| x / magnitude).collect();
        let Some(fences) = self.fences(&scaled) else {
            return ColumnScore::degraded(column, DegradationReason::AllMissing);
        };
        let spread = self.multiplier * fences.iqr();
        if spread <= 0.0 || !spread.is_finite() {
            return ColumnScore::degraded(column, DegradationReason::ZeroSpread);
        }

        ColumnScore::new(
            column
                .values()
                .iter()
                .map(|v| v.map(|x| clip_unit(fences.distance(x / magnitude) / spread)))
                .collect(),
        )
    }
}
