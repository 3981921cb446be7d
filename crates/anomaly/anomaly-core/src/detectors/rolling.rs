//! Centered rolling-window column scorer.

use anomaly_api::RollingConfig;
use anomaly_spi::{ColumnScore, ColumnScorer, DegradationReason, DetectorKind, FeatureColumn};

use crate::normalize::threshold_clip;
use crate::stats;

/// Substitute for a zero rolling standard deviation.
pub const STD_EPSILON: f64 = 1e-6;

/// Rolling-residual scorer for chronologically ordered values.
///
/// Each value is compared with the mean and sample standard deviation of a
/// centered window around it. Windows shrink at the edges of the series
/// down to a single value instead of leaving edge records unscored.
/// Missing values are skipped, so the window slides over present values.
///
/// @algorithm RollingZScore
/// @category TemporalDetector
/// @complexity O(n * window)
#[derive(Debug, Clone)]
pub struct RollingDetector {
    window: usize,
    threshold: f64,
    min_samples: usize,
}

impl RollingDetector {
    /// Create a new rolling scorer.
    ///
    /// # Arguments
    ///
    /// * `window` - Centered window size
    /// * `threshold` - Standardized residual that maps to a full score of 1.0
    pub fn new(window: usize, threshold: f64) -> Self {
        Self {
            window: window.max(1),
            threshold,
            min_samples: 2,
        }
    }

    /// Create from configuration.
    pub fn from_config(config: &RollingConfig) -> Self {
        Self::new(config.window, config.threshold)
    }

    /// Fewest present values to score; never below two.
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples.max(2);
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Inclusive-exclusive bounds of the window centered on `i` in a series of length `n`.
    ///
    /// Covers `[i - w/2, i + ceil(w/2) - 1]`, clipped to the series.
    pub fn bounds(&self, i: usize, n: usize) -> (usize, usize) {
        let before = self.window / 2;
        let after = self.window - before;
        (i.saturating_sub(before), (i + after).min(n))
    }

    /// Normalized scores of a gap-free series.
    pub fn score_series(&self, series: &[f64]) -> Vec<f64> {
        let n = series.len();
        (0..n)
            .map(|i| {
                let (start, end) = self.bounds(i, n);
                let window = &series[start..end];
                if stats::is_constant(window) {
                    return 0.0;
                }
                match stats::Moments::sample(window) {
                    Some(m) if m.has_spread() => {
                        threshold_clip(m.standardize(series[i]), self.threshold)
                    }
                    Some(m) => threshold_clip((series[i] - m.mean()) / STD_EPSILON, self.threshold),
                    None => 0.0,
                }
            })
            .collect()
    }
}

impl Default for RollingDetector {
    fn default() -> Self {
        Self::from_config(&RollingConfig::default())
    }
}

impl ColumnScorer for RollingDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::TemporalRolling
    }

    fn score_column(&self, column: &FeatureColumn) -> ColumnScore {
        let present = column.present();
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

        let series: Vec<f64> = present.iter().map(|&(_, x)| x).collect();
        if stats::is_constant(&series) {
            return ColumnScore::degraded(column, DegradationReason::ConstantFeature);
        }

        let mut scores = vec![None; column.len()];
        for (&(index, _), score) in present.iter().zip(self.score_series(&series)) {
            scores[index] = Some(score);
        }
        ColumnScore::new(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spike_series() -> Vec<f64> {
        let mut data: Vec<f64> = (0..30).map(|i| 100.0 + f64::from(i % 3) - 1.0).collect();
        data[15] = 1000.0;
        data
    }

    #[test]
    fn test_bounds_are_centered() {
        let detector = RollingDetector::new(20, 3.0);
        assert_eq!(detector.bounds(15, 30), (5, 25));
        assert_eq!(detector.bounds(0, 30), (0, 10));
        assert_eq!(detector.bounds(29, 30), (19, 30));

        let odd = RollingDetector::new(3, 3.0);
        assert_eq!(odd.bounds(5, 10), (4, 7));

        let single = RollingDetector::new(1, 3.0);
        assert_eq!(single.bounds(5, 10), (5, 6));
    }

    #[test]
    fn test_spike_scores_one_and_neighbours_low() {
        let scores = RollingDetector::default().score_series(&spike_series());
        assert_eq!(scores[15], 1.0);
        assert!(scores[14] < 0.5, "got {}", scores[14]);
        assert!(scores[16] < 0.5, "got {}", scores[16]);
    }

    #[test]
    fn test_edges_are_scored() {
        let column = FeatureColumn::new("x", spike_series().into_iter().map(Some).collect());
        let result = RollingDetector::default().score_column(&column);
        assert!(result.scores.iter().all(Option::is_some));
    }

    #[test]
    fn test_window_of_one_scores_zero() {
        let scores = RollingDetector::new(1, 3.0).score_series(&[1.0, 50.0, 2.0]);
        assert_eq!(scores, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_constant_series() {
        let column = FeatureColumn::new("x", vec![Some(5.0); 30]);
        let result = RollingDetector::default().score_column(&column);
        assert_eq!(result.degradation, Some(DegradationReason::ConstantFeature));
        assert!(result.scores.iter().all(|s| *s == Some(0.0)));
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let mut values: Vec<Option<f64>> = spike_series().into_iter().map(Some).collect();
        values[3] = None;
        let column = FeatureColumn::new("x", values);
        let result = RollingDetector::default().score_column(&column);
        assert_eq!(result.scores[3], None);
        assert_eq!(result.scores[15], Some(1.0));
    }
}
