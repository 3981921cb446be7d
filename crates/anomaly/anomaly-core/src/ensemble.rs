//! Weighted ensemble combination.

use std::collections::BTreeMap;

use anomaly_api::EnsembleWeights;
use anomaly_spi::{DetectorKind, ScoreVector};

use crate::normalize::clip_unit;

/// Combined score per record.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedScores {
    /// One score in `[0, 1]` per record, in dataset order.
    pub scores: Vec<f64>,
    /// Records no weighted detector evaluated.
    pub insufficient: Vec<usize>,
}

/// Merges per-detector score vectors into one score per record.
///
/// For each record the weighted sum runs over the detectors that produced a
/// value for it and is divided by the weight of those same detectors, so an
/// absent detector never drags the record toward zero.
#[derive(Debug, Clone)]
pub struct EnsembleCombiner {
    weights: BTreeMap<DetectorKind, f64>,
}

impl EnsembleCombiner {
    /// Resolve the weight of each selected detector from the table.
    pub fn new(weights: &EnsembleWeights, selected: &[DetectorKind]) -> Self {
        Self {
            weights: weights.resolve(selected),
        }
    }

    pub fn weight(&self, kind: DetectorKind) -> f64 {
        self.weights.get(&kind).copied().unwrap_or(0.0)
    }

    pub fn combine(&self, len: usize, vectors: &BTreeMap<DetectorKind, ScoreVector>) -> CombinedScores {
        let mut scores = Vec::with_capacity(len);
        let mut insufficient = Vec::new();

        for i in 0..len {
            let present: Vec<(f64, f64)> = vectors
                .iter()
                .filter_map(|(&kind, vector)| {
                    let weight = self.weight(kind);
                    let score = vector.get(i)?;
                    (weight > 0.0).then_some((score, weight))
                })
                .collect();
            let (weighted, total) = present
                .iter()
                .fold((0.0, 0.0), |(sum, total), &(s, w)| (sum + w * s, total + w));

            // A lone detector passes through unchanged; w * s / w can be off by an ulp.
            if let [(score, _)] = present.as_slice() {
                scores.push(*score);
            } else if total > 0.0 {
                scores.push(clip_unit(weighted / total));
            } else {
                scores.push(0.0);
                insufficient.push(i);
            }
        }

        CombinedScores {
            scores,
            insufficient,
        }
    }
}

/// Combine `vectors` with `weights`, treating the supplied vectors as the selected detectors.
pub fn combine(
    len: usize,
    vectors: &BTreeMap<DetectorKind, ScoreVector>,
    weights: &EnsembleWeights,
) -> CombinedScores {
    let selected: Vec<DetectorKind> = vectors.keys().copied().collect();
    EnsembleCombiner::new(weights, &selected).combine(len, vectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectors(entries: Vec<(DetectorKind, Vec<Option<f64>>)>) -> BTreeMap<DetectorKind, ScoreVector> {
        entries
            .into_iter()
            .map(|(kind, scores)| (kind, ScoreVector::new(kind, scores)))
            .collect()
    }

    #[test]
    fn test_weighted_mean_over_present() {
        let v = vectors(vec![
            (DetectorKind::PointwiseStatistical, vec![Some(1.0), Some(0.0)]),
            (DetectorKind::RangeBased, vec![Some(0.5), Some(0.0)]),
            (DetectorKind::MultivariateIsolation, vec![Some(0.0), None]),
        ]);
        let combined = combine(2, &v, &EnsembleWeights::default());
        // (0.3 * 1.0 + 0.3 * 0.5 + 0.4 * 0.0) / 1.0
        assert!((combined.scores[0] - 0.45).abs() < 1e-12);
        assert_eq!(combined.scores[1], 0.0);
        assert!(combined.insufficient.is_empty());
    }

    #[test]
    fn test_absent_detector_does_not_dilute() {
        let v = vectors(vec![
            (DetectorKind::PointwiseStatistical, vec![None]),
            (DetectorKind::RangeBased, vec![None]),
            (DetectorKind::MultivariateIsolation, vec![Some(0.9)]),
        ]);
        let combined = combine(1, &v, &EnsembleWeights::default());
        assert!((combined.scores[0] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_lone_detector_passes_through_exactly() {
        let v = vectors(vec![
            (DetectorKind::PointwiseStatistical, vec![Some(0.7), Some(0.1), Some(1.0 / 3.0), None]),
            (DetectorKind::RangeBased, vec![None, None, None, Some(0.6)]),
        ]);
        let combined = combine(4, &v, &EnsembleWeights::default());
        assert_eq!(combined.scores[0], 0.7);
        assert_eq!(combined.scores[1], 0.1);
        assert_eq!(combined.scores[2], 1.0 / 3.0);
        assert_eq!(combined.scores[3], 0.6);
        assert!(combined.insufficient.is_empty());
    }

    #[test]
    fn test_no_detector_present_is_insufficient() {
        let v = vectors(vec![
            (DetectorKind::PointwiseStatistical, vec![Some(0.4), None]),
            (DetectorKind::RangeBased, vec![Some(0.2), None]),
        ]);
        let combined = combine(2, &v, &EnsembleWeights::default());
        assert_eq!(combined.scores[1], 0.0);
        assert_eq!(combined.insufficient, vec![1]);
    }

    #[test]
    fn test_zero_weight_detector_ignored() {
        let v = vectors(vec![
            (DetectorKind::PointwiseStatistical, vec![Some(0.8)]),
            (DetectorKind::RangeBased, vec![Some(0.0)]),
        ]);
        let weights = EnsembleWeights::default().with(DetectorKind::RangeBased, 0.0);
        let combined = combine(1, &v, &weights);
        assert!((combined.scores[0] - 0.8).abs() < 1e-12);

        let only_zero = vectors(vec![(DetectorKind::RangeBased, vec![Some(0.7)])]);
        let combined = combine(1, &only_zero, &weights);
        assert_eq!(combined.scores[0], 0.0);
        assert_eq!(combined.insufficient, vec![0]);
    }

    #[test]
    fn test_unweighted_detector_gets_share() {
        let v = vectors(vec![
            (DetectorKind::PointwiseStatistical, vec![Some(0.0)]),
            (DetectorKind::TemporalRolling, vec![Some(1.0)]),
        ]);
        let combined = combine(1, &v, &EnsembleWeights::default());
        // Temporal falls back to 1/2; pointwise keeps 0.3.
        assert!((combined.scores[0] - 0.5 / 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_short_vectors_count_as_absent() {
        let v = vectors(vec![(DetectorKind::RangeBased, vec![Some(0.3)])]);
        let combined = combine(3, &v, &EnsembleWeights::default());
        assert_eq!(combined.scores, vec![0.3, 0.0, 0.0]);
        assert_eq!(combined.insufficient, vec![1, 2]);
    }
}
