//! Thresholding, ranking and report assembly.

use std::collections::BTreeMap;

use anomaly_spi::{
    AnomalyRateLevel, DegradationWarning, DetectorKind, DetectorScore, RankedRecord, ScoreReport,
    ScoreVector,
};

use crate::ensemble::CombinedScores;
use crate::stats;

/// Flags records whose combined score reaches a threshold.
#[derive(Debug, Clone, Copy)]
pub struct AnomalySelector {
    threshold: f64,
    include_detector_scores: bool,
}

impl AnomalySelector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            include_detector_scores: true,
        }
    }

    pub fn with_detector_scores(mut self, include: bool) -> Self {
        self.include_detector_scores = include;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Indices of records with score >= threshold, highest score first.
    ///
    /// A zero score is never flagged, even at threshold 0. Equal scores keep
    /// their input order.
    pub fn select(&self, scores: &[f64]) -> Vec<usize> {
        let mut selected: Vec<usize> = scores
            .iter()
            .enumerate()
            .filter(|(_, &s)| s > 0.0 && s >= self.threshold)
            .map(|(i, _)| i)
            .collect();
        // sort_by is stable
        selected.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        selected
    }

    /// Build the report for one run.
    pub fn report(
        &self,
        combined: CombinedScores,
        vectors: &BTreeMap<DetectorKind, ScoreVector>,
        warnings: Vec<DegradationWarning>,
    ) -> ScoreReport {
        let total = combined.scores.len();
        let anomalies: Vec<RankedRecord> = self
            .select(&combined.scores)
            .into_iter()
            .map(|index| RankedRecord {
                index,
                score: combined.scores[index],
                detector_scores: self.include_detector_scores.then(|| {
                    vectors
                        .iter()
                        .map(|(&kind, vector)| DetectorScore {
                            kind,
                            score: vector.get(index),
                        })
                        .collect()
                }),
            })
            .collect();

        let anomaly_rate = if total == 0 {
            0.0
        } else {
            anomalies.len() as f64 / total as f64
        };

        ScoreReport {
            total_records: total,
            anomaly_count: anomalies.len(),
            anomaly_rate,
            rate_level: AnomalyRateLevel::from_rate(anomaly_rate),
            threshold: self.threshold,
            detectors: vectors.keys().copied().collect(),
            stats: stats::summarize(&combined.scores),
            anomalies,
            scores: combined.scores,
            insufficient_data: combined.insufficient,
            warnings,
        }
    }
}
