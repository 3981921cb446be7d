//! Multivariate isolation detector.

use anomaly_api::IsolationConfig;
use anomaly_spi::{
    AnomalyError, Dataset, DegradationReason, DegradationWarning, Detection, Detector,
    DetectorKind, Result, ScoreVector,
};

use crate::forest::IsolationForest;
use crate::normalize::min_max_inverted;
use crate::stats;

/// Isolation forest over every numeric feature.
///
/// Features are standardized over the complete records (those with every
/// numeric feature present). Records missing any feature are absent from the
/// result, not zero. The forest's decision values are min-max rescaled over
/// the batch and inverted so that 1.0 is the most isolated record.
///
/// @algorithm IsolationForest
/// @category MultivariateDetector
/// @complexity O(t * psi * log psi) fit, O(n * t * log psi) score
#[derive(Debug, Clone, Default)]
pub struct IsolationDetector {
    config: IsolationConfig,
}

impl IsolationDetector {
    pub fn new(config: IsolationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IsolationConfig {
        &self.config
    }

    fn degraded(
        &self,
        len: usize,
        complete: &[usize],
        reason: DegradationReason,
    ) -> Detection {
        let mut scores = vec![None; len];
        for &i in complete {
            scores[i] = Some(0.0);
        }
        Detection::with_warnings(
            ScoreVector::new(self.kind(), scores),
            vec![DegradationWarning::new(self.kind(), None, reason)],
        )
    }
}

/// Indices of complete records and their standardized feature rows.
fn standardized_rows(dataset: &Dataset, features: &[String]) -> (Vec<usize>, Vec<Vec<f64>>) {
    let mut complete = Vec::new();
    let mut rows = Vec::new();
    for (i, record) in dataset.records().iter().enumerate() {
        let row: Option<Vec<f64>> = features.iter().map(|f| record.get(f)).collect();
        if let Some(row) = row {
            complete.push(i);
            rows.push(row);
        }
    }

    for j in 0..features.len() {
        let column: Vec<f64> = rows.iter().map(|r| r[j]).collect();
        let Some(moments) = stats::Moments::population(&column) else {
            continue;
        };
        for row in &mut rows {
            row[j] = if moments.has_spread() {
                moments.standardize(row[j])
            } else {
                0.0
            };
        }
    }
    (complete, rows)
}

impl Detector for IsolationDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::MultivariateIsolation
    }

    fn score(&self, dataset: &Dataset) -> Result<Detection> {
        let features = dataset.numeric_features();
        if features.is_empty() {
            return Err(AnomalyError::NoNumericFeatures);
        }

        let (complete, rows) = standardized_rows(dataset, &features);
        if complete.len() < 2 {
            return Ok(self.degraded(
                dataset.len(),
                &complete,
                DegradationReason::InsufficientSamples {
                    required: 2,
                    got: complete.len(),
                },
            ));
        }

        let Some(forest) = IsolationForest::fit(&rows, &self.config) else {
            return Ok(self.degraded(dataset.len(), &complete, DegradationReason::DegenerateScores));
        };
        let raw = forest.decision_function(&rows);
        let Some(normalized) = min_max_inverted(&raw) else {
            return Ok(self.degraded(dataset.len(), &complete, DegradationReason::DegenerateScores));
        };

        let mut scores = vec![None; dataset.len()];
        for (&i, score) in complete.iter().zip(normalized) {
            scores[i] = Some(score);
        }
        Ok(Detection::new(ScoreVector::new(self.kind(), scores)))
    }
}
