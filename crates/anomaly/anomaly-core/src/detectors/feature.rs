//! Adapter running a column scorer over target features.

use anomaly_api::FeatureAggregation;
use anomaly_spi::{
    AnomalyError, ColumnScore, ColumnScorer, Dataset, DegradationWarning, Detection, Detector,
    DetectorKind, FeatureColumn, Result, ScoreVector,
};

/// Runs a [`ColumnScorer`] on each target feature and folds the per-feature
/// scores into one vector.
///
/// A record scores over the target features present for it; with none
/// present it stays absent.
#[derive(Debug, Clone)]
pub struct FeatureDetector<S> {
    scorer: S,
    targets: Option<Vec<String>>,
    aggregation: FeatureAggregation,
    order_by: Option<String>,
}

impl<S: ColumnScorer> FeatureDetector<S> {
    /// Score every numeric feature, averaging across features.
    pub fn new(scorer: S) -> Self {
        Self {
            scorer,
            targets: None,
            aggregation: FeatureAggregation::Mean,
            order_by: None,
        }
    }

    pub fn with_targets(mut self, targets: Option<Vec<String>>) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_aggregation(mut self, aggregation: FeatureAggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Score columns in ascending order of `feature` instead of record order.
    pub fn with_order_by(mut self, feature: Option<String>) -> Self {
        self.order_by = feature;
        self
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    fn resolve_targets(&self, dataset: &Dataset) -> Result<Vec<String>> {
        let targets = match &self.targets {
            Some(targets) => {
                if let Some(name) = targets.iter().find(|t| !dataset.has_feature(t)) {
                    return Err(AnomalyError::UnknownFeature { name: name.clone() });
                }
                targets.clone()
            }
            // The ordering key is a timestamp, not a target.
            None => dataset
                .numeric_features()
                .into_iter()
                .filter(|f| self.order_by.as_ref() != Some(f))
                .collect(),
        };
        if targets.is_empty() {
            return Err(AnomalyError::NoNumericFeatures);
        }
        Ok(targets)
    }

    /// Record indices sorted by the ordering feature; records without it are left out.
    fn sequence(&self, dataset: &Dataset) -> Result<Option<Vec<usize>>> {
        let Some(key) = &self.order_by else {
            return Ok(None);
        };
        let column = dataset
            .column(key)
            .ok_or_else(|| AnomalyError::UnknownFeature { name: key.clone() })?;
        let mut keyed = column.present();
        keyed.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(Some(keyed.into_iter().map(|(i, _)| i).collect()))
    }

    fn score_in_sequence(&self, column: &FeatureColumn, sequence: &[usize]) -> ColumnScore {
        let reordered = FeatureColumn::new(
            column.name(),
            sequence.iter().map(|&i| column.values()[i]).collect(),
        );
        let result = self.scorer.score_column(&reordered);
        let mut scores = vec![None; column.len()];
        for (&index, score) in sequence.iter().zip(result.scores) {
            scores[index] = score;
        }
        ColumnScore {
            scores,
            degradation: result.degradation,
        }
    }
}

impl<S: ColumnScorer> Detector for FeatureDetector<S> {
    fn kind(&self) -> DetectorKind {
        self.scorer.kind()
    }

    fn score(&self, dataset: &Dataset) -> Result<Detection> {
        let targets = self.resolve_targets(dataset)?;
        let sequence = self.sequence(dataset)?;

        let mut per_feature = Vec::with_capacity(targets.len());
        let mut warnings = Vec::new();
        for name in &targets {
            let column = dataset
                .column(name)
                .ok_or_else(|| AnomalyError::UnknownFeature { name: name.clone() })?;
            let result = match &sequence {
                Some(sequence) => self.score_in_sequence(&column, sequence),
                None => self.scorer.score_column(&column),
            };
            if let Some(reason) = result.degradation {
                warnings.push(DegradationWarning::new(self.kind(), Some(name), reason));
            }
            per_feature.push(result.scores);
        }

        let scores = aggregate(&per_feature, dataset.len(), self.aggregation);
        Ok(Detection::with_warnings(
            ScoreVector::new(self.kind(), scores),
            warnings,
        ))
    }
}

/// Fold per-feature score columns into one score per record.
pub fn aggregate(
    per_feature: &[Vec<Option<f64>>],
    len: usize,
    aggregation: FeatureAggregation,
) -> Vec<Option<f64>> {
    (0..len)
        .map(|i| {
            let present: Vec<f64> = per_feature
                .iter()
                .filter_map(|scores| scores.get(i).copied().flatten())
                .collect();
            if present.is_empty() {
                return None;
            }
            Some(match aggregation {
                FeatureAggregation::Mean => present.iter().sum::<f64>() / present.len() as f64,
                FeatureAggregation::Max => present.iter().copied().fold(0.0, f64::max),
            })
        })
        .collect()
}
