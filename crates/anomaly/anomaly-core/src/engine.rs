//! Engine orchestrating detectors, combination and selection.

use std::collections::BTreeMap;

use anomaly_api::EngineConfig;
use anomaly_spi::{
    AnomalyError, Dataset, Detection, Detector, DetectorKind, Result, ScoreReport, ScoreVector,
};
use rayon::prelude::*;

use crate::detectors::build_detector;
use crate::ensemble::EnsembleCombiner;
use crate::selector::AnomalySelector;

/// Scores a dataset with the configured detectors and reports the flagged records.
///
/// The engine holds only its validated configuration; every call to
/// [`AnomalyEngine::analyze`] builds fresh detectors and owns nothing
/// afterwards.
///
/// # Example
///
/// ```
/// use anomaly_api::EngineConfig;
/// use anomaly_core::AnomalyEngine;
/// use anomaly_spi::Dataset;
///
/// let mut values = vec![10.0; 40];
/// values[17] = 500.0;
/// values[3] = 11.0;
/// let engine = AnomalyEngine::new(EngineConfig::default()).unwrap();
/// let report = engine.analyze(&Dataset::from_series("value", &values)).unwrap();
/// assert_eq!(report.total_records, 40);
/// ```
#[derive(Debug, Clone)]
pub struct AnomalyEngine {
    config: EngineConfig,
}

impl AnomalyEngine {
    /// Create an engine, rejecting invalid configuration up front.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyze(&self, dataset: &Dataset) -> Result<ScoreReport> {
        self.check_input(dataset)?;

        let kinds = self.config.selected_detectors();
        let detections = self.run_detectors(&kinds, dataset)?;

        let mut vectors: BTreeMap<DetectorKind, ScoreVector> = BTreeMap::new();
        let mut warnings = Vec::new();
        for detection in detections {
            tracing::debug!(
                detector = %detection.scores.kind(),
                records = detection.scores.len(),
                present = detection.scores.present_count(),
                "detector finished"
            );
            for warning in &detection.warnings {
                tracing::warn!(detector = %warning.kind, "degraded: {}", warning);
            }
            warnings.extend(detection.warnings);
            vectors.insert(detection.scores.kind(), detection.scores);
        }

        let combined =
            EnsembleCombiner::new(&self.config.weights, &kinds).combine(dataset.len(), &vectors);
        if !combined.insufficient.is_empty() {
            tracing::warn!(
                records = combined.insufficient.len(),
                "records not evaluated by any weighted detector"
            );
        }

        let report = AnomalySelector::new(self.config.threshold)
            .with_detector_scores(self.config.include_detector_scores)
            .report(combined, &vectors, warnings);

        tracing::info!(
            records = report.total_records,
            anomalies = report.anomaly_count,
            threshold = report.threshold,
            "anomaly analysis complete"
        );
        Ok(report)
    }

    fn check_input(&self, dataset: &Dataset) -> Result<()> {
        if dataset.is_empty() {
            return Err(AnomalyError::EmptyDataset);
        }
        if dataset.numeric_features().is_empty() {
            return Err(AnomalyError::NoNumericFeatures);
        }
        let order_key = self
            .config
            .selected_detectors()
            .contains(&DetectorKind::TemporalRolling)
            .then_some(self.config.rolling.order_by.as_ref())
            .flatten();
        let requested = self.config.targets.iter().flatten().chain(order_key);
        for name in requested {
            if !dataset.has_feature(name) {
                return Err(AnomalyError::UnknownFeature { name: name.clone() });
            }
        }
        Ok(())
    }

    fn run_detectors(&self, kinds: &[DetectorKind], dataset: &Dataset) -> Result<Vec<Detection>> {
        let detectors: Vec<Box<dyn Detector>> = kinds
            .iter()
            .map(|&kind| build_detector(kind, &self.config))
            .collect();
        for detector in &detectors {
            tracing::debug!(
                detector = %detector.kind(),
                capability = ?detector.capability(),
                "running detector"
            );
        }

        if self.config.parallel {
            detectors.par_iter().map(|d| d.score(dataset)).collect()
        } else {
            detectors.iter().map(|d| d.score(dataset)).collect()
        }
    }
}

/// Analyze `dataset` with a one-off engine built from `config`.
pub fn analyze(dataset: &Dataset, config: &EngineConfig) -> Result<ScoreReport> {
    AnomalyEngine::new(config.clone())?.analyze(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anomaly_api::EnsembleWeights;
    use anomaly_spi::{DegradationReason, Record};

    fn series_with_spike() -> Dataset {
        let values: Vec<f64> = (0..40)
            .map(|i| if i == 25 { 300.0 } else { 50.0 + f64::from(i % 5) })
            .collect();
        Dataset::from_series("value", &values)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = AnomalyEngine::new(EngineConfig::default().with_threshold(1.5)).unwrap_err();
        assert!(matches!(err, AnomalyError::InvalidParameter { .. }));
    }

    #[test]
    fn test_empty_dataset() {
        let engine = AnomalyEngine::new(EngineConfig::default()).unwrap();
        let err = engine.analyze(&Dataset::default()).unwrap_err();
        assert!(matches!(err, AnomalyError::EmptyDataset));
    }

    #[test]
    fn test_no_numeric_features() {
        let engine = AnomalyEngine::new(EngineConfig::default()).unwrap();
        let data = Dataset::new(vec![Record::new().with_missing("a"); 3]);
        assert!(matches!(
            engine.analyze(&data).unwrap_err(),
            AnomalyError::NoNumericFeatures
        ));
    }

    #[test]
    fn test_unknown_target_and_order_key() {
        let engine =
            AnomalyEngine::new(EngineConfig::default().with_targets(["missing"])).unwrap();
        assert!(matches!(
            engine.analyze(&series_with_spike()).unwrap_err(),
            AnomalyError::UnknownFeature { ref name } if name == "missing"
        ));

        let mut config = EngineConfig::single(DetectorKind::TemporalRolling);
        config.rolling = config.rolling.ordered_by("ts");
        let engine = AnomalyEngine::new(config).unwrap();
        assert!(matches!(
            engine.analyze(&series_with_spike()).unwrap_err(),
            AnomalyError::UnknownFeature { ref name } if name == "ts"
        ));
    }

    #[test]
    fn test_default_ensemble_flags_spike() {
        let engine = AnomalyEngine::new(EngineConfig::default().with_threshold(0.5)).unwrap();
        let report = engine.analyze(&series_with_spike()).unwrap();
        assert_eq!(report.total_records, 40);
        assert_eq!(report.anomalies[0].index, 25);
        assert_eq!(report.detectors, DetectorKind::default_set());
        assert_eq!(report.anomalies[0].detector_scores.as_ref().map(Vec::len), Some(3));
        assert!(report.insufficient_data.is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let data = series_with_spike();
        let parallel = analyze(&data, &EngineConfig::default()).unwrap();
        let sequential = analyze(&data, &EngineConfig::default().with_parallel(false)).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_single_detector_identity() {
        let data = series_with_spike();
        let config = EngineConfig::single(DetectorKind::PointwiseStatistical);
        let report = analyze(&data, &config).unwrap();
        let detection = build_detector(DetectorKind::PointwiseStatistical, &config)
            .score(&data)
            .unwrap();
        for (i, &score) in report.scores.iter().enumerate() {
            assert_eq!(Some(score), detection.scores.get(i));
        }
    }

    #[test]
    fn test_degradation_reported_not_raised() {
        let data = Dataset::from_series("flat", &[5.0; 20]);
        let report = analyze(&data, &EngineConfig::default()).unwrap();
        assert!(report.scores.iter().all(|&s| s == 0.0));
        assert_eq!(report.anomaly_count, 0);
        assert!(report.is_degraded());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.reason == DegradationReason::ConstantFeature));
    }

    #[test]
    fn test_record_without_values_is_insufficient() {
        let mut records: Vec<Record> = (0..20)
            .map(|i| Record::new().with("v", f64::from(i)))
            .collect();
        records.push(Record::new().with_missing("v"));
        let config = EngineConfig::default()
            .with_weights(EnsembleWeights::uniform(&DetectorKind::default_set()));
        let report = analyze(&Dataset::new(records), &config).unwrap();
        assert_eq!(report.insufficient_data, vec![20]);
        assert_eq!(report.score(20), Some(0.0));
    }
}
