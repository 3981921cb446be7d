//! End-to-end scoring scenarios
//!
//! Runs complete analyses through the facade and checks the headline
//! behaviour of each detector and of the ensemble.

use std::collections::BTreeMap;

use anomaly_facade::prelude::*;
use anomaly_facade::{build_detector, combine, DegradationReason, ScoreVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

fn normal_with_outlier(seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut values: Vec<f64> = (0..100).map(|_| standard_normal(&mut rng)).collect();
    values[50] = 50.0;
    Dataset::from_series("x", &values)
}

fn spike_series() -> Dataset {
    let values: Vec<f64> = (0..30)
        .map(|i| if i == 15 { 1000.0 } else { 100.0 + f64::from(i % 3) - 1.0 })
        .collect();
    Dataset::from_series("value", &values)
}

// =============================================================================
// Scenario A: single extreme value in normal data
// =============================================================================

#[test]
fn e2e_pointwise_and_range_flag_extreme_value() {
    for seed in [1, 7, 42] {
        let data = normal_with_outlier(seed);
        for kind in [DetectorKind::PointwiseStatistical, DetectorKind::RangeBased] {
            let detection = build_detector(kind, &EngineConfig::default())
                .score(&data)
                .unwrap();
            let score = detection.scores.get(50).unwrap();
            assert!(score >= 0.9, "{kind} scored {score} with seed {seed}");
        }
    }
}

#[test]
fn e2e_default_ensemble_ranks_extreme_value_first() {
    let report = analyze(&normal_with_outlier(42), &EngineConfig::default()).unwrap();
    assert_eq!(report.total_records, 100);
    assert_eq!(report.anomalies[0].index, 50);
    assert!(report.anomalies[0].score >= 0.9);
    assert!(report.warnings.is_empty());
}

// =============================================================================
// Scenario B: constant feature
// =============================================================================

#[test]
fn e2e_constant_feature_scores_zero_everywhere() {
    let data = Dataset::from_series("flat", &[5.0; 50]);
    let config = EngineConfig::default().with_detectors(DetectorKind::ALL.to_vec());

    for kind in DetectorKind::ALL {
        let detection = build_detector(kind, &config).score(&data).unwrap();
        assert!(
            detection.scores.scores().iter().all(|s| *s == Some(0.0)),
            "{kind} produced a non-zero score"
        );
    }

    for step in 0..=10 {
        let tau = f64::from(step) / 10.0;
        let report = analyze(&data, &config.clone().with_threshold(tau)).unwrap();
        assert!(report.scores.iter().all(|&s| s == 0.0));
        assert_eq!(report.anomaly_count, 0, "tau = {tau}");
    }
}

#[test]
fn e2e_constant_feature_is_reported_as_degradation() {
    let data = Dataset::from_series("flat", &[5.0; 50]);
    let report = analyze(&data, &EngineConfig::default()).unwrap();
    let reasons: Vec<&DegradationReason> = report.warnings.iter().map(|w| &w.reason).collect();
    assert!(reasons.contains(&&DegradationReason::ConstantFeature));
    assert!(reasons.contains(&&DegradationReason::ZeroSpread));
    assert!(reasons.contains(&&DegradationReason::DegenerateScores));
}

// =============================================================================
// Scenario C: temporal spike
// =============================================================================

#[test]
fn e2e_rolling_isolates_spike() {
    let config = EngineConfig::single(DetectorKind::TemporalRolling);
    let report = analyze(&spike_series(), &config).unwrap();

    assert_eq!(report.score(15), Some(1.0));
    assert!(report.score(14).unwrap() < 0.5);
    assert!(report.score(16).unwrap() < 0.5);
    assert_eq!(report.anomaly_indices(), vec![15]);
    assert_eq!(report.detectors, vec![DetectorKind::TemporalRolling]);
}

#[test]
fn e2e_rolling_follows_order_key() {
    // Same series, stored newest first.
    let mut records: Vec<Record> = spike_series()
        .records()
        .iter()
        .enumerate()
        .map(|(i, r)| r.clone().with("ts", i as f64))
        .collect();
    records.reverse();

    let mut config = EngineConfig::single(DetectorKind::TemporalRolling);
    config.rolling = config.rolling.ordered_by("ts");
    let report = analyze(&Dataset::new(records), &config).unwrap();

    // Chronological index 15 sits at position 14 after reversal.
    assert_eq!(report.score(14), Some(1.0));
    assert_eq!(report.anomaly_indices(), vec![14]);
}

// =============================================================================
// Scenario D: one detector absent everywhere
// =============================================================================

#[test]
fn e2e_absent_detector_leaves_other_scores_untouched() {
    let a = ScoreVector::new(
        DetectorKind::PointwiseStatistical,
        vec![Some(0.0), Some(0.25), Some(1.0), Some(0.6)],
    );
    let b = ScoreVector::absent(DetectorKind::MultivariateIsolation, 4);
    let vectors = BTreeMap::from([(a.kind(), a.clone()), (b.kind(), b)]);
    let weights = EnsembleWeights::empty()
        .with(DetectorKind::PointwiseStatistical, 0.5)
        .with(DetectorKind::MultivariateIsolation, 0.5);

    let combined = combine(4, &vectors, &weights);
    for (i, score) in combined.scores.iter().enumerate() {
        assert_eq!(Some(*score), a.get(i));
    }
    assert!(combined.insufficient.is_empty());
}

#[test]
fn e2e_isolation_absent_for_incomplete_records() {
    // Every record carries only one of the two features, so no record is
    // complete and the isolation detector evaluates none of them.
    let mut records: Vec<Record> = (0..40)
        .map(|i| {
            let t = f64::from(i);
            if i % 2 == 0 {
                Record::new().with("a", 10.0 + t.sin())
            } else {
                Record::new().with("b", 3.0 + t.cos())
            }
        })
        .collect();
    records[20] = Record::new().with("a", 60.0);
    let data = Dataset::new(records);

    let config = EngineConfig::default()
        .with_detectors(vec![
            DetectorKind::PointwiseStatistical,
            DetectorKind::MultivariateIsolation,
        ])
        .with_weights(
            EnsembleWeights::empty()
                .with(DetectorKind::PointwiseStatistical, 0.5)
                .with(DetectorKind::MultivariateIsolation, 0.5),
        );
    let report = analyze(&data, &config).unwrap();
    let pointwise = build_detector(DetectorKind::PointwiseStatistical, &config)
        .score(&data)
        .unwrap();

    for (i, &score) in report.scores.iter().enumerate() {
        assert!((score - pointwise.scores.get(i).unwrap()).abs() < 1e-12);
    }
    assert_eq!(report.anomaly_indices(), vec![20]);
    assert!(report.warnings.iter().any(|w| {
        w.kind == DetectorKind::MultivariateIsolation
            && w.reason == DegradationReason::InsufficientSamples { required: 2, got: 0 }
    }));
}

#[test]
fn e2e_values_near_float_max_keep_their_spread() {
    let data = Dataset::new(
        (0..40)
            .map(|i| {
                let a = if i % 2 == 0 { 1.5e308 } else { -1.5e308 };
                let c = if i == 5 { 1e308 } else { 1.0 };
                Record::new().with("a", a).with("c", c)
            })
            .collect(),
    );

    let config = EngineConfig::single(DetectorKind::PointwiseStatistical).with_threshold(0.5);
    let report = analyze(&data, &config).unwrap();
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.anomaly_indices(), vec![5]);
    assert!(report.scores.iter().all(|s| s.is_finite()));

    let detection = build_detector(DetectorKind::RangeBased, &config)
        .score(&data)
        .unwrap();
    assert!(detection
        .warnings
        .iter()
        .all(|w| w.feature.as_deref() != Some("a")));
}
