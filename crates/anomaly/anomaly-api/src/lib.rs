//! Anomaly Scoring API
//!
//! Configuration types for the detectors, the ensemble weighting, and the
//! anomaly selector. Every type is plain data with serde support; missing
//! fields fall back to their defaults when deserializing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use anomaly_spi::{AnomalyError, DetectorKind, Result};

// ============================================================================
// Detector Configuration
// ============================================================================

/// Z-score detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZScoreConfig {
    /// Z-score that maps to a full score of 1.0 (default: 3.0).
    pub threshold: f64,
}

impl Default for ZScoreConfig {
    fn default() -> Self {
        Self { threshold: 3.0 }
    }
}

impl ZScoreConfig {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn validate(&self) -> Result<()> {
        positive("zscore.threshold", self.threshold)
    }
}

/// IQR detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IQRConfig {
    /// IQR multiplier for the outlier fences (default: 1.5).
    pub multiplier: f64,
}

impl Default for IQRConfig {
    fn default() -> Self {
        Self { multiplier: 1.5 }
    }
}

impl IQRConfig {
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    pub fn validate(&self) -> Result<()> {
        positive("iqr.multiplier", self.multiplier)
    }
}

/// Isolation forest configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolationConfig {
    /// Expected fraction of anomalous records, in `(0, 0.5]` (default: 0.1).
    pub contamination: f64,
    /// Number of isolation trees (default: 100).
    pub n_estimators: usize,
    /// Upper bound on the subsample drawn for each tree (default: 256).
    pub max_samples: usize,
    /// Seed for tree construction (default: 42).
    pub seed: u64,
}

impl Default for IsolationConfig {
    fn default() -> Self {
        Self {
            contamination: 0.1,
            n_estimators: 100,
            max_samples: 256,
            seed: 42,
        }
    }
}

impl IsolationConfig {
    pub fn new(contamination: f64, n_estimators: usize) -> Self {
        Self {
            contamination,
            n_estimators,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(AnomalyError::invalid_parameter(
                "isolation.contamination",
                "must be in (0, 0.5]",
            ));
        }
        nonzero("isolation.n_estimators", self.n_estimators)?;
        nonzero("isolation.max_samples", self.max_samples)
    }
}

/// Rolling-window detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingConfig {
    /// Centered window size (default: 20).
    pub window: usize,
    /// Standardized residual that maps to a full score of 1.0 (default: 3.0).
    pub threshold: f64,
    /// Feature giving chronological order; record order when unset.
    pub order_by: Option<String>,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            window: 20,
            threshold: 3.0,
            order_by: None,
        }
    }
}

impl RollingConfig {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    pub fn ordered_by(mut self, feature: impl Into<String>) -> Self {
        self.order_by = Some(feature.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        nonzero("rolling.window", self.window)?;
        positive("rolling.threshold", self.threshold)
    }
}

// ============================================================================
// Ensemble Configuration
// ============================================================================

/// Per-detector weights for the ensemble.
///
/// Weights need not sum to one; the combiner divides by the weight of the
/// detectors that actually scored each record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnsembleWeights {
    weights: BTreeMap<DetectorKind, f64>,
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self::empty()
            .with(DetectorKind::PointwiseStatistical, 0.3)
            .with(DetectorKind::RangeBased, 0.3)
            .with(DetectorKind::MultivariateIsolation, 0.4)
    }
}

impl EnsembleWeights {
    /// A table with no explicit weights.
    pub fn empty() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    /// Equal weight for each listed detector.
    pub fn uniform(kinds: &[DetectorKind]) -> Self {
        kinds
            .iter()
            .fold(Self::empty(), |acc, &kind| acc.with(kind, 1.0))
    }

    pub fn with(mut self, kind: DetectorKind, weight: f64) -> Self {
        self.set(kind, weight);
        self
    }

    pub fn set(&mut self, kind: DetectorKind, weight: f64) {
        self.weights.insert(kind, weight);
    }

    /// Explicitly configured weight.
    pub fn get(&self, kind: DetectorKind) -> Option<f64> {
        self.weights.get(&kind).copied()
    }

    /// Weight used for `kind` when `selected` detectors run.
    ///
    /// Detectors without an explicit weight get `1 / selected`.
    pub fn weight_for(&self, kind: DetectorKind, selected: usize) -> f64 {
        self.get(kind)
            .unwrap_or_else(|| 1.0 / selected.max(1) as f64)
    }

    /// Resolve the weight of every selected detector.
    pub fn resolve(&self, selected: &[DetectorKind]) -> BTreeMap<DetectorKind, f64> {
        selected
            .iter()
            .map(|&kind| (kind, self.weight_for(kind, selected.len())))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        for (kind, &weight) in &self.weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(AnomalyError::invalid_parameter(
                    format!("weights.{kind}"),
                    "must be a non-negative finite number",
                ));
            }
        }
        Ok(())
    }
}

/// How per-feature detectors fold several target features into one score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureAggregation {
    /// Mean over the features present for the record.
    #[default]
    Mean,
    /// Highest score over the features present for the record.
    Max,
}

// ============================================================================
// Engine Configuration
// ============================================================================

/// Full configuration of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Detectors to run; duplicates are ignored.
    pub detectors: Vec<DetectorKind>,
    /// Features scored by per-feature detectors; every numeric feature when unset.
    pub targets: Option<Vec<String>>,
    pub aggregation: FeatureAggregation,
    pub zscore: ZScoreConfig,
    pub iqr: IQRConfig,
    pub isolation: IsolationConfig,
    pub rolling: RollingConfig,
    pub weights: EnsembleWeights,
    /// Combined score at or above which a record is flagged (default: 0.7).
    pub threshold: f64,
    /// Fewest present values a per-feature detector needs (default: 2).
    pub min_samples: usize,
    /// Attach per-detector scores to flagged records (default: true).
    pub include_detector_scores: bool,
    /// Run detectors on the rayon pool (default: true).
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            detectors: DetectorKind::default_set(),
            targets: None,
            aggregation: FeatureAggregation::default(),
            zscore: ZScoreConfig::default(),
            iqr: IQRConfig::default(),
            isolation: IsolationConfig::default(),
            rolling: RollingConfig::default(),
            weights: EnsembleWeights::default(),
            threshold: 0.7,
            min_samples: 2,
            include_detector_scores: true,
            parallel: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a single detector; its scores become the combined scores.
    pub fn single(kind: DetectorKind) -> Self {
        Self::default()
            .with_detectors(vec![kind])
            .with_weights(EnsembleWeights::empty().with(kind, 1.0))
    }

    pub fn with_detectors(mut self, detectors: Vec<DetectorKind>) -> Self {
        self.detectors = detectors;
        self
    }

    /// Select detectors by name, accepting the usual aliases.
    pub fn with_detector_names<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        self.detectors = names
            .iter()
            .map(|n| n.as_ref().parse())
            .collect::<Result<Vec<DetectorKind>>>()?;
        Ok(self)
    }

    pub fn with_targets<S: Into<String>>(mut self, targets: impl IntoIterator<Item = S>) -> Self {
        self.targets = Some(targets.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_weights(mut self, weights: EnsembleWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_aggregation(mut self, aggregation: FeatureAggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Configured detectors with duplicates removed, first occurrence kept.
    pub fn selected_detectors(&self) -> Vec<DetectorKind> {
        let mut selected = Vec::with_capacity(self.detectors.len());
        for &kind in &self.detectors {
            if !selected.contains(&kind) {
                selected.push(kind);
            }
        }
        selected
    }

    /// Check every parameter before any detector runs.
    pub fn validate(&self) -> Result<()> {
        if self.detectors.is_empty() {
            return Err(AnomalyError::invalid_parameter(
                "detectors",
                "at least one detector is required",
            ));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(AnomalyError::invalid_parameter(
                "threshold",
                "must be in [0, 1]",
            ));
        }
        nonzero("min_samples", self.min_samples)?;
        if let Some(targets) = &self.targets {
            if targets.is_empty() {
                return Err(AnomalyError::invalid_parameter(
                    "targets",
                    "must name at least one feature when set",
                ));
            }
        }
        self.weights.validate()?;
        self.zscore.validate()?;
        self.iqr.validate()?;
        self.isolation.validate()?;
        self.rolling.validate()
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AnomalyError::invalid_parameter(name, "must be positive"))
    }
}

fn nonzero(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        Err(AnomalyError::invalid_parameter(name, "must be positive"))
    } else {
        Ok(())
    }
}
