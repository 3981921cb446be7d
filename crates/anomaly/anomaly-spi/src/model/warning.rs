//! Non-fatal detector degradations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DetectorKind;

/// Why a detector could not produce meaningful scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DegradationReason {
    /// Every present value of the feature is identical.
    ConstantFeature,
    /// The interquartile range is zero.
    ZeroSpread,
    /// Too few present values to fit.
    InsufficientSamples { required: usize, got: usize },
    /// The feature is named but never present.
    AllMissing,
    /// The fitted model separated every record equally.
    DegenerateScores,
}

impl fmt::Display for DegradationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConstantFeature => write!(f, "feature is constant"),
            Self::ZeroSpread => write!(f, "interquartile range is zero"),
            Self::InsufficientSamples { required, got } => {
                write!(f, "insufficient samples: required {required}, got {got}")
            }
            Self::AllMissing => write!(f, "no present values"),
            Self::DegenerateScores => write!(f, "all separation values are equal"),
        }
    }
}

/// A degradation recorded in the report instead of failing the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradationWarning {
    pub kind: DetectorKind,
    /// Feature the degradation applies to; `None` for whole-dataset detectors.
    pub feature: Option<String>,
    #[serde(flatten)]
    pub reason: DegradationReason,
}

impl DegradationWarning {
    pub fn new(kind: DetectorKind, feature: Option<&str>, reason: DegradationReason) -> Self {
        Self {
            kind,
            feature: feature.map(str::to_string),
            reason,
        }
    }
}

impl fmt::Display for DegradationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.feature {
            Some(feature) => write!(f, "{} on '{}': {}", self.kind, feature, self.reason),
            None => write!(f, "{}: {}", self.kind, self.reason),
        }
    }
}
