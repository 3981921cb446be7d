//! Detector identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnomalyError;

/// What a detector needs from the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorCapability {
    /// Scores one feature column at a time.
    PerFeature,
    /// Scores whole records using every numeric feature.
    Multivariate,
    /// Scores one feature column in chronological order.
    TimeOrdered,
}

/// Scoring strategy tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    /// Z-score against the feature mean.
    #[serde(alias = "zscore", alias = "z_score")]
    PointwiseStatistical,
    /// Distance outside the interquartile fences.
    #[serde(alias = "iqr")]
    RangeBased,
    /// Isolation forest over all numeric features.
    #[serde(alias = "isolation_forest", alias = "isolation")]
    MultivariateIsolation,
    /// Residual against a centered rolling window.
    #[serde(alias = "time_series", alias = "rolling")]
    TemporalRolling,
}

impl DetectorKind {
    pub const ALL: [DetectorKind; 4] = [
        DetectorKind::PointwiseStatistical,
        DetectorKind::RangeBased,
        DetectorKind::MultivariateIsolation,
        DetectorKind::TemporalRolling,
    ];

    /// The ensemble run when no detector set is configured.
    pub fn default_set() -> Vec<DetectorKind> {
        vec![
            DetectorKind::PointwiseStatistical,
            DetectorKind::RangeBased,
            DetectorKind::MultivariateIsolation,
        ]
    }

    pub fn capability(self) -> DetectorCapability {
        match self {
            DetectorKind::PointwiseStatistical | DetectorKind::RangeBased => {
                DetectorCapability::PerFeature
            }
            DetectorKind::MultivariateIsolation => DetectorCapability::Multivariate,
            DetectorKind::TemporalRolling => DetectorCapability::TimeOrdered,
        }
    }

    /// Canonical snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            DetectorKind::PointwiseStatistical => "pointwise_statistical",
            DetectorKind::RangeBased => "range_based",
            DetectorKind::MultivariateIsolation => "multivariate_isolation",
            DetectorKind::TemporalRolling => "temporal_rolling",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectorKind {
    type Err = AnomalyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pointwise_statistical" | "zscore" | "z_score" => Ok(DetectorKind::PointwiseStatistical),
            "range_based" | "iqr" => Ok(DetectorKind::RangeBased),
            "multivariate_isolation" | "isolation_forest" | "isolation" => {
                Ok(DetectorKind::MultivariateIsolation)
            }
            "temporal_rolling" | "time_series" | "rolling" => Ok(DetectorKind::TemporalRolling),
            _ => Err(AnomalyError::UnknownDetector {
                name: s.to_string(),
            }),
        }
    }
}
