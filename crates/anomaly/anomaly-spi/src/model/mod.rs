//! Data models for anomaly scoring.
//!
//! This module contains the dataset view, detector tags, score vectors,
//! degradation warnings and the final report.

mod dataset;
mod detector_kind;
mod score_report;
mod score_vector;
mod warning;

pub use dataset::{Dataset, FeatureColumn, Record};
pub use detector_kind::{DetectorCapability, DetectorKind};
pub use score_report::{AnomalyRateLevel, DetectorScore, RankedRecord, ScoreReport, ScoreStats};
pub use score_vector::ScoreVector;
pub use warning::{DegradationReason, DegradationWarning};
