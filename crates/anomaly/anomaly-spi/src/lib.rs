//! Anomaly Scoring Service Provider Interface
//!
//! Defines the detector contracts, the tabular data model, score vectors,
//! the report shape, and the error type.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{ColumnScore, ColumnScorer, Detection, Detector};
pub use error::{AnomalyError, ErrorCategory, Result};
pub use model::{
    AnomalyRateLevel, Dataset, DegradationReason, DegradationWarning, DetectorCapability,
    DetectorKind, DetectorScore, FeatureColumn, RankedRecord, Record, ScoreReport, ScoreStats,
    ScoreVector,
};
