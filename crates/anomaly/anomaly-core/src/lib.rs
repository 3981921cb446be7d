//! Anomaly Scoring Core
//!
//! Implementations of the scoring pipeline:
//! - Detectors (`ZScoreDetector`, `IQRDetector`, `IsolationDetector`, `RollingDetector`)
//! - The isolation forest model behind the multivariate detector
//! - Score normalization helpers and descriptive statistics
//! - The ensemble combiner, the selector, and the `AnomalyEngine` tying them together

mod detectors;
mod engine;
mod ensemble;
mod forest;
pub mod normalize;
mod selector;
pub mod stats;

pub use detectors::*;
pub use engine::{analyze, AnomalyEngine};
pub use ensemble::{combine, CombinedScores, EnsembleCombiner};
pub use forest::{average_path_length, IsolationForest};
pub use selector::AnomalySelector;
