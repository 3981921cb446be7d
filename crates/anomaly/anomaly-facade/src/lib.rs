//! Anomaly Scoring Facade
//!
//! Unified re-exports for the anomaly scoring module.
//!
//! This facade provides a single entry point to all anomaly scoring functionality:
//! - `Detector` contract, `Dataset` model and `ScoreReport` from SPI
//! - Configuration types from API
//! - Detector implementations, the ensemble combiner and `AnomalyEngine` from Core
//!
//! ```
//! use anomaly_facade::prelude::*;
//!
//! let mut values: Vec<f64> = (0..50).map(|i| 20.0 + f64::from(i % 4)).collect();
//! values[30] = 400.0;
//!
//! let report = analyze(&Dataset::from_series("latency", &values), &EngineConfig::default())?;
//! assert_eq!(report.anomaly_indices(), vec![30]);
//! # Ok::<(), AnomalyError>(())
//! ```

// Re-export everything from SPI
pub use anomaly_spi::*;

// Re-export everything from API
pub use anomaly_api::*;

// Re-export everything from Core
pub use anomaly_core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{analyze, AnomalyEngine};
    pub use crate::{AnomalyError, Result};
    pub use crate::{Dataset, DetectorKind, Record, ScoreReport};
    pub use crate::{Detector, EngineConfig, EnsembleWeights};
}
