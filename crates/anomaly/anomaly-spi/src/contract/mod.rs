//! Contract definitions for anomaly scoring.
//!
//! This module contains trait definitions that detectors must implement.

mod detector;

pub use detector::{ColumnScore, ColumnScorer, Detection, Detector};
