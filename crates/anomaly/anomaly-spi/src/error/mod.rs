//! Error types for anomaly scoring.
//!
//! This module contains the error type, its category, and the Result alias.

mod anomaly_error;

pub use anomaly_error::{AnomalyError, ErrorCategory, Result};
