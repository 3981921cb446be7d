//! Anomaly scoring error types.

use thiserror::Error;

/// Which side of the run an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The dataset cannot be scored at all.
    Input,
    /// The configuration was rejected before execution.
    Configuration,
}

/// Anomaly scoring errors.
///
/// Only fatal conditions are errors. A detector that cannot produce
/// meaningful scores degrades and reports a warning instead.
#[derive(Debug, Error)]
pub enum AnomalyError {
    #[error("Empty dataset: at least one record is required")]
    EmptyDataset,

    #[error("No numeric feature available for scoring")]
    NoNumericFeatures,

    #[error("Unknown feature: {name}")]
    UnknownFeature { name: String },

    #[error("Unknown detector: {name}")]
    UnknownDetector { name: String },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl AnomalyError {
    /// Shorthand for an [`AnomalyError::InvalidParameter`].
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Classify the error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyDataset | Self::NoNumericFeatures | Self::UnknownFeature { .. } => {
                ErrorCategory::Input
            }
            Self::UnknownDetector { .. } | Self::InvalidParameter { .. } => {
                ErrorCategory::Configuration
            }
        }
    }
}

/// Result type for anomaly scoring operations.
pub type Result<T> = std::result::Result<T, AnomalyError>;
