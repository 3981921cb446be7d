//! Detector implementations.
//!
//! - [`ZScoreDetector`]: distance from the mean in standard deviations
//! - [`IQRDetector`]: distance outside the interquartile fences
//! - [`RollingDetector`]: residual against a centered rolling window
//! - [`IsolationDetector`]: isolation forest over all numeric features
//!
//! The first three score one column at a time and run through
//! [`FeatureDetector`], which handles target selection and aggregation.

mod feature;
mod iqr;
mod isolation;
mod rolling;
mod zscore;

pub use feature::{aggregate, FeatureDetector};
pub use iqr::{Fences, IQRDetector};
pub use isolation::IsolationDetector;
pub use rolling::{RollingDetector, STD_EPSILON};
pub use zscore::ZScoreDetector;

use anomaly_api::EngineConfig;
use anomaly_spi::{Detector, DetectorKind};

/// Build the detector for `kind` from the engine configuration.
pub fn build_detector(kind: DetectorKind, config: &EngineConfig) -> Box<dyn Detector> {
    match kind {
        DetectorKind::PointwiseStatistical => Box::new(
            per_feature(
                ZScoreDetector::from_config(&config.zscore).with_min_samples(config.min_samples),
                config,
            ),
        ),
        DetectorKind::RangeBased => Box::new(per_feature(
            IQRDetector::from_config(&config.iqr).with_min_samples(config.min_samples),
            config,
        )),
        DetectorKind::MultivariateIsolation => {
            Box::new(IsolationDetector::new(config.isolation.clone()))
        }
        DetectorKind::TemporalRolling => Box::new(
            per_feature(
                RollingDetector::from_config(&config.rolling).with_min_samples(config.min_samples),
                config,
            )
                .with_order_by(config.rolling.order_by.clone()),
        ),
    }
}

fn per_feature<S: anomaly_spi::ColumnScorer>(scorer: S, config: &EngineConfig) -> FeatureDetector<S> {
    FeatureDetector::new(scorer)
        .with_targets(config.targets.clone())
        .with_aggregation(config.aggregation)
}
