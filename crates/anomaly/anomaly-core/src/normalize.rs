//! Score normalization onto `[0, 1]`.
//!
//! Threshold-style detectors divide their raw statistic by the configured
//! threshold and clip. The isolation detector rescales its separation values
//! by the batch's own minimum and maximum, so the same raw value can map to a
//! different score in another batch.

/// Clip into `[0, 1]`, mapping NaN to 0.
pub fn clip_unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// `min(|raw| / threshold, 1)`.
pub fn threshold_clip(raw: f64, threshold: f64) -> f64 {
    clip_unit(raw.abs() / threshold)
}

/// Min-max rescale with inverted sign: the lowest raw value maps to 1.0 and
/// the highest to 0.0.
///
/// Returns `None` when the values are degenerate (empty, all equal, or not finite).
pub fn min_max_inverted(raw: &[f64]) -> Option<Vec<f64>> {
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if raw.is_empty() || !range.is_finite() || range <= 0.0 {
        return None;
    }
    Some(raw.iter().map(|&x| clip_unit(1.0 - (x - min) / range)).collect())
}
