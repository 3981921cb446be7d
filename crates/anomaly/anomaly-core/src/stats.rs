//! Descriptive statistics shared by the detectors and the reporter.

use anomaly_spi::ScoreStats;

/// Location and spread computed on data divided by its largest magnitude.
///
/// Sums over the rescaled values stay within `[-n, n]`, so columns holding
/// values near `f64::MAX` do not overflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    scale: f64,
    mean: f64,
    std: f64,
}

impl Moments {
    /// Mean and sample (n - 1) standard deviation. `None` below two values.
    pub fn sample(data: &[f64]) -> Option<Self> {
        if data.len() < 2 {
            return None;
        }
        Some(Self::with_denominator(data, data.len() - 1))
    }

    /// Mean and population standard deviation. `None` when empty.
    pub fn population(data: &[f64]) -> Option<Self> {
        if data.is_empty() {
            return None;
        }
        Some(Self::with_denominator(data, data.len()))
    }

    fn with_denominator(data: &[f64], denominator: usize) -> Self {
        let scale = magnitude(data);
        let n = data.len() as f64;
        let mean = data.iter().map(|x| x / scale).sum::<f64>() / n;
        let ss: f64 = data.iter().map(|x| (x / scale - mean).powi(2)).sum();
        Self {
            scale,
            mean,
            std: (ss / denominator as f64).sqrt(),
        }
    }

    pub fn mean(&self) -> f64 {
        self.mean * self.scale
    }

    /// Standard deviation in data units; may saturate to infinity.
    pub fn std(&self) -> f64 {
        self.std * self.scale
    }

    pub fn has_spread(&self) -> bool {
        self.std > 0.0
    }

    /// `(x - mean) / std`, computed on the rescaled values.
    pub fn standardize(&self, x: f64) -> f64 {
        (x / self.scale - self.mean) / self.std
    }
}

/// Largest absolute value, or 1 when that is zero or not finite.
pub fn magnitude(data: &[f64]) -> f64 {
    let max = data.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    if max > 0.0 && max.is_finite() {
        max
    } else {
        1.0
    }
}

pub fn mean(data: &[f64]) -> Option<f64> {
    Moments::population(data).map(|m| m.mean())
}

/// Sample standard deviation (n - 1 denominator). `None` below two values.
pub fn sample_std(data: &[f64]) -> Option<f64> {
    Moments::sample(data).map(|m| m.std())
}

/// Whether every value is identical.
pub fn is_constant(data: &[f64]) -> bool {
    match data.first() {
        Some(&first) => data.iter().all(|&x| x == first),
        None => true,
    }
}

pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Quantile of sorted data with linear interpolation between order statistics.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn quantile(data: &[f64], q: f64) -> Option<f64> {
    quantile_sorted(&sorted(data), q)
}

pub fn median(data: &[f64]) -> Option<f64> {
    quantile(data, 0.5)
}

/// Summary of a score vector; all zeros when empty.
pub fn summarize(scores: &[f64]) -> ScoreStats {
    if scores.is_empty() {
        return ScoreStats::default();
    }
    let sorted = sorted(scores);
    ScoreStats {
        mean: mean(scores).unwrap_or(0.0),
        std: sample_std(scores).unwrap_or(0.0),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        median: quantile_sorted(&sorted, 0.5).unwrap_or(0.0),
    }
}
