use crate::na::{self, NA};

/// Standard deviations at or below this are treated as zero
pub const ZERO_VARIANCE_TOLERANCE: f64 = 1e-8;

/// Mean and population standard deviation of the present values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl MomentStats {
    /// Compute over the present values; `None` when there are none
    pub fn compute(values: &[NA<f64>]) -> Option<Self> {
        let count = na::present(values).count();
        if count == 0 {
            return None;
        }

        let mean = na::present(values).sum::<f64>() / count as f64;
        let variance = na::present(values)
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / count as f64;

        Some(MomentStats {
            count,
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// Whether z-scores against these statistics are meaningful
    pub fn is_degenerate(&self) -> bool {
        self.count < 2 || !self.std_dev.is_finite() || self.std_dev <= ZERO_VARIANCE_TOLERANCE
    }
}

/// Z-score of each present value against the series' own statistics
///
/// Every output is NA when fewer than two values are present or the
/// standard deviation is zero or non-finite. Missing inputs stay missing.
pub fn zscore(values: &[NA<f64>]) -> Vec<NA<f64>> {
    let stats = match MomentStats::compute(values) {
        Some(stats) if !stats.is_degenerate() => stats,
        _ => return vec![NA::NA; values.len()],
    };

    values
        .iter()
        .map(|&g| ((g - NA::Value(stats.mean)) / NA::Value(stats.std_dev)).and_then(NA::from_f64))
        .collect()
}

/// Whether a z-score lies beyond `threshold` in magnitude; NA never does
pub fn is_outlier(z: NA<f64>, threshold: f64) -> bool {
    match z {
        NA::Value(v) => v.abs() > threshold,
        NA::NA => false,
    }
}
