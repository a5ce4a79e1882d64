//! Centered moving average that skips missing values

use std::fmt;

use crate::error::{Error, Result};
use crate::na::NA;

/// Validated width of a centered smoothing window
///
/// The window around position `i` spans `floor(W/2)` positions before and
/// `ceil(W/2) - 1` after, which is the alignment of a "same"-length
/// convolution. Odd widths are symmetric; even widths lean backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SmoothingWindow(usize);

impl SmoothingWindow {
    /// Validate a caller-supplied width; zero and negative widths are rejected
    pub fn new(width: i64) -> Result<Self> {
        if width < 1 {
            return Err(Error::InvalidWindow(width));
        }
        usize::try_from(width)
            .map(SmoothingWindow)
            .map_err(|_| Error::InvalidWindow(width))
    }

    pub fn width(&self) -> usize {
        self.0
    }

    /// Positions included before the center
    pub fn before(&self) -> usize {
        self.0 / 2
    }

    /// Positions included after the center
    pub fn after(&self) -> usize {
        self.0 - 1 - self.before()
    }
}

impl TryFrom<usize> for SmoothingWindow {
    type Error = Error;

    fn try_from(width: usize) -> Result<Self> {
        if width == 0 {
            return Err(Error::InvalidWindow(0));
        }
        Ok(SmoothingWindow(width))
    }
}

impl fmt::Display for SmoothingWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Centered windowed mean over a series with gaps
///
/// Only present values count, in the sum and in the divisor alike, so a
/// sparse window averages what it has instead of drifting toward zero. A
/// window with no present value yields NA. The output has the same length
/// as the input; windows are truncated at both ends.
pub fn centered_mean(values: &[NA<f64>], window: SmoothingWindow) -> Vec<NA<f64>> {
    let n = values.len();
    let mut result = Vec::with_capacity(n);

    for i in 0..n {
        let lo = i.saturating_sub(window.before());
        let hi = (i + window.after()).min(n.saturating_sub(1));

        let present = values[lo..=hi].iter().filter(|v| v.is_value());
        let count = present.clone().count();
        let sum = present.fold(NA::Value(0.0), |acc, &v| acc + v);

        // an all-missing window divides by zero and stays NA
        result.push((sum / NA::Value(count as f64)).and_then(NA::from_f64));
    }

    result
}
