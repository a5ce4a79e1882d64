use crate::na::NA;

/// Period-over-period percentage change
///
/// `growth[0]` is always NA. Later positions are NA when either value is
/// missing or when the base lies within `tolerance` of zero; transitions
/// from a near-zero base are discarded rather than reported as unbounded
/// growth.
pub fn pct_change(values: &[NA<f64>], tolerance: f64) -> Vec<NA<f64>> {
    let mut growth = Vec::with_capacity(values.len());
    if values.is_empty() {
        return growth;
    }

    growth.push(NA::NA);
    for pair in values.windows(2) {
        growth.push(growth_between(pair[0], pair[1], tolerance));
    }
    growth
}

/// Growth in percent from `prev` to `curr`
pub fn growth_between(prev: NA<f64>, curr: NA<f64>, tolerance: f64) -> NA<f64> {
    if !*prev.map(|base| base.abs() >= tolerance).value_or(&false) {
        return NA::NA;
    }

    // a zero base still divides to NA when the tolerance is zero
    ((curr - prev) / prev * NA::Value(100.0)).and_then(NA::from_f64)
}
