use crate::na::NA;

/// A gapless annual series for one entity
///
/// Holds one value per year from `start` to `start + len - 1`, so periods
/// are strictly increasing by exactly one and never repeat.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularSeries {
    entity: String,
    start: i32,
    values: Vec<NA<f64>>,
}

impl RegularSeries {
    /// Create a series whose first value belongs to `start`
    pub fn new<S: Into<String>>(entity: S, start: i32, values: Vec<NA<f64>>) -> Self {
        RegularSeries {
            entity: entity.into(),
            start,
            values,
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// First period, or `None` for an empty series
    pub fn start_period(&self) -> Option<i32> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.start)
        }
    }

    /// Last period, or `None` for an empty series
    pub fn end_period(&self) -> Option<i32> {
        let offset = self.values.len().checked_sub(1)?;
        i32::try_from(offset)
            .ok()
            .and_then(|offset| self.start.checked_add(offset))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[NA<f64>] {
        &self.values
    }

    /// Periods covered by the series, in order
    pub fn periods(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.values.len()).map(move |i| self.start + i as i32)
    }

    /// Value for a given period
    pub fn get(&self, period: i32) -> Option<NA<f64>> {
        let offset = period.checked_sub(self.start)?;
        usize::try_from(offset)
            .ok()
            .and_then(|i| self.values.get(i))
            .copied()
    }

    /// `(period, value)` pairs in period order
    pub fn iter(&self) -> impl Iterator<Item = (i32, NA<f64>)> + '_ {
        self.periods().zip(self.values.iter().copied())
    }

    /// Number of present values
    pub fn value_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_value()).count()
    }
}
