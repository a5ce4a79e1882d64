use std::collections::BTreeMap;

use crate::na::NA;
use crate::series::{Observation, RegularSeries};

/// Turns raw observations into one gapless annual series per entity
///
/// Missing years, and observed years whose value is missing, carry the most
/// recent prior present value forward. Nothing is interpolated; a leading
/// run before the first present value stays NA.
#[derive(Debug, Clone, Default)]
pub struct Regularizer {
    /// Raw `(period, value)` records per entity, in input order
    groups: BTreeMap<String, Vec<(i32, NA<f64>)>>,
}

impl Regularizer {
    pub fn new() -> Self {
        Regularizer {
            groups: BTreeMap::new(),
        }
    }

    /// Group a batch of observations by entity
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut regularizer = Regularizer::new();
        for obs in observations {
            regularizer.push(obs);
        }
        regularizer
    }

    /// Add one observation
    pub fn push(&mut self, obs: Observation) {
        self.groups
            .entry(obs.entity().to_string())
            .or_default()
            .push((obs.period(), obs.value()));
    }

    /// Number of distinct entities seen
    pub fn entity_count(&self) -> usize {
        self.groups.len()
    }

    /// Regularize every entity, ordered by entity name
    pub fn regularize(&self) -> Vec<RegularSeries> {
        self.groups
            .iter()
            .map(|(entity, records)| regularize_records(entity, records))
            .collect()
    }
}

/// Regularize one entity's records
///
/// When a period occurs more than once the last present value in input
/// order wins; a period whose duplicates are all missing is missing.
pub fn regularize_records(entity: &str, records: &[(i32, NA<f64>)]) -> RegularSeries {
    let mut by_period: BTreeMap<i32, NA<f64>> = BTreeMap::new();
    for &(period, value) in records {
        match value {
            NA::Value(_) => {
                by_period.insert(period, value);
            }
            NA::NA => {
                by_period.entry(period).or_insert(NA::NA);
            }
        }
    }

    let duplicates = records.len() - by_period.len();
    if duplicates > 0 {
        log::debug!(
            "{}: collapsed {} duplicate period record(s)",
            entity,
            duplicates
        );
    }

    let (first, last) = match (by_period.keys().next(), by_period.keys().next_back()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return RegularSeries::new(entity, 0, Vec::new()),
    };

    let span = (i64::from(last) - i64::from(first) + 1) as usize;
    let mut values = Vec::with_capacity(span);
    let mut carried: NA<f64> = NA::NA;

    for period in first..=last {
        if let Some(&NA::Value(v)) = by_period.get(&period) {
            carried = NA::Value(v);
        }
        values.push(carried);
    }

    let series = RegularSeries::new(entity, first, values);
    log::debug!(
        "{}: {} period(s) from {} to {}, {} present after carry-forward",
        entity,
        series.len(),
        first,
        last,
        series.value_count()
    );
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_period_keeps_last_present_value() {
        let records = vec![
            (2000, NA::Value(1.0)),
            (2000, NA::Value(2.0)),
            (2000, NA::NA),
            (2001, NA::Value(3.0)),
        ];
        let series = regularize_records("A", &records);
        assert_eq!(series.values(), &[NA::Value(2.0), NA::Value(3.0)]);
    }

    #[test]
    fn test_empty_records_give_empty_series() {
        let series = regularize_records("A", &[]);
        assert!(series.is_empty());
        assert_eq!(series.start_period(), None);
    }
}
