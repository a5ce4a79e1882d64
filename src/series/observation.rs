use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::na::NA;

/// A single raw `(entity, period, value)` record
///
/// Duplicate periods and missing values are kept as-is; the regularizer
/// decides what they mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    entity: String,
    period: i32,
    value: NA<f64>,
}

impl Observation {
    /// Create an observation; non-finite values become NA
    pub fn new<S, V>(entity: S, period: i32, value: V) -> Self
    where
        S: Into<String>,
        V: Into<NA<f64>>,
    {
        let value = match value.into() {
            NA::Value(v) => NA::from_f64(v),
            NA::NA => NA::NA,
        };

        Observation {
            entity: entity.into(),
            period,
            value,
        }
    }

    /// Create an observation with a missing value
    pub fn missing<S: Into<String>>(entity: S, period: i32) -> Self {
        Self::new(entity, period, NA::NA)
    }

    /// Build from untyped fields
    ///
    /// Returns `None` when the period cannot be coerced to a year, since such
    /// a record has no place on the time axis. An uncoercible value only
    /// makes the value missing.
    pub fn from_raw(entity: &str, period: &str, value: &str) -> Option<Self> {
        let period = coerce_period(period)?;
        Some(Self::new(entity.trim(), period, coerce_value(value)))
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn period(&self) -> i32 {
        self.period
    }

    pub fn value(&self) -> NA<f64> {
        self.value
    }
}

/// Earliest year a period field may name
pub const MIN_YEAR: i32 = 1000;

/// Latest year a period field may name
pub const MAX_YEAR: i32 = 9999;

/// Coerce a period field to a calendar year
///
/// Accepts integer years (`2019`), integral floats (`2019.0`), ISO dates
/// (`2019-06-30`), naive timestamps and RFC 3339 timestamps; the date forms
/// are truncated to their year. Only four-digit years are accepted, so a
/// compact date such as `20190101` is a coercion failure rather than year
/// 20,190,101.
pub fn coerce_period(raw: &str) -> Option<i32> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(year) = s.parse::<i32>() {
        return four_digit_year(year);
    }

    if let Ok(f) = s.parse::<f64>() {
        if f.fract() == 0.0 && f >= f64::from(MIN_YEAR) && f <= f64::from(MAX_YEAR) {
            return Some(f as i32);
        }
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return four_digit_year(date.year());
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return four_digit_year(dt.year());
        }
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .and_then(|dt| four_digit_year(dt.year()))
}

fn four_digit_year(year: i32) -> Option<i32> {
    (MIN_YEAR..=MAX_YEAR).contains(&year).then_some(year)
}

/// Coerce a value field to a float, anything unparseable or non-finite is NA
pub fn coerce_value(raw: &str) -> NA<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) => NA::from_f64(v),
        Err(_) => NA::NA,
    }
}
