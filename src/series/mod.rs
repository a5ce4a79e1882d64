//! Observation and regular-series data model

mod observation;
mod regular;

pub use self::observation::{coerce_period, coerce_value, Observation, MAX_YEAR, MIN_YEAR};
pub use self::regular::RegularSeries;
