use csv::ReaderBuilder;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::na::NA;
use crate::series::{coerce_value, Observation};

use super::csv::column_index;

/// Headers that name a year column in a wide table
const YEAR_COLUMN_PATTERN: &str = r"^\d{4}$";

/// Reshape a wide table (one column per year) into long observations
///
/// Year columns are those whose header is exactly four digits; every other
/// column is an identifier and only `entity_column` is kept. Each cell
/// becomes one observation, unparseable cells become NA.
pub fn melt_wide_csv<R: Read>(reader: R, entity_column: &str) -> Result<Vec<Observation>> {
    let year_pattern = Regex::new(YEAR_COLUMN_PATTERN)?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let entity_idx = column_index(&headers, entity_column)?;

    let year_columns: Vec<(usize, i32)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| year_pattern.is_match(h))
        .filter_map(|(i, h)| h.parse::<i32>().ok().map(|year| (i, year)))
        .collect();

    if year_columns.is_empty() {
        log::warn!("no year columns found in wide table");
    }

    let mut observations = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let entity = match record.get(entity_idx) {
            Some(entity) if !entity.is_empty() => entity,
            _ => continue,
        };

        for &(idx, year) in &year_columns {
            let value = record.get(idx).map(coerce_value).unwrap_or(NA::NA);
            observations.push(Observation::new(entity, year, value));
        }
    }

    log::debug!(
        "melted {} year columns into {} observations",
        year_columns.len(),
        observations.len()
    );

    Ok(observations)
}

/// Reshape a wide CSV file into long observations
pub fn read_wide_csv<P: AsRef<Path>>(path: P, entity_column: &str) -> Result<Vec<Observation>> {
    let file = File::open(path.as_ref())?;
    melt_wide_csv(file, entity_column)
}
