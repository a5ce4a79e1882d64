use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::config::ColumnConfig;
use crate::error::{Error, Result};
use crate::na::NA;
use crate::pipeline::DerivedTable;
use crate::series::{coerce_period, coerce_value, Observation};

/// Column order of an exported derived table
pub const DERIVED_COLUMNS: [&str; 5] = ["entity", "period", "value", "growth", "z_score"];

/// Read long-format observations from a CSV file
pub fn read_observations<P: AsRef<Path>>(path: P, columns: &ColumnConfig) -> Result<Vec<Observation>> {
    let file = File::open(path.as_ref())?;
    observations_from_reader(file, columns)
}

/// Read long-format observations from any reader
///
/// The header row must contain the configured entity, period and value
/// columns; other columns are ignored. Values that do not parse become NA.
/// Rows without an entity or with a period that cannot be coerced to a
/// year are dropped and counted in a warning.
pub fn observations_from_reader<R: Read>(reader: R, columns: &ColumnConfig) -> Result<Vec<Observation>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let entity_idx = column_index(&headers, &columns.entity)?;
    let period_idx = column_index(&headers, &columns.period)?;
    let value_idx = column_index(&headers, &columns.value)?;

    let mut observations = Vec::new();
    let mut dropped = 0usize;

    for result in rdr.records() {
        let record = result?;

        let entity = record.get(entity_idx).unwrap_or("");
        let period = record.get(period_idx).and_then(coerce_period);

        match period {
            Some(period) if !entity.is_empty() => {
                let value = record.get(value_idx).map(coerce_value).unwrap_or(NA::NA);
                observations.push(Observation::new(entity, period, value));
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        log::warn!(
            "dropped {} row(s) with a missing entity or an unparseable '{}' column",
            dropped,
            columns.period
        );
    }
    log::debug!("read {} observations", observations.len());

    Ok(observations)
}

/// Position of a named column in the header row
pub(crate) fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
}

/// Write a derived table as CSV; missing values become empty fields
pub fn write_derived_csv<W: Write>(table: &DerivedTable, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    wtr.write_record(DERIVED_COLUMNS)?;
    for row in table.rows() {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write a derived table to a CSV file
pub fn write_derived_csv_file<P: AsRef<Path>>(table: &DerivedTable, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_derived_csv(table, file)
}
