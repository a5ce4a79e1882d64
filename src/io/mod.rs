//! CSV ingestion and export
//!
//! Thin adapters between files and the pipeline. Coercion rules live in
//! `series`; this module only locates columns and counts what it drops.

pub mod csv;
pub mod wide;

pub use self::csv::{observations_from_reader, read_observations, write_derived_csv, write_derived_csv_file};
pub use self::wide::{melt_wide_csv, read_wide_csv};
