//! Pipeline configuration
//!
//! Every field has a default, so an empty TOML or YAML document is a valid
//! configuration. Numeric conventions that the analytics depend on (the
//! near-zero growth base and the outlier threshold) live here rather than as
//! scattered constants.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Bases with an absolute value below this produce a missing growth rate
pub const DEFAULT_NEAR_ZERO_TOLERANCE: f64 = 1e-3;

/// `|z|` above this marks a growth value as an outlier
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 2.5;

/// Smoothing width applied by the default view
pub const DEFAULT_SMOOTHING_WINDOW: usize = 3;

/// How many years the default view reaches back from the latest period
pub const DEFAULT_LOOKBACK_YEARS: i32 = 30;

/// How many entities the default view selects
pub const DEFAULT_SELECTION_SIZE: usize = 5;

/// Column names of the long-format input table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Entity identifier column
    pub entity: String,
    /// Period column (year or date)
    pub period: String,
    /// Numeric value column
    pub value: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        ColumnConfig {
            entity: "Country Name".to_string(),
            period: "Year".to_string(),
            value: "Value".to_string(),
        }
    }
}

/// Settings for building a pipeline and its default view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub near_zero_tolerance: f64,
    pub outlier_threshold: f64,
    pub default_smoothing_window: usize,
    pub default_lookback_years: i32,
    pub default_selection_size: usize,
    pub columns: ColumnConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            near_zero_tolerance: DEFAULT_NEAR_ZERO_TOLERANCE,
            outlier_threshold: DEFAULT_OUTLIER_THRESHOLD,
            default_smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            default_lookback_years: DEFAULT_LOOKBACK_YEARS,
            default_selection_size: DEFAULT_SELECTION_SIZE,
            columns: ColumnConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.toml`, `.yaml` or `.yml` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            other => Err(Error::InvalidConfig(format!(
                "unsupported configuration format: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> Result<()> {
        if !self.near_zero_tolerance.is_finite() || self.near_zero_tolerance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "near_zero_tolerance must be finite and non-negative, got {}",
                self.near_zero_tolerance
            )));
        }

        validate_threshold(self.outlier_threshold)?;

        if self.default_smoothing_window == 0 {
            return Err(Error::InvalidWindow(0));
        }

        if self.default_lookback_years < 0 {
            return Err(Error::InvalidConfig(format!(
                "default_lookback_years must be non-negative, got {}",
                self.default_lookback_years
            )));
        }

        for (name, column) in [
            ("entity", &self.columns.entity),
            ("period", &self.columns.period),
            ("value", &self.columns.value),
        ] {
            if column.trim().is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "{} column name must not be empty",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// Outlier thresholds must be finite and strictly positive
pub(crate) fn validate_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "outlier threshold must be finite and positive, got {}",
            threshold
        )));
    }
    Ok(())
}
