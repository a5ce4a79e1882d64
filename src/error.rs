use thiserror::Error;

/// Error type for the growth pipeline
///
/// Coercion failures, degenerate statistics and empty query results are not
/// errors; they surface as `NA` values or as `ViewResult::Empty`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid smoothing window: {0} (must be at least 1)")]
    InvalidWindow(i64),

    #[error("Inverted year range: start {start} is after end {end}")]
    InvertedYearRange { start: i32, end: i32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid regular expression: {0}")]
    InvalidRegex(String),

    #[error("I/O error")]
    Io(#[source] std::io::Error),

    #[error("CSV error")]
    Csv(#[source] csv::Error),

    #[error("JSON error")]
    Json(#[source] serde_json::Error),

    #[error("TOML error")]
    Toml(#[source] toml::de::Error),

    #[error("YAML error")]
    Yaml(#[source] serde_yaml::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidRegex(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml(err)
    }
}
