//! Per-entity annual growth analytics with explicit missing values
//!
//! Observations are regularized into gapless annual series, then growth
//! rates and z-scores are derived once per dataset. Views over a selection
//! of entities and years, optionally smoothed, are answered by pure queries.
//!
//! ```rust
//! use growthrs::{GrowthPipeline, Observation};
//!
//! let pipeline = GrowthPipeline::new(vec![
//!     Observation::new("Testland", 2020, 100.0),
//!     Observation::new("Testland", 2021, 120.0),
//!     Observation::new("Testland", 2022, 144.0),
//! ]);
//!
//! let view = pipeline.query(["Testland"], (2020, 2022), Some(3)).unwrap();
//! assert_eq!(view.rows().len(), 3);
//! ```

pub mod config;
pub mod error;
pub mod io;
pub mod na;
pub mod pipeline;
pub mod series;
pub mod stats;
pub mod temporal;

// Re-export commonly used types
pub use config::{ColumnConfig, PipelineConfig};
pub use error::{Error, Result};
pub use na::NA;
pub use pipeline::{
    DerivedRow, DerivedTable, EmptyReason, GrowthPipeline, ViewFrame, ViewQuery, ViewResult,
    ViewRow, YearRange,
};
pub use series::{Observation, RegularSeries};
pub use temporal::{Regularizer, SmoothingWindow};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
