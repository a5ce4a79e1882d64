//! Per-series statistics: growth rates and z-score outlier detection

mod growth;
mod zscore;

pub use self::growth::{growth_between, pct_change};
pub use self::zscore::{is_outlier, zscore, MomentStats, ZERO_VARIANCE_TOLERANCE};
