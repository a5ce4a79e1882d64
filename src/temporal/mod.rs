//! Time-axis operations: annual regularization and centered smoothing

mod regularize;
pub mod window;

pub use self::regularize::{regularize_records, Regularizer};
pub use self::window::{centered_mean, SmoothingWindow};
