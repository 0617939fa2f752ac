//! Statistics engine: mean, sample standard deviation and Pearson
//! correlation over time-aligned price series.
//!
//! Everything here is a pure function; there is no state and no I/O, so the
//! functions are safe to call from any thread.

pub mod correlation;
pub mod stats;

pub use correlation::{CorrelationBand, CorrelationMatrix, compute_correlation_matrix, correlation_matrix};
pub use stats::{SeriesStatistics, compute_statistics, mean, pearson_correlation, sample_std_dev};
