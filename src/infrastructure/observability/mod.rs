//! Observability for Stockboard
//!
//! Metrics are kept in a Prometheus registry. The headless server exposes them
//! at `/metrics`, and [`MetricsReporter`] periodically pushes a JSON snapshot
//! to stdout for log shippers.

pub mod metrics;
pub mod reporter;

pub use metrics::Metrics;
pub use reporter::MetricsReporter;
