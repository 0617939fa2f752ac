// Stock data access with provenance tracking
pub mod fallback;

pub use fallback::{DataSource, FallbackStockService, Sourced};
