// Market data domain
pub mod market;

// Statistics engine
pub mod statistics;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
