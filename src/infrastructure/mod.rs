pub mod core;
pub mod evaluation;
pub mod mock;
pub mod observability;

pub use evaluation::EvaluationApiClient;
pub use mock::MockStockService;
