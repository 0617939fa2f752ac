// Market data domain
pub mod directory;
pub mod interval;
pub mod price;

pub use directory::{StockDirectory, StockListing};
pub use interval::TimeInterval;
pub use price::{PricePoint, PriceSeries};
