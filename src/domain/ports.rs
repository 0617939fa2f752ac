use crate::domain::market::{PricePoint, StockDirectory};
use anyhow::Result;
use async_trait::async_trait;

/// A source of stock listings and prices
#[async_trait]
pub trait StockPriceService: Send + Sync {
    /// All listings the source knows about, in source order.
    async fn list_stocks(&self) -> Result<StockDirectory>;

    /// Most recent price for `ticker`.
    async fn latest_price(&self, ticker: &str) -> Result<PricePoint>;

    /// Prices for `ticker` over the last `minutes` minutes, in source order.
    async fn price_history(&self, ticker: &str, minutes: u32) -> Result<Vec<PricePoint>>;
}
