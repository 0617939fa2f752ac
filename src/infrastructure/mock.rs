use crate::config::MockEnvConfig;
use crate::domain::market::{PricePoint, StockDirectory, StockListing};
use crate::domain::ports::StockPriceService;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use tracing::{debug, error};

/// Listings served when the upstream directory is unavailable.
pub const FALLBACK_LISTINGS: [(&str, &str); 10] = [
    ("Apple Inc.", "AAPL"),
    ("Microsoft Corporation", "MSFT"),
    ("Amazon.com, Inc.", "AMZN"),
    ("Alphabet Inc. Class A", "GOOGL"),
    ("Meta Platforms, Inc.", "META"),
    ("Tesla, Inc.", "TSLA"),
    ("Nvidia Corporation", "NVDA"),
    ("Berkshire Hathaway Inc.", "BRKB"),
    ("JPMorgan Chase & Co.", "JPM"),
    ("Johnson & Johnson", "JNJ"),
];

/// Synthetic stock data.
///
/// Prices are uniform in `[base_price, base_price + price_range)`. History
/// points step back from an anchor truncated to the whole minute, so series
/// generated within the same minute share timestamps and can be correlated.
pub struct MockStockService {
    config: MockEnvConfig,
    rng: Mutex<StdRng>,
}

impl MockStockService {
    pub fn new(config: MockEnvConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn directory() -> StockDirectory {
        StockDirectory::new(
            FALLBACK_LISTINGS
                .iter()
                .map(|(name, ticker)| StockListing::new(*name, *ticker))
                .collect(),
        )
    }

    fn random_price(&self) -> f64 {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("MockStockService: rng lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        self.config.base_price + rng.random::<f64>() * self.config.price_range
    }

    /// Newest first, like the original fallback: point `i` is `i * spacing` before the anchor.
    pub fn history_at(&self, anchor: DateTime<Utc>) -> Vec<PricePoint> {
        let anchor = anchor
            .duration_trunc(TimeDelta::minutes(1))
            .unwrap_or(anchor);
        // Stops early rather than panic if the offsets leave chrono's range
        (0..self.config.series_length)
            .map_while(|i| {
                let minutes = i64::try_from(i).ok()?.checked_mul(self.config.spacing_minutes)?;
                let timestamp = anchor.checked_sub_signed(TimeDelta::try_minutes(minutes)?)?;
                Some(PricePoint::new(self.random_price(), timestamp))
            })
            .collect()
    }

    pub fn latest_at(&self, now: DateTime<Utc>) -> PricePoint {
        PricePoint::new(self.random_price(), now)
    }
}

impl Default for MockStockService {
    fn default() -> Self {
        Self::new(MockEnvConfig::default())
    }
}

#[async_trait]
impl StockPriceService for MockStockService {
    async fn list_stocks(&self) -> Result<StockDirectory> {
        Ok(Self::directory())
    }

    async fn latest_price(&self, ticker: &str) -> Result<PricePoint> {
        debug!("MockStockService: latest price for {}", ticker);
        Ok(self.latest_at(Utc::now()))
    }

    async fn price_history(&self, ticker: &str, minutes: u32) -> Result<Vec<PricePoint>> {
        debug!("MockStockService: {} minute history for {}", minutes, ticker);
        Ok(self.history_at(Utc::now()))
    }
}
