use crate::domain::market::{PricePoint, StockDirectory};
use crate::domain::ports::StockPriceService;
use crate::infrastructure::mock::MockStockService;
use crate::infrastructure::observability::Metrics;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Where a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Upstream,
    Fallback,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Upstream => "upstream",
            DataSource::Fallback => "fallback",
        }
    }

    pub fn is_fallback(&self) -> bool {
        *self == DataSource::Fallback
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value tagged with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sourced<T> {
    pub value: T,
    pub source: DataSource,
}

impl<T> Sourced<T> {
    pub fn upstream(value: T) -> Self {
        Self {
            value,
            source: DataSource::Upstream,
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            source: DataSource::Fallback,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            value: f(self.value),
            source: self.source,
        }
    }
}

/// Upstream prices with a synthetic safety net.
///
/// Every call tries the primary source first. Any error is logged, counted
/// and answered with mock data instead, so callers never see a failure.
/// Without a primary (mock mode) everything is served from the mock source.
pub struct FallbackStockService {
    primary: Option<Arc<dyn StockPriceService>>,
    mock: Arc<MockStockService>,
    metrics: Option<Metrics>,
}

impl FallbackStockService {
    pub fn new(
        primary: Option<Arc<dyn StockPriceService>>,
        mock: Arc<MockStockService>,
        metrics: Option<Metrics>,
    ) -> Self {
        Self {
            primary,
            mock,
            metrics,
        }
    }

    pub fn has_upstream(&self) -> bool {
        self.primary.is_some()
    }

    fn record_fallback(&self, endpoint: &str, subject: &str, error: &anyhow::Error) {
        warn!(
            "FallbackStockService: {} failed for {} ({:#}), serving mock data",
            endpoint, subject, error
        );
        if let Some(metrics) = &self.metrics {
            metrics.inc_fallback(endpoint);
        }
    }

    pub async fn stocks(&self) -> Sourced<StockDirectory> {
        let Some(primary) = &self.primary else {
            return Sourced::fallback(MockStockService::directory());
        };
        match primary.list_stocks().await {
            Ok(directory) => Sourced::upstream(directory),
            Err(e) => {
                self.record_fallback("stocks", "directory", &e);
                Sourced::fallback(MockStockService::directory())
            }
        }
    }

    pub async fn latest_price(&self, ticker: &str) -> Sourced<PricePoint> {
        let Some(primary) = &self.primary else {
            return Sourced::fallback(self.mock.latest_at(Utc::now()));
        };
        match primary.latest_price(ticker).await {
            Ok(point) => Sourced::upstream(point),
            Err(e) => {
                self.record_fallback("latest_price", ticker, &e);
                Sourced::fallback(self.mock.latest_at(Utc::now()))
            }
        }
    }

    pub async fn price_history(&self, ticker: &str, minutes: u32) -> Sourced<Vec<PricePoint>> {
        let Some(primary) = &self.primary else {
            return Sourced::fallback(self.mock.history_at(Utc::now()));
        };
        match primary.price_history(ticker, minutes).await {
            Ok(points) => Sourced::upstream(points),
            Err(e) => {
                self.record_fallback("price_history", ticker, &e);
                Sourced::fallback(self.mock.history_at(Utc::now()))
            }
        }
    }
}
