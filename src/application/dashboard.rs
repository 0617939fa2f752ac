use crate::application::market_data::{DataSource, FallbackStockService, Sourced};
use crate::config::DashboardEnvConfig;
use crate::domain::market::{PricePoint, PriceSeries, StockDirectory};
use crate::domain::statistics::{
    CorrelationBand, CorrelationMatrix, SeriesStatistics, compute_correlation_matrix,
    compute_statistics,
};
use crate::infrastructure::observability::Metrics;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// One stock's price chart over an interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub ticker: String,
    pub minutes: u32,
    /// Oldest first
    pub points: Vec<PricePoint>,
    /// `None` when there is nothing to summarize
    pub statistics: Option<SeriesStatistics>,
    pub source: DataSource,
}

/// Per-stock summary shown on the heatmap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    pub ticker: String,
    pub name: String,
    pub statistics: SeriesStatistics,
    pub data_points: usize,
    pub volatility_pct: f64,
    pub source: DataSource,
}

/// Correlation heatmap over a set of stocks.
///
/// Row and column `i` of `matrix` belong to `stocks[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapView {
    pub minutes: u32,
    pub stocks: Vec<StockSnapshot>,
    pub matrix: CorrelationMatrix,
    /// True when any series was served from the fallback
    pub degraded: bool,
}

impl HeatmapView {
    pub fn band(&self, i: usize, j: usize) -> Option<CorrelationBand> {
        self.matrix.get(i, j).map(CorrelationBand::classify)
    }
}

/// Builds the chart and heatmap views from fetched prices.
pub struct DashboardService {
    market: Arc<FallbackStockService>,
    config: DashboardEnvConfig,
    metrics: Option<Metrics>,
}

impl DashboardService {
    pub fn new(
        market: Arc<FallbackStockService>,
        config: DashboardEnvConfig,
        metrics: Option<Metrics>,
    ) -> Self {
        Self {
            market,
            config,
            metrics,
        }
    }

    pub fn config(&self) -> &DashboardEnvConfig {
        &self.config
    }

    pub fn market(&self) -> &Arc<FallbackStockService> {
        &self.market
    }

    pub async fn stocks(&self) -> Sourced<StockDirectory> {
        self.market.stocks().await
    }

    pub async fn chart(&self, ticker: &str, minutes: u32) -> ChartView {
        let history = self.market.price_history(ticker, minutes).await;
        let series = PriceSeries::new(ticker, ticker, history.value);

        let statistics = (!series.is_empty()).then(|| compute_statistics(&series));
        debug!(
            "DashboardService: chart {} over {}m, {} points ({})",
            ticker,
            minutes,
            series.len(),
            history.source
        );
        if let Some(metrics) = &self.metrics {
            metrics.inc_view("chart");
        }

        ChartView {
            ticker: ticker.to_string(),
            minutes,
            points: series.sorted(),
            statistics,
            source: history.source,
        }
    }

    /// Fetches the first `max_heatmap_stocks` listings one after another and
    /// correlates every pair. Stocks with no prices are left out.
    pub async fn heatmap(&self, directory: &StockDirectory, minutes: u32) -> HeatmapView {
        let listings = directory.take(self.config.max_heatmap_stocks);
        let mut series = Vec::with_capacity(listings.len());
        let mut sources = Vec::with_capacity(listings.len());

        for listing in listings {
            let history = self.market.price_history(&listing.ticker, minutes).await;
            if history.value.is_empty() {
                debug!("DashboardService: {} has no prices, skipped", listing.ticker);
                continue;
            }
            series.push(PriceSeries::new(
                listing.ticker.clone(),
                listing.name.clone(),
                history.value,
            ));
            sources.push(history.source);
        }

        let matrix = compute_correlation_matrix(&series);
        let stocks: Vec<StockSnapshot> = series
            .iter()
            .zip(&sources)
            .map(|(s, source)| {
                let statistics = compute_statistics(s);
                StockSnapshot {
                    ticker: s.ticker.clone(),
                    name: s.name.clone(),
                    statistics,
                    data_points: s.len(),
                    volatility_pct: statistics.volatility_pct(),
                    source: *source,
                }
            })
            .collect();
        let degraded = sources.iter().any(DataSource::is_fallback);

        info!(
            "DashboardService: heatmap over {}m with {} of {} stocks{}",
            minutes,
            stocks.len(),
            listings.len(),
            if degraded { " (fallback data)" } else { "" }
        );
        if let Some(metrics) = &self.metrics {
            metrics.inc_view("heatmap");
        }

        HeatmapView {
            minutes,
            stocks,
            matrix,
            degraded,
        }
    }
}
