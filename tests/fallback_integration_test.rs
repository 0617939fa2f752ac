mod common;

use common::{UpstreamHits, broken_upstream, dead_address, fake_upstream, spawn, upstream_config};
use std::sync::Arc;
use stockboard::application::dashboard::DashboardService;
use stockboard::application::market_data::{DataSource, FallbackStockService};
use stockboard::config::{DashboardEnvConfig, MockEnvConfig};
use stockboard::domain::ports::StockPriceService;
use stockboard::infrastructure::evaluation::EvaluationApiClient;
use stockboard::infrastructure::mock::MockStockService;
use stockboard::infrastructure::observability::Metrics;

fn market(client: EvaluationApiClient, metrics: &Metrics) -> FallbackStockService {
    let primary: Arc<dyn StockPriceService> = Arc::new(client);
    let mock = MockStockService::new(MockEnvConfig {
        seed: Some(7),
        ..MockEnvConfig::default()
    });
    FallbackStockService::new(Some(primary), Arc::new(mock), Some(metrics.clone()))
}

#[tokio::test]
async fn test_upstream_500_serves_mock_data() {
    let hits = Arc::new(UpstreamHits::default());
    let addr = spawn(broken_upstream(hits.clone())).await;
    let metrics = Metrics::new().unwrap();
    let market = market(EvaluationApiClient::new(&upstream_config(addr), Some(metrics.clone())), &metrics);

    let stocks = market.stocks().await;
    assert_eq!(stocks.source, DataSource::Fallback);
    assert_eq!(stocks.value.len(), 10);
    assert_eq!(stocks.value.first().unwrap().ticker, "AAPL");

    let history = market.price_history("NVDA", 30).await;
    assert_eq!(history.source, DataSource::Fallback);
    assert_eq!(history.value.len(), 10);
    assert!(history.value.iter().all(|p| (100.0..150.0).contains(&p.price)));

    assert_eq!(hits.total(), 2);
    assert_eq!(metrics.fallback_total(), 2);
}

#[tokio::test]
async fn test_unreachable_upstream_serves_mock_data() {
    let addr = dead_address().await;
    let metrics = Metrics::new().unwrap();
    let market = market(EvaluationApiClient::new(&upstream_config(addr), None), &metrics);

    let latest = market.latest_price("AAPL").await;
    assert_eq!(latest.source, DataSource::Fallback);
    assert!((100.0..150.0).contains(&latest.value.price));
    assert_eq!(metrics.fallback_total(), 1);
}

#[tokio::test]
async fn test_heatmap_over_live_upstream() {
    let hits = Arc::new(UpstreamHits::default());
    let addr = spawn(fake_upstream(hits)).await;
    let metrics = Metrics::new().unwrap();
    let market = Arc::new(market(EvaluationApiClient::new(&upstream_config(addr), None), &metrics));
    let dashboard = DashboardService::new(market, DashboardEnvConfig::default(), None);

    let directory = dashboard.stocks().await;
    assert_eq!(directory.source, DataSource::Upstream);

    let view = dashboard.heatmap(&directory.value, 30).await;
    // PYPL has no prices and is left out
    let tickers: Vec<&str> = view.stocks.iter().map(|s| s.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["NVDA", "AMD"]);
    assert!(!view.degraded);

    let r = view.matrix.get(0, 1).unwrap();
    assert!(r < -0.9, "NVDA rises while AMD falls, got {r}");
    assert_eq!(view.matrix.get(0, 1), view.matrix.get(1, 0));
    assert_eq!(view.matrix.get(1, 1), Some(1.0));

    let nvda = &view.stocks[0];
    assert_eq!(nvda.data_points, 4);
    assert!((nvda.statistics.average - 102.5).abs() < 1e-9);
}
