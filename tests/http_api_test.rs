mod common;

use common::{UpstreamHits, broken_upstream, fake_upstream, spawn, upstream_config};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use stockboard::application::system::Application;
use stockboard::config::{Config, Mode};
use stockboard::interfaces::http::{ApiState, DATA_SOURCE_HEADER, router};

/// Starts the proxy against the upstream at `upstream`, or in mock mode.
async fn start_proxy(upstream: Option<SocketAddr>) -> SocketAddr {
    let mut config = Config::mock().unwrap();
    if let Some(addr) = upstream {
        config.mode = Mode::Live;
        config.upstream = upstream_config(addr);
    }
    let app = Application::build(config).unwrap();
    spawn(router(Arc::new(ApiState::from_application(&app)))).await
}

async fn get(addr: SocketAddr, path: &str) -> (u16, Option<String>, Value) {
    let response = reqwest::get(format!("http://{addr}{path}")).await.unwrap();
    let status = response.status().as_u16();
    let source = response
        .headers()
        .get(DATA_SOURCE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.json::<Value>().await.unwrap();
    (status, source, body)
}

#[tokio::test]
async fn test_proxy_passes_upstream_data_through() {
    let hits = Arc::new(UpstreamHits::default());
    let proxy = start_proxy(Some(spawn(fake_upstream(hits)).await)).await;

    let (status, source, body) = get(proxy, "/api/stocks").await;
    assert_eq!(status, 200);
    assert_eq!(source.as_deref(), Some("upstream"));
    assert_eq!(body, common::fake_directory());

    let (_, source, body) = get(proxy, "/api/stocks/NVDA").await;
    assert_eq!(source.as_deref(), Some("upstream"));
    assert_eq!(body["stock"]["price"], 231.95);

    let (_, _, body) = get(proxy, "/api/stocks/NVDA?minutes=30").await;
    assert_eq!(body.as_array().unwrap().len(), 4);
    assert!(body[0]["lastUpdatedAt"].is_string());
}

#[tokio::test]
async fn test_proxy_falls_back_when_upstream_fails() {
    let hits = Arc::new(UpstreamHits::default());
    let proxy = start_proxy(Some(spawn(broken_upstream(hits.clone())).await)).await;

    let (status, source, body) = get(proxy, "/api/stocks").await;
    assert_eq!(status, 200);
    assert_eq!(source.as_deref(), Some("fallback"));
    assert_eq!(body["stocks"]["Apple Inc."], "AAPL");

    let (status, source, body) = get(proxy, "/api/stocks/AAPL?minutes=15").await;
    assert_eq!(status, 200);
    assert_eq!(source.as_deref(), Some("fallback"));
    assert_eq!(body.as_array().unwrap().len(), 10);

    assert_eq!(hits.total(), 2);
}

#[tokio::test]
async fn test_invalid_minutes_is_rejected() {
    let proxy = start_proxy(None).await;

    for path in [
        "/api/stocks/AAPL?minutes=abc",
        "/api/stocks/AAPL?minutes=0",
        "/api/dashboard/heatmap?minutes=-1",
    ] {
        let (status, _, body) = get(proxy, path).await;
        assert_eq!(status, 400, "{path}");
        assert!(body["error"].as_str().unwrap().contains("minutes"));
    }
}

#[tokio::test]
async fn test_dashboard_views_in_mock_mode() {
    let proxy = start_proxy(None).await;

    let (status, source, chart) = get(proxy, "/api/dashboard/chart/MSFT?minutes=60").await;
    assert_eq!(status, 200);
    assert_eq!(source.as_deref(), Some("fallback"));
    assert_eq!(chart["ticker"], "MSFT");
    assert_eq!(chart["minutes"], 60);
    assert_eq!(chart["points"].as_array().unwrap().len(), 10);
    assert!(chart["statistics"]["average"].as_f64().unwrap() >= 100.0);

    let (status, _, heatmap) = get(proxy, "/api/dashboard/heatmap").await;
    assert_eq!(status, 200);
    assert_eq!(heatmap["minutes"], 30);
    assert_eq!(heatmap["degraded"], true);
    let matrix = heatmap["matrix"].as_array().unwrap();
    assert_eq!(matrix.len(), 10);
    assert_eq!(matrix[3][3], 1.0);
    assert_eq!(heatmap["stocks"][0]["dataPoints"], 10);
}

#[tokio::test]
async fn test_health_and_metrics() {
    let proxy = start_proxy(None).await;

    let (status, _, body) = get(proxy, "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");

    get(proxy, "/api/dashboard/chart/AAPL").await;
    let text = reqwest::get(format!("http://{proxy}/metrics"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(text.contains("stockboard_views_total"));
}
