#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use stockboard::config::UpstreamEnvConfig;
use url::Url;

pub const PREFIX: &str = "/evaluation-service";

/// Serves `app` on an ephemeral localhost port.
pub async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// A localhost address nothing listens on.
pub async fn dead_address() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn upstream_config(addr: SocketAddr) -> UpstreamEnvConfig {
    UpstreamEnvConfig {
        base_url: Url::parse(&format!("http://{addr}{PREFIX}")).unwrap(),
        api_token: Some("test-token".to_string()),
        timeout: Duration::from_secs(2),
        connect_timeout: Duration::from_millis(500),
        max_retries: 0,
        breaker_failure_threshold: 100,
        breaker_success_threshold: 1,
        breaker_timeout: Duration::from_secs(30),
    }
}

/// Requests seen by the fake upstream, and how many carried the token.
#[derive(Default)]
pub struct UpstreamHits {
    pub total: AtomicUsize,
    pub authorized: AtomicUsize,
}

impl UpstreamHits {
    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn authorized(&self) -> usize {
        self.authorized.load(Ordering::SeqCst)
    }

    fn record(&self, headers: &HeaderMap) {
        self.total.fetch_add(1, Ordering::SeqCst);
        let bearer = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "Bearer test-token");
        if bearer {
            self.authorized.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[derive(Deserialize)]
struct MinutesQuery {
    minutes: Option<u32>,
}

/// Listing order deliberately not alphabetical.
pub fn fake_directory() -> Value {
    json!({
        "stocks": {
            "Nvidia Corporation": "NVDA",
            "Advanced Micro Devices, Inc.": "AMD",
            "PayPal Holdings, Inc.": "PYPL"
        }
    })
}

/// Upstream double. NVDA rises, AMD falls and PYPL has no history.
pub fn fake_upstream(hits: Arc<UpstreamHits>) -> Router {
    async fn stocks(State(hits): State<Arc<UpstreamHits>>, headers: HeaderMap) -> Json<Value> {
        hits.record(&headers);
        Json(fake_directory())
    }

    async fn stock(
        State(hits): State<Arc<UpstreamHits>>,
        headers: HeaderMap,
        Path(ticker): Path<String>,
        Query(q): Query<MinutesQuery>,
    ) -> Result<Json<Value>, StatusCode> {
        hits.record(&headers);
        let prices: Vec<f64> = match ticker.as_str() {
            "NVDA" => vec![100.0, 101.0, 103.0, 106.0],
            "AMD" => vec![90.0, 88.5, 86.0, 84.0],
            "PYPL" => vec![],
            _ => return Err(StatusCode::NOT_FOUND),
        };
        let series: Vec<Value> = prices
            .iter()
            .enumerate()
            .rev()
            .map(|(i, p)| {
                json!({
                    "price": p,
                    "lastUpdatedAt": format!("2025-05-08T04:{:02}:00.000000000Z", 10 + i)
                })
            })
            .collect();

        match q.minutes {
            Some(_) => Ok(Json(Value::Array(series))),
            None => Ok(Json(json!({
                "stock": { "price": 231.95, "lastUpdatedAt": "2025-05-08T04:26:27.465134399Z" }
            }))),
        }
    }

    Router::new()
        .route(&format!("{PREFIX}/stocks"), get(stocks))
        .route(&format!("{PREFIX}/stocks/{{ticker}}"), get(stock))
        .with_state(hits)
}

/// Upstream double that fails every request with a 500.
pub fn broken_upstream(hits: Arc<UpstreamHits>) -> Router {
    async fn fail(State(hits): State<Arc<UpstreamHits>>, headers: HeaderMap) -> StatusCode {
        hits.record(&headers);
        StatusCode::INTERNAL_SERVER_ERROR
    }

    Router::new().fallback(fail).with_state(hits)
}
