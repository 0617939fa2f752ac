use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::ApiState;
use super::error::ApiError;
use crate::application::market_data::DataSource;

/// Provenance header on every data response
pub const DATA_SOURCE_HEADER: &str = "x-data-source";

#[derive(Debug, Deserialize)]
pub struct MinutesQuery {
    minutes: Option<String>,
}

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/stocks", get(list_stocks))
        .route("/api/stocks/{ticker}", get(stock_prices))
        .route("/api/dashboard/chart/{ticker}", get(dashboard_chart))
        .route("/api/dashboard/heatmap", get(dashboard_heatmap))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
}

/// `None` when absent; an error for anything but a positive integer.
fn parse_minutes(raw: Option<&str>) -> Result<Option<u32>, ApiError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.trim().parse::<u32>() {
        Ok(minutes) if minutes > 0 => Ok(Some(minutes)),
        _ => Err(ApiError::BadRequest(format!(
            "minutes must be a positive integer, got '{raw}'"
        ))),
    }
}

fn sourced<T: serde::Serialize>(source: DataSource, body: T) -> Response {
    ([(DATA_SOURCE_HEADER, source.as_str())], Json(body)).into_response()
}

async fn list_stocks(State(state): State<Arc<ApiState>>) -> Response {
    let stocks = state.market.stocks().await;
    sourced(stocks.source, json!({ "stocks": stocks.value }))
}

async fn stock_prices(
    State(state): State<Arc<ApiState>>,
    Path(ticker): Path<String>,
    Query(q): Query<MinutesQuery>,
) -> Result<Response, ApiError> {
    match parse_minutes(q.minutes.as_deref())? {
        Some(minutes) => {
            let history = state.market.price_history(&ticker, minutes).await;
            Ok(sourced(history.source, history.value))
        }
        None => {
            let latest = state.market.latest_price(&ticker).await;
            Ok(sourced(latest.source, json!({ "stock": latest.value })))
        }
    }
}

async fn dashboard_chart(
    State(state): State<Arc<ApiState>>,
    Path(ticker): Path<String>,
    Query(q): Query<MinutesQuery>,
) -> Result<Response, ApiError> {
    let minutes = parse_minutes(q.minutes.as_deref())?.unwrap_or(state.default_minutes());
    let view = state.dashboard.chart(&ticker, minutes).await;
    Ok(sourced(view.source, view))
}

async fn dashboard_heatmap(
    State(state): State<Arc<ApiState>>,
    Query(q): Query<MinutesQuery>,
) -> Result<Response, ApiError> {
    let minutes = parse_minutes(q.minutes.as_deref())?.unwrap_or(state.default_minutes());
    let directory = state.dashboard.stocks().await;
    let view = state.dashboard.heatmap(&directory.value, minutes).await;
    let source = if view.degraded || directory.source.is_fallback() {
        DataSource::Fallback
    } else {
        DataSource::Upstream
    };
    Ok(sourced(source, view))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn metrics(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes(None).unwrap(), None);
        assert_eq!(parse_minutes(Some("30")).unwrap(), Some(30));
        assert_eq!(parse_minutes(Some(" 240 ")).unwrap(), Some(240));
        assert!(parse_minutes(Some("0")).is_err());
        assert!(parse_minutes(Some("-5")).is_err());
        assert!(parse_minutes(Some("soon")).is_err());
    }

    #[test]
    fn test_sourced_sets_header() {
        let response = sourced(DataSource::Fallback, json!([]));
        assert_eq!(
            response.headers().get(DATA_SOURCE_HEADER).unwrap(),
            "fallback"
        );
    }
}
