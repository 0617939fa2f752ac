use super::payload::{LatestPriceResponse, PriceHistoryResponse, StocksResponse};
use crate::config::UpstreamEnvConfig;
use crate::domain::errors::MarketDataError;
use crate::domain::market::{PricePoint, StockDirectory};
use crate::domain::ports::StockPriceService;
use crate::infrastructure::core::circuit_breaker::{
    BreakerSettings, CircuitBreaker, CircuitBreakerError,
};
use crate::infrastructure::core::http_client_factory::{HttpClientFactory, endpoint_url};
use crate::infrastructure::observability::Metrics;
use anyhow::Result;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

/// HTTP client for the evaluation stock API.
pub struct EvaluationApiClient {
    client: ClientWithMiddleware,
    base_url: Url,
    circuit_breaker: Arc<CircuitBreaker>,
    metrics: Option<Metrics>,
}

impl EvaluationApiClient {
    pub fn new(config: &UpstreamEnvConfig, metrics: Option<Metrics>) -> Self {
        let settings = BreakerSettings {
            failure_threshold: config.breaker_failure_threshold,
            success_threshold: config.breaker_success_threshold,
            cooldown: config.breaker_timeout,
        };

        Self {
            client: HttpClientFactory::create_client(config),
            base_url: config.base_url.clone(),
            circuit_breaker: Arc::new(CircuitBreaker::new("evaluation-api", settings)),
            metrics,
        }
    }

    pub fn circuit_breaker(&self) -> Arc<CircuitBreaker> {
        self.circuit_breaker.clone()
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str, url: Url) -> Result<T> {
        let started = Instant::now();
        let label = url.path().to_string();

        let result = self
            .circuit_breaker
            .call(async {
                debug!("EvaluationApiClient: GET {}", url);
                let response = self.client.get(url.as_str()).send().await.map_err(|e| {
                    MarketDataError::Http {
                        endpoint: label.clone(),
                        reason: e.to_string(),
                    }
                })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(MarketDataError::Status {
                        endpoint: label.clone(),
                        status: status.as_u16(),
                    });
                }

                let body = response.bytes().await.map_err(|e| MarketDataError::Http {
                    endpoint: label.clone(),
                    reason: e.to_string(),
                })?;

                serde_json::from_slice::<T>(&body).map_err(|e| MarketDataError::Decode {
                    endpoint: label.clone(),
                    reason: e.to_string(),
                })
            })
            .await;

        if let Some(metrics) = &self.metrics {
            let outcome = match &result {
                Ok(_) => "success",
                Err(CircuitBreakerError::Open { .. }) => "rejected",
                Err(CircuitBreakerError::Inner(_)) => "error",
            };
            metrics.observe_upstream(endpoint, outcome, started.elapsed().as_secs_f64());
            metrics.set_breaker_state(self.circuit_breaker.state().await);
        }

        match result {
            Ok(value) => Ok(value),
            Err(CircuitBreakerError::Open { name, retry_in }) => {
                warn!("EvaluationApiClient: {} skipped, breaker [{}] open", label, name);
                Err(MarketDataError::CircuitOpen(format!("retry in {:?}", retry_in)).into())
            }
            Err(CircuitBreakerError::Inner(e)) => Err(e.into()),
        }
    }
}

fn validate_ticker(ticker: &str) -> Result<&str, MarketDataError> {
    let trimmed = ticker.trim();
    let valid = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if valid {
        Ok(trimmed)
    } else {
        Err(MarketDataError::InvalidTicker(ticker.to_string()))
    }
}

#[async_trait]
impl StockPriceService for EvaluationApiClient {
    async fn list_stocks(&self) -> Result<StockDirectory> {
        let url = endpoint_url(&self.base_url, &["stocks"], &[])?;
        let response: StocksResponse = self.get_json("stocks", url).await?;
        Ok(response.stocks)
    }

    async fn latest_price(&self, ticker: &str) -> Result<PricePoint> {
        let ticker = validate_ticker(ticker)?;
        let url = endpoint_url(&self.base_url, &["stocks", ticker], &[])?;
        let response: LatestPriceResponse = self.get_json("latest_price", url).await?;
        Ok(response.stock)
    }

    async fn price_history(&self, ticker: &str, minutes: u32) -> Result<Vec<PricePoint>> {
        let ticker = validate_ticker(ticker)?;
        let url = endpoint_url(
            &self.base_url,
            &["stocks", ticker],
            &[("minutes", minutes.to_string())],
        )?;
        let response: PriceHistoryResponse = self.get_json("price_history", url).await?;
        Ok(response.into_points())
    }
}
