//! Push-based metrics reporter for Stockboard
//!
//! Periodically outputs a metrics snapshot as structured JSON to stdout.

use crate::infrastructure::core::circuit_breaker::CircuitBreaker;
use crate::infrastructure::observability::metrics::Metrics;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Metrics snapshot for JSON output
#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub upstream: UpstreamSnapshot,
}

#[derive(Debug, Serialize)]
pub struct UpstreamSnapshot {
    pub requests_ok: u64,
    pub requests_failed: u64,
    pub requests_rejected: u64,
    pub fallbacks: u64,
    /// `None` in mock mode, where no upstream client exists
    pub circuit_breaker: Option<String>,
}

/// Push-based metrics reporter
///
/// Outputs metrics as structured JSON logs on a configurable interval.
pub struct MetricsReporter {
    metrics: Metrics,
    circuit_breaker: Option<Arc<CircuitBreaker>>,
    start_time: Instant,
    interval: Duration,
}

impl MetricsReporter {
    pub fn new(
        metrics: Metrics,
        circuit_breaker: Option<Arc<CircuitBreaker>>,
        interval: Duration,
    ) -> Self {
        Self {
            metrics,
            circuit_breaker,
            start_time: Instant::now(),
            interval,
        }
    }

    /// Run the reporter in a loop, outputting metrics periodically
    pub async fn run(self) {
        info!(
            "MetricsReporter: Starting push-based metrics (interval: {:?})",
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            let snapshot = self.collect_snapshot().await;
            match serde_json::to_string(&snapshot) {
                Ok(json) => {
                    // Prefixed so log shippers can filter on it
                    println!("METRICS_JSON:{}", json);
                    info!(
                        "Upstream ok: {} | failed: {} | fallbacks: {} | Uptime: {}s",
                        snapshot.upstream.requests_ok,
                        snapshot.upstream.requests_failed,
                        snapshot.upstream.fallbacks,
                        snapshot.uptime_seconds
                    );
                }
                Err(e) => warn!("Failed to serialize metrics: {}", e),
            }
        }
    }

    async fn collect_snapshot(&self) -> MetricsSnapshot {
        let uptime = self.start_time.elapsed().as_secs();
        self.metrics.uptime_seconds.set(uptime as f64);

        let circuit_breaker = match &self.circuit_breaker {
            Some(cb) => {
                let state = cb.state().await;
                self.metrics.set_breaker_state(state);
                Some(format!("{:?}", state))
            }
            None => None,
        };

        MetricsSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            upstream: UpstreamSnapshot {
                requests_ok: self.metrics.upstream_total("success"),
                requests_failed: self.metrics.upstream_total("error"),
                requests_rejected: self.metrics.upstream_total("rejected"),
                fallbacks: self.metrics.fallback_total(),
                circuit_breaker,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::core::circuit_breaker::BreakerSettings;

    #[tokio::test]
    async fn test_metrics_snapshot_collection() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.observe_upstream("stocks", "success", 0.05);
        metrics.inc_fallback("price_history");

        let cb = Arc::new(CircuitBreaker::new(
            "evaluation-api",
            BreakerSettings {
                failure_threshold: 3,
                success_threshold: 1,
                cooldown: Duration::from_secs(30),
            },
        ));
        let reporter = MetricsReporter::new(metrics, Some(cb), Duration::from_secs(60));

        let snapshot = reporter.collect_snapshot().await;
        assert_eq!(snapshot.upstream.requests_ok, 1);
        assert_eq!(snapshot.upstream.fallbacks, 1);
        assert_eq!(snapshot.upstream.circuit_breaker.as_deref(), Some("Closed"));
        assert!(!snapshot.timestamp.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_serialization_without_breaker() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        let reporter = MetricsReporter::new(metrics, None, Duration::from_secs(60));

        let json = serde_json::to_string(&reporter.collect_snapshot().await)
            .expect("Failed to serialize");
        assert!(json.contains("\"circuit_breaker\":null"));
        assert!(json.contains("\"version\""));
    }
}
