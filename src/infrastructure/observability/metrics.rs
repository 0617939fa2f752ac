//! Prometheus metrics definitions for Stockboard
//!
//! All metrics use the `stockboard_` prefix.

use crate::infrastructure::core::circuit_breaker::CircuitState;
use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Upstream endpoints, used as the `endpoint` label.
pub const ENDPOINTS: [&str; 3] = ["stocks", "latest_price", "price_history"];

/// Outcomes of an upstream call, used as the `outcome` label.
pub const OUTCOMES: [&str; 3] = ["success", "error", "rejected"];

/// Prometheus metrics for the dashboard backend
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Upstream calls by endpoint and outcome
    pub upstream_requests_total: CounterVec,
    /// Upstream latency in seconds, including retries
    pub upstream_latency_seconds: HistogramVec,
    /// Responses served from synthetic data
    pub fallbacks_total: CounterVec,
    /// Dashboard views computed, by kind (chart / heatmap)
    pub views_total: CounterVec,
    /// Breaker state (0=closed, 1=half-open, 2=open)
    pub circuit_breaker_state: GenericGauge<AtomicF64>,
    /// Uptime in seconds
    pub uptime_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let upstream_requests_total = CounterVec::new(
            Opts::new(
                "stockboard_upstream_requests_total",
                "Upstream stock API calls by endpoint and outcome",
            ),
            &["endpoint", "outcome"],
        )?;
        registry.register(Box::new(upstream_requests_total.clone()))?;

        let upstream_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "stockboard_upstream_latency_seconds",
                "Upstream stock API latency in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["endpoint"],
        )?;
        registry.register(Box::new(upstream_latency_seconds.clone()))?;

        let fallbacks_total = CounterVec::new(
            Opts::new(
                "stockboard_fallbacks_total",
                "Responses served from synthetic data by endpoint",
            ),
            &["endpoint"],
        )?;
        registry.register(Box::new(fallbacks_total.clone()))?;

        let views_total = CounterVec::new(
            Opts::new("stockboard_views_total", "Dashboard views computed"),
            &["view"],
        )?;
        registry.register(Box::new(views_total.clone()))?;

        let circuit_breaker_state = Gauge::with_opts(Opts::new(
            "stockboard_circuit_breaker_state",
            "Upstream circuit breaker state (0=closed, 1=half-open, 2=open)",
        ))?;
        registry.register(Box::new(circuit_breaker_state.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "stockboard_uptime_seconds",
            "Process uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            upstream_requests_total,
            upstream_latency_seconds,
            fallbacks_total,
            views_total,
            circuit_breaker_state,
            uptime_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn observe_upstream(&self, endpoint: &str, outcome: &str, latency: f64) {
        self.upstream_requests_total
            .with_label_values(&[endpoint, outcome])
            .inc();
        self.upstream_latency_seconds
            .with_label_values(&[endpoint])
            .observe(latency);
    }

    pub fn inc_fallback(&self, endpoint: &str) {
        self.fallbacks_total.with_label_values(&[endpoint]).inc();
    }

    pub fn inc_view(&self, view: &str) {
        self.views_total.with_label_values(&[view]).inc();
    }

    pub fn set_breaker_state(&self, state: CircuitState) {
        let value = match state {
            CircuitState::Closed => 0.0,
            CircuitState::HalfOpen => 1.0,
            CircuitState::Open => 2.0,
        };
        self.circuit_breaker_state.set(value);
    }

    /// Upstream calls with `outcome`, summed over all endpoints
    pub fn upstream_total(&self, outcome: &str) -> u64 {
        ENDPOINTS
            .iter()
            .map(|endpoint| {
                self.upstream_requests_total
                    .with_label_values(&[*endpoint, outcome])
                    .get() as u64
            })
            .sum()
    }

    pub fn fallback_total(&self) -> u64 {
        ENDPOINTS
            .iter()
            .map(|endpoint| self.fallbacks_total.with_label_values(&[*endpoint]).get() as u64)
            .sum()
    }
}
