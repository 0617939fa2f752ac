//! Dashboard and mock-data configuration parsing from environment variables.

use super::{Lookup, parse_or};
use crate::domain::market::TimeInterval;
use std::env;
use std::str::FromStr;

/// How the dashboard slices the data it shows
#[derive(Debug, Clone)]
pub struct DashboardEnvConfig {
    /// Listings included in the correlation heatmap
    pub max_heatmap_stocks: usize,
    pub default_interval: TimeInterval,
}

impl Default for DashboardEnvConfig {
    fn default() -> Self {
        Self {
            max_heatmap_stocks: 10,
            default_interval: TimeInterval::default(),
        }
    }
}

impl DashboardEnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: Lookup<'_>) -> Self {
        let defaults = Self::default();
        Self {
            max_heatmap_stocks: parse_or(lookup, "DASHBOARD_MAX_STOCKS", defaults.max_heatmap_stocks),
            default_interval: lookup("DASHBOARD_DEFAULT_INTERVAL")
                .and_then(|v| TimeInterval::from_str(&v).ok())
                .unwrap_or(defaults.default_interval),
        }
    }
}

/// Widest gap between mock points, one day
pub const MAX_SPACING_MINUTES: i64 = 24 * 60;

/// Shape of the synthetic fallback data
#[derive(Debug, Clone)]
pub struct MockEnvConfig {
    pub series_length: usize,
    pub spacing_minutes: i64,
    pub base_price: f64,
    pub price_range: f64,
    /// Fixed RNG seed; `None` draws from the thread RNG
    pub seed: Option<u64>,
}

impl Default for MockEnvConfig {
    fn default() -> Self {
        Self {
            series_length: 10,
            spacing_minutes: 5,
            base_price: 100.0,
            price_range: 50.0,
            seed: None,
        }
    }
}

impl MockEnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: Lookup<'_>) -> Self {
        let defaults = Self::default();
        Self {
            series_length: parse_or(lookup, "MOCK_SERIES_LENGTH", defaults.series_length),
            spacing_minutes: Some(parse_or(lookup, "MOCK_SPACING_MINUTES", defaults.spacing_minutes))
                .filter(|m| (1..=MAX_SPACING_MINUTES).contains(m))
                .unwrap_or(defaults.spacing_minutes),
            base_price: parse_or(lookup, "MOCK_BASE_PRICE", defaults.base_price),
            price_range: parse_or(lookup, "MOCK_PRICE_RANGE", defaults.price_range),
            seed: lookup("MOCK_SEED").and_then(|v| v.parse().ok()),
        }
    }
}
