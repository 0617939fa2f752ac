//! Configuration module for Stockboard.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Upstream API, Server, Dashboard, Mock data and Observability.

mod dashboard_config;
mod observability_config;
mod server_config;
mod upstream_config;

pub use dashboard_config::{DashboardEnvConfig, MockEnvConfig};
pub use observability_config::ObservabilityEnvConfig;
pub use server_config::ServerEnvConfig;
pub use upstream_config::{DEFAULT_BASE_URL, UpstreamEnvConfig};

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Environment variable lookup, swappable in tests.
pub(crate) type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Parses `key` or falls back to `default` when missing or malformed.
pub(crate) fn parse_or<T: FromStr>(lookup: Lookup<'_>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Where price data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Synthetic data only; the upstream API is never contacted
    Mock,
    /// Upstream API, with synthetic data on failure
    Live,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(Mode::Mock),
            "live" => Ok(Mode::Live),
            _ => anyhow::bail!("Invalid MODE: {}. Must be 'mock' or 'live'", s),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub upstream: UpstreamEnvConfig,
    pub server: ServerEnvConfig,
    pub dashboard: DashboardEnvConfig,
    pub mock: MockEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        let mode_str = lookup("MODE").unwrap_or_else(|| "live".to_string());
        let mode = Mode::from_str(&mode_str)?;

        Ok(Self {
            mode,
            upstream: UpstreamEnvConfig::from_lookup(lookup)
                .context("Failed to load upstream API config")?,
            server: ServerEnvConfig::from_lookup(lookup),
            dashboard: DashboardEnvConfig::from_lookup(lookup),
            mock: MockEnvConfig::from_lookup(lookup),
            observability: ObservabilityEnvConfig::from_lookup(lookup),
        })
    }

    /// Configuration that never touches the network, for tests and demos.
    pub fn mock() -> Result<Self> {
        Self::from_lookup(&|key| (key == "MODE").then(|| "mock".to_string()))
    }
}
