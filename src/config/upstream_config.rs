//! Upstream stock API configuration parsing from environment variables.

use super::{Lookup, parse_or};
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://20.244.56.144/evaluation-service";

/// Connection settings for the evaluation stock API
#[derive(Debug, Clone)]
pub struct UpstreamEnvConfig {
    pub base_url: Url,
    pub api_token: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_retries: u32,
    pub breaker_failure_threshold: usize,
    pub breaker_success_threshold: usize,
    pub breaker_timeout: Duration,
}

impl UpstreamEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        let raw_url = lookup("STOCK_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw_url)
            .with_context(|| format!("Invalid STOCK_API_BASE_URL: {}", raw_url))?;

        Ok(Self {
            base_url,
            api_token: lookup("STOCK_API_TOKEN").filter(|t| !t.trim().is_empty()),
            timeout: Duration::from_secs(parse_or(lookup, "STOCK_API_TIMEOUT_SECS", 10)),
            connect_timeout: Duration::from_secs(parse_or(
                lookup,
                "STOCK_API_CONNECT_TIMEOUT_SECS",
                5,
            )),
            max_retries: parse_or(lookup, "STOCK_API_MAX_RETRIES", 2),
            breaker_failure_threshold: parse_or(lookup, "CIRCUIT_BREAKER_FAILURE_THRESHOLD", 3),
            breaker_success_threshold: parse_or(lookup, "CIRCUIT_BREAKER_SUCCESS_THRESHOLD", 1),
            breaker_timeout: Duration::from_secs(parse_or(
                lookup,
                "CIRCUIT_BREAKER_TIMEOUT_SECS",
                30,
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_upstream_config_defaults() {
        let config = UpstreamEnvConfig::from_lookup(&|_| None).unwrap();
        assert_eq!(config.base_url.as_str(), "http://20.244.56.144/evaluation-service");
        assert!(config.api_token.is_none());
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.breaker_failure_threshold, 3);
    }

    #[test]
    fn test_upstream_config_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("STOCK_API_BASE_URL", "https://prices.example.com/api"),
            ("STOCK_API_TOKEN", "secret"),
            ("STOCK_API_MAX_RETRIES", "0"),
            ("CIRCUIT_BREAKER_TIMEOUT_SECS", "5"),
        ]);
        let config =
            UpstreamEnvConfig::from_lookup(&|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.base_url.host_str(), Some("prices.example.com"));
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.breaker_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = UpstreamEnvConfig::from_lookup(&|k| {
            (k == "STOCK_API_BASE_URL").then(|| "not a url".to_string())
        });
        assert!(result.is_err());
    }
}
