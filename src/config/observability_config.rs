//! Observability configuration parsing from environment variables.
//!
//! This module handles loading the metrics reporter settings.

use super::{Lookup, parse_or};
use std::env;
use std::time::Duration;

/// Observability environment configuration
#[derive(Debug, Clone)]
pub struct ObservabilityEnvConfig {
    pub enabled: bool,
    pub report_interval: Duration,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            report_interval: Duration::from_secs(60),
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: Lookup<'_>) -> Self {
        Self {
            enabled: parse_or(lookup, "OBSERVABILITY_ENABLED", true),
            report_interval: Duration::from_secs(parse_or(lookup, "OBSERVABILITY_INTERVAL", 60)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observability_config_defaults() {
        let config = ObservabilityEnvConfig::from_lookup(&|_| None);
        assert!(config.enabled);
        assert_eq!(config.report_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_observability_can_be_disabled() {
        let config = ObservabilityEnvConfig::from_lookup(&|k| {
            (k == "OBSERVABILITY_ENABLED").then(|| "false".to_string())
        });
        assert!(!config.enabled);
    }
}
