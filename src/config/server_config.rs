//! Proxy server configuration parsing from environment variables.

use super::{Lookup, parse_or};
use std::env;

/// Server environment configuration
#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServerEnvConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerEnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: Lookup<'_>) -> Self {
        let defaults = Self::default();
        Self {
            bind_address: lookup("SERVER_BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: parse_or(lookup, "SERVER_PORT", defaults.port),
        }
    }

    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
