use thiserror::Error;

/// Errors raised while talking to a stock price source
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Request to {endpoint} failed: {reason}")]
    Http { endpoint: String, reason: String },

    #[error("{endpoint} responded with status {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Unexpected response structure from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("Upstream unavailable: {0}")]
    CircuitOpen(String),

    #[error("Invalid ticker: '{0}'")]
    InvalidTicker(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_formatting() {
        let err = MarketDataError::Status {
            endpoint: "stocks/AAPL".to_string(),
            status: 503,
        };

        let msg = err.to_string();
        assert!(msg.contains("stocks/AAPL"));
        assert!(msg.contains("503"));
    }

    #[test]
    fn test_invalid_ticker_formatting() {
        let err = MarketDataError::InvalidTicker("A/B".to_string());
        assert_eq!(err.to_string(), "Invalid ticker: 'A/B'");
    }
}
