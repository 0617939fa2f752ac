use crate::config::UpstreamEnvConfig;
use crate::domain::errors::MarketDataError;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tracing::warn;
use url::Url;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates the upstream HTTP client with retry middleware.
    ///
    /// Every request asks for JSON; the bearer token is attached when configured.
    pub fn create_client(config: &UpstreamEnvConfig) -> ClientWithMiddleware {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.api_token {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("HttpClientFactory: STOCK_API_TOKEN is not a valid header value, ignoring it"),
            }
        }

        let client = Client::builder()
            .default_headers(headers)
            .pool_max_idle_per_host(5)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }
}

/// Appends path segments and query pairs to `base`.
///
/// Segments are percent-encoded, so a ticker can never escape its path slot.
pub fn endpoint_url(
    base: &Url,
    segments: &[&str],
    query: &[(&str, String)],
) -> Result<Url, MarketDataError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| MarketDataError::Http {
            endpoint: base.to_string(),
            reason: "base URL cannot carry a path".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}
