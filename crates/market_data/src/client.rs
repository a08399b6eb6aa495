//! HTTP market data client

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use contracts::{MarketSnapshot, MarketSource, RelayError};

/// Request timeout for the snapshot endpoint
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Market data client for a single configured endpoint
pub struct MarketClient {
    http: reqwest::Client,
    url: String,
}

impl MarketClient {
    /// Create a client for the given snapshot URL
    pub fn new(url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            http,
            url: url.into(),
        }
    }

    /// The configured endpoint
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl MarketSource for MarketClient {
    async fn fetch(&self) -> Result<MarketSnapshot, RelayError> {
        debug!(url = %self.url, "Fetching market snapshot");

        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| RelayError::fetch(&self.url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::fetch(
                &self.url,
                format!("status code: {status}"),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RelayError::decode(e.to_string()))?;

        Ok(MarketSnapshot::new(body))
    }
}
