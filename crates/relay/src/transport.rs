//! Transport boundary — the relay never opens sockets itself.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timeout after {0:?}")]
    Timeout(Duration),
    #[error("cannot reach endpoint: {0}")]
    Unreachable(String),
    #[error("HTTP request failed: {0}")]
    Request(String),
}

/// Posts one JSON payload and returns the raw status and body.
/// Implementations own sockets, TLS, and connection pooling.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        payload: &Value,
        timeout: Duration,
    ) -> Result<(u16, String), TransportError>;
}

/// reqwest-backed transport with per-request timeouts.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        payload: &Value,
        timeout: Duration,
    ) -> Result<(u16, String), TransportError> {
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(payload)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| classify(e, timeout))?;
        Ok((status, body))
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else if err.is_connect() {
        TransportError::Unreachable(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}
