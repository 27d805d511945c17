use std::time::Duration;

use async_trait::async_trait;
use mnemo_embedding::EmbeddingError;
use reqwest::header::HeaderMap;
use tracing::debug;
use url::Url;

use crate::error::AzureOpenAiError;

/// Status and raw body text of an HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a JSON POST and returns the status and body.
///
/// Non-2xx statuses are returned as responses, not errors; only failures to
/// send or to read the body are errors.
#[async_trait]
pub trait EmbeddingTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &Url,
        headers: &HeaderMap,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, EmbeddingError>;
}

/// [`EmbeddingTransport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport, optionally bounding every request by `timeout`.
    pub fn new(timeout: Option<Duration>) -> Result<Self, AzureOpenAiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AzureOpenAiError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn map_reqwest_error(err: &reqwest::Error) -> EmbeddingError {
    if err.is_timeout() {
        EmbeddingError::Timeout
    } else {
        EmbeddingError::Http(err.to_string())
    }
}

#[async_trait]
impl EmbeddingTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &Url,
        headers: &HeaderMap,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, EmbeddingError> {
        let response = self
            .client
            .post(url.clone())
            .headers(headers.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| map_reqwest_error(&e))?;

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if status.is_success() => return Err(map_reqwest_error(&e)),
            Err(e) => {
                debug!(status = %status, error = %e, "failed to read error response body");
                String::new()
            }
        };

        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }
}
