use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mnemo_embedding::EmbeddingError;
use reqwest::header::HeaderMap;
use url::Url;

use crate::transport::{EmbeddingTransport, TransportResponse};

/// A request captured by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: Url,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

/// A transport that serves canned responses and records every request.
///
/// Responses are served in the order they were queued; once the queue is
/// drained the last response repeats. With nothing queued every call
/// returns `200` with `{"data":[]}`.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<TransportResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
    calls: AtomicUsize,
}

impl MockTransport {
    /// Create a transport with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport answering every call with `status` and `body`.
    pub fn responding(status: u16, body: impl Into<String>) -> Self {
        let transport = Self::new();
        transport.push_response(status, body);
        transport
    }

    /// Queue another response.
    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_back(TransportResponse {
                status,
                body: body.into(),
            });
    }

    /// Number of `post_json` calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// All recorded requests, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests().pop()
    }

    fn next_response(&self) -> TransportResponse {
        let mut responses = self
            .responses
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if responses.len() > 1 {
            responses.pop_front().unwrap_or_else(default_response)
        } else {
            responses.front().cloned().unwrap_or_else(default_response)
        }
    }
}

fn default_response() -> TransportResponse {
    TransportResponse {
        status: 200,
        body: r#"{"data":[]}"#.to_owned(),
    }
}

#[async_trait]
impl EmbeddingTransport for MockTransport {
    async fn post_json(
        &self,
        url: &Url,
        headers: &HeaderMap,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(RecordedRequest {
                url: url.clone(),
                headers: headers.clone(),
                body: body.clone(),
            });
        Ok(self.next_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://res.openai.azure.com/embeddings?api-version=1").unwrap()
    }

    #[tokio::test]
    async fn serves_queue_then_repeats_last() {
        let transport = MockTransport::responding(500, "first");
        transport.push_response(200, "second");

        let body = serde_json::json!({});
        let headers = HeaderMap::new();
        let first = transport.post_json(&url(), &headers, &body).await.unwrap();
        let second = transport.post_json(&url(), &headers, &body).await.unwrap();
        let third = transport.post_json(&url(), &headers, &body).await.unwrap();

        assert_eq!(first.body, "first");
        assert_eq!(second.body, "second");
        assert_eq!(third.body, "second");
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn records_requests() {
        let transport = MockTransport::new();
        let body = serde_json::json!({ "input": ["a"] });
        let response = transport
            .post_json(&url(), &HeaderMap::new(), &body)
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        let recorded = transport.last_request().unwrap();
        assert_eq!(recorded.body, body);
        assert_eq!(recorded.url, url());
    }
}
