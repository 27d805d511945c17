use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::EmbeddingError;
use crate::provider::EmbeddingProvider;

/// A mock embedding provider that returns the same fixed vector for every text.
///
/// Tracks the number of calls via an atomic counter so tests can verify
/// how often a consumer hits the provider.
pub struct MockEmbeddingProvider {
    vector: Vec<f32>,
    model: String,
    calls: AtomicUsize,
}

impl MockEmbeddingProvider {
    /// Create a mock provider returning the given fixed vector.
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            model: "mock-embedding".to_owned(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `embed_query` / `embed_batch` invocations.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn embed_query(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.vector.clone())
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(texts.iter().map(|_| self.vector.clone()).collect())
    }
}

/// A mock embedding provider that always fails with an API error.
pub struct FailingEmbeddingProvider {
    status: u16,
    body: String,
}

impl FailingEmbeddingProvider {
    /// Create a provider failing with the given status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    fn error(&self) -> EmbeddingError {
        EmbeddingError::Api {
            status: self.status,
            body: self.body.clone(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for FailingEmbeddingProvider {
    fn id(&self) -> &'static str {
        "failing"
    }

    fn model(&self) -> &'static str {
        ""
    }

    async fn embed_query(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(self.error())
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(self.error())
    }
}
