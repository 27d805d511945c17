use async_trait::async_trait;

use crate::error::EmbeddingError;

/// Trait for computing text embeddings.
///
/// Implementations call an external service to convert text into a dense
/// vector representation. The memory/search layer only talks to this trait
/// and never sees endpoint-specific details.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Stable identifier of the backend (e.g. `"azure-openai"`).
    fn id(&self) -> &str;

    /// Model name sent to the backend. Empty means the server chooses.
    fn model(&self) -> &str;

    /// Embed a single query string.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed multiple texts in one request.
    ///
    /// The result is positionally aligned with `texts`.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}
