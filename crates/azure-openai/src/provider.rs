use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mnemo_embedding::{ApiKeyResolver, EmbeddingError, EmbeddingProvider, EmbeddingProviderOptions};
use tracing::debug;

use crate::client::AzureOpenAiEmbeddingClient;
use crate::endpoint::normalize_base_url;
use crate::error::AzureOpenAiError;
use crate::resolver::{AZURE_OPENAI_PROVIDER_ID, ResolvedClient, resolve_client};
use crate::transport::{EmbeddingTransport, ReqwestTransport};

/// [`EmbeddingProvider`] backed by an Azure OpenAI embeddings deployment.
#[derive(Debug)]
pub struct AzureOpenAiEmbeddingProvider {
    resolved: ResolvedClient,
    client: AzureOpenAiEmbeddingClient,
}

impl AzureOpenAiEmbeddingProvider {
    /// The configuration the provider was built from.
    pub fn resolved(&self) -> &ResolvedClient {
        &self.resolved
    }

    /// The underlying client, bound to the normalized endpoint.
    pub fn client(&self) -> &AzureOpenAiEmbeddingClient {
        &self.client
    }
}

#[async_trait]
impl EmbeddingProvider for AzureOpenAiEmbeddingProvider {
    fn id(&self) -> &str {
        AZURE_OPENAI_PROVIDER_ID
    }

    fn model(&self) -> &str {
        self.client.model()
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.client.embed_query(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.client.embed_batch(texts).await
    }
}

/// Build a provider that talks HTTP through `reqwest`.
///
/// `timeout` bounds each request; `None` leaves requests unbounded.
pub async fn create_azure_openai_embedding_provider(
    options: &EmbeddingProviderOptions,
    resolver: &dyn ApiKeyResolver,
    timeout: Option<Duration>,
) -> Result<AzureOpenAiEmbeddingProvider, AzureOpenAiError> {
    let transport = Arc::new(ReqwestTransport::new(timeout)?);
    create_azure_openai_embedding_provider_with_transport(options, resolver, transport).await
}

/// Build a provider over a caller-supplied transport.
///
/// Resolves credentials and headers, validates the base URL, then binds the
/// client. Any failure aborts construction.
pub async fn create_azure_openai_embedding_provider_with_transport(
    options: &EmbeddingProviderOptions,
    resolver: &dyn ApiKeyResolver,
    transport: Arc<dyn EmbeddingTransport>,
) -> Result<AzureOpenAiEmbeddingProvider, AzureOpenAiError> {
    let resolved = resolve_client(options, resolver).await?;
    let endpoint = normalize_base_url(&resolved.base_url)?;
    debug!(endpoint = %endpoint, model = %resolved.model, "azure openai embedding provider ready");

    let client = AzureOpenAiEmbeddingClient::new(
        endpoint,
        &resolved.headers,
        resolved.model.clone(),
        transport,
    )?;
    Ok(AzureOpenAiEmbeddingProvider { resolved, client })
}
