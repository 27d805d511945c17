//! Azure OpenAI embeddings provider.
//!
//! Turns [`EmbeddingProviderOptions`](mnemo_embedding::EmbeddingProviderOptions)
//! into an [`EmbeddingProvider`](mnemo_embedding::EmbeddingProvider) in three
//! steps:
//!
//! - [`resolve_client`]: API key and headers from layered config
//! - [`normalize_base_url`]: `https` + host + `/embeddings` path + `api-version`
//! - [`AzureOpenAiEmbeddingClient`]: batched POSTs mapped back by position

pub mod client;
pub mod endpoint;
pub mod error;
pub mod mock;
pub mod provider;
pub mod resolver;
pub mod transport;

pub use client::AzureOpenAiEmbeddingClient;
pub use endpoint::{NormalizedEndpoint, normalize_base_url};
pub use error::{AZURE_OPENAI_EXAMPLE_URL, AzureOpenAiError, EndpointError};
pub use mock::{MockTransport, RecordedRequest};
pub use provider::{
    AzureOpenAiEmbeddingProvider, create_azure_openai_embedding_provider,
    create_azure_openai_embedding_provider_with_transport,
};
pub use resolver::{
    API_KEY_HEADER, AZURE_OPENAI_PROVIDER_ID, ResolvedClient, merge_headers, normalize_model,
    resolve_client,
};
pub use transport::{EmbeddingTransport, ReqwestTransport, TransportResponse};
