//! Embedding provider capability for the mnemo memory subsystem.
//!
//! Backends implement [`EmbeddingProvider`]; API keys they need come from an
//! [`ApiKeyResolver`].

pub mod config;
pub mod credentials;
pub mod error;
pub mod mock;
pub mod provider;

pub use config::{EmbeddingProviderOptions, RemoteOptions};
pub use credentials::{
    ApiKeyRequest, ApiKeyResolver, ChainedApiKeyResolver, ConfigApiKeyResolver,
    EnvApiKeyResolver, StaticApiKeyResolver, env_var_for_provider,
};
pub use error::{CredentialError, EmbeddingError};
pub use mock::{FailingEmbeddingProvider, MockEmbeddingProvider};
pub use provider::EmbeddingProvider;

pub use secrecy::{ExposeSecret, SecretString};
