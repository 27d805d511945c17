use thiserror::Error;

/// Errors that can occur during embedding requests.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The request timed out.
    #[error("embedding request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status.
    #[error("embeddings request failed: {status} {body}")]
    Api {
        /// Numeric HTTP status code.
        status: u16,
        /// Raw response body text.
        body: String,
    },

    /// The success response body was not valid JSON.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Errors raised by an [`ApiKeyResolver`](crate::ApiKeyResolver).
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No usable key was found for the provider.
    #[error("No API key found for provider \"{provider}\".")]
    MissingApiKey {
        /// Provider identifier the lookup was made for.
        provider: String,
    },

    /// The lookup itself failed (unreadable store, malformed config, ...).
    #[error("API key lookup failed: {0}")]
    Lookup(String),
}
