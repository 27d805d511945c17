use mnemo_embedding::CredentialError;
use thiserror::Error;

/// Example of a well-formed Azure OpenAI embeddings URL, quoted in errors.
pub const AZURE_OPENAI_EXAMPLE_URL: &str = "https://{resource}.openai.azure.com/openai/deployments/{deployment}/embeddings?api-version=2023-05-15";

/// Configuration key the base URL is read from.
pub const BASE_URL_CONFIG_KEY: &str = "remote.baseUrl";

/// Reasons a base URL is rejected by [`normalize_base_url`](crate::normalize_base_url).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// No base URL was configured, or it was blank.
    #[error(
        "Azure OpenAI embeddings base URL is required. Set {} (e.g. {})",
        BASE_URL_CONFIG_KEY,
        AZURE_OPENAI_EXAMPLE_URL
    )]
    MissingBaseUrl,

    /// The value is not an absolute URL.
    #[error("invalid Azure OpenAI base URL: {value}")]
    InvalidUrl {
        /// The offending (trimmed) input.
        value: String,
    },

    /// The URL does not use `https`.
    #[error("Azure OpenAI base URL must use https:, got {scheme}:")]
    BadScheme {
        /// Scheme found in the URL, without the trailing colon.
        scheme: String,
    },

    /// The URL has no host.
    #[error("Azure OpenAI base URL must include a host")]
    MissingHost,

    /// The query string lacks `api-version`.
    #[error(
        "Azure OpenAI base URL must include the api-version query parameter (e.g. {})",
        AZURE_OPENAI_EXAMPLE_URL
    )]
    MissingApiVersion,
}

/// Errors that abort construction of an Azure OpenAI embedding provider.
#[derive(Debug, Error)]
pub enum AzureOpenAiError {
    /// The API key could not be resolved.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// The base URL failed validation.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    /// A configured header name or value is not valid HTTP.
    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader {
        /// Header name as configured.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_base_url_names_key_and_example() {
        let msg = EndpointError::MissingBaseUrl.to_string();
        assert!(msg.contains("remote.baseUrl"));
        assert!(msg.contains(AZURE_OPENAI_EXAMPLE_URL));
    }

    #[test]
    fn bad_scheme_reports_scheme_with_colon() {
        let msg = EndpointError::BadScheme {
            scheme: "http".into(),
        }
        .to_string();
        assert!(msg.contains("got http:"));
    }

    #[test]
    fn missing_api_version_repeats_example() {
        let msg = EndpointError::MissingApiVersion.to_string();
        assert!(msg.contains("api-version"));
        assert!(msg.contains(AZURE_OPENAI_EXAMPLE_URL));
    }

    #[test]
    fn credential_error_is_transparent() {
        let err: AzureOpenAiError = CredentialError::MissingApiKey {
            provider: "azure-openai".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "No API key found for provider \"azure-openai\"."
        );
    }
}
