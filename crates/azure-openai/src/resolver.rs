use std::collections::BTreeMap;

use mnemo_embedding::{ApiKeyRequest, ApiKeyResolver, EmbeddingProviderOptions, ExposeSecret};
use tracing::debug;

use crate::error::{AzureOpenAiError, EndpointError};

/// Provider identifier used for credential lookup and [`EmbeddingProvider::id`].
///
/// [`EmbeddingProvider::id`]: mnemo_embedding::EmbeddingProvider::id
pub const AZURE_OPENAI_PROVIDER_ID: &str = "azure-openai";

/// Header carrying the key. Azure authenticates with `api-key`, not a bearer token.
pub const API_KEY_HEADER: &str = "api-key";

const CONTENT_TYPE_HEADER: &str = "Content-Type";

const MODEL_PREFIX: &str = "azure-openai/";

/// Effective base URL, headers, and model for one provider instance.
///
/// `base_url` is the trimmed but not yet validated string from config.
/// `Debug` prints every header value except `Content-Type` as `[REDACTED]`.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedClient {
    pub base_url: String,
    pub headers: BTreeMap<String, String>,
    pub model: String,
}

impl std::fmt::Debug for ResolvedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let headers: BTreeMap<&str, &str> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case(CONTENT_TYPE_HEADER) {
                    (name.as_str(), value.as_str())
                } else {
                    (name.as_str(), "[REDACTED]")
                }
            })
            .collect();
        f.debug_struct("ResolvedClient")
            .field("base_url", &self.base_url)
            .field("headers", &headers)
            .field("model", &self.model)
            .finish()
    }
}

/// Merge `overrides` on top of `base`. Later source wins.
///
/// Header names compare ASCII case-insensitively, so an override for
/// `API-Key` replaces a base `api-key` entry rather than sitting beside it.
pub fn merge_headers(
    base: BTreeMap<String, String>,
    overrides: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = base;
    for (name, value) in overrides {
        merged.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
        merged.insert(name.clone(), value.clone());
    }
    merged
}

/// Trim a model name and drop a leading `azure-openai/` prefix.
pub fn normalize_model(model: &str) -> String {
    let trimmed = model.trim();
    trimmed
        .strip_prefix(MODEL_PREFIX)
        .unwrap_or(trimmed)
        .to_owned()
}

/// Resolve the key, base URL, headers, and model for an Azure OpenAI client.
///
/// An explicit `remote.apiKey` wins; otherwise `resolver` is asked for the
/// `azure-openai` key and its "missing API key" error propagates as-is.
pub async fn resolve_client(
    options: &EmbeddingProviderOptions,
    resolver: &dyn ApiKeyResolver,
) -> Result<ResolvedClient, AzureOpenAiError> {
    let remote = options.remote.clone().unwrap_or_default();

    let remote_key = remote.api_key.as_deref().map(str::trim).unwrap_or_default();
    let api_key = if remote_key.is_empty() {
        let request = ApiKeyRequest {
            provider: AZURE_OPENAI_PROVIDER_ID,
            config: &options.config,
            agent_dir: options.agent_dir.as_deref(),
        };
        resolver
            .require_api_key(&request)
            .await?
            .expose_secret()
            .clone()
    } else {
        remote_key.to_owned()
    };

    let base_url = remote.base_url.as_deref().map(str::trim).unwrap_or_default();
    if base_url.is_empty() {
        return Err(EndpointError::MissingBaseUrl.into());
    }

    let mut headers = BTreeMap::new();
    headers.insert(CONTENT_TYPE_HEADER.to_owned(), "application/json".to_owned());
    headers.insert(API_KEY_HEADER.to_owned(), api_key);
    let headers = match &remote.headers {
        Some(overrides) => merge_headers(headers, overrides),
        None => headers,
    };

    let model = normalize_model(&options.model);
    debug!(
        model = %model,
        header_count = headers.len(),
        key_from_remote = !remote_key.is_empty(),
        "resolved azure openai client"
    );

    Ok(ResolvedClient {
        base_url: base_url.to_owned(),
        headers,
        model,
    })
}
