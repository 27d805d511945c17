use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Explicit per-provider overrides supplied by the caller.
///
/// Every field is optional. An absent `api_key` falls back to the credential
/// resolver; an absent `headers` adds nothing on top of the derived headers.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteOptions {
    /// API key used verbatim when non-blank. Redacted in `Debug`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the embeddings deployment, before normalization.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Extra headers applied on top of the derived ones.
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
}

impl std::fmt::Debug for RemoteOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field(
                "headers",
                &self
                    .headers
                    .as_ref()
                    .map(|h| h.keys().cloned().collect::<Vec<_>>()),
            )
            .finish()
    }
}

impl RemoteOptions {
    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a header override. A repeated name replaces the earlier value.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }
}

/// Options handed to a provider factory.
///
/// `config` and `agent_dir` are opaque here; they are only forwarded to the
/// credential resolver.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingProviderOptions {
    /// Explicit overrides. `None` behaves like an empty block.
    #[serde(default)]
    pub remote: Option<RemoteOptions>,

    /// Model identifier, possibly provider-prefixed. May be empty.
    #[serde(default)]
    pub model: String,

    /// Active configuration tree, passed through to credential lookup.
    #[serde(default)]
    pub config: serde_json::Value,

    /// Agent working directory, passed through to credential lookup.
    #[serde(default)]
    pub agent_dir: Option<PathBuf>,
}

impl EmbeddingProviderOptions {
    /// Create options for the given model with no overrides.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Set the remote override block.
    #[must_use]
    pub fn with_remote(mut self, remote: RemoteOptions) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Set the configuration tree forwarded to credential lookup.
    #[must_use]
    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = config;
        self
    }

    /// Set the agent directory forwarded to credential lookup.
    #[must_use]
    pub fn with_agent_dir(mut self, agent_dir: impl Into<PathBuf>) -> Self {
        self.agent_dir = Some(agent_dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_keys() {
        let json = serde_json::json!({
            "model": "azure-openai/text-embedding-3-small",
            "agentDir": "/tmp/agent",
            "remote": {
                "apiKey": "k-123",
                "baseUrl": "https://res.openai.azure.com/openai/deployments/emb",
                "headers": { "x-trace": "on" }
            }
        });
        let opts: EmbeddingProviderOptions = serde_json::from_value(json).unwrap();
        let remote = opts.remote.unwrap();
        assert_eq!(remote.api_key.as_deref(), Some("k-123"));
        assert_eq!(
            remote.base_url.as_deref(),
            Some("https://res.openai.azure.com/openai/deployments/emb")
        );
        assert_eq!(remote.headers.unwrap()["x-trace"], "on");
        assert_eq!(opts.agent_dir, Some(PathBuf::from("/tmp/agent")));
        assert!(opts.config.is_null());
    }

    #[test]
    fn missing_fields_default() {
        let opts: EmbeddingProviderOptions = serde_json::from_str("{}").unwrap();
        assert!(opts.remote.is_none());
        assert_eq!(opts.model, "");
        assert!(opts.agent_dir.is_none());
    }

    #[test]
    fn with_header_last_value_wins() {
        let remote = RemoteOptions::default()
            .with_header("x-a", "1")
            .with_header("x-a", "2");
        assert_eq!(remote.headers.unwrap()["x-a"], "2");
    }

    #[test]
    fn debug_redacts_api_key() {
        let remote = RemoteOptions::default()
            .with_api_key("super-private")
            .with_header("api-key", "also-private");
        let debug = format!("{remote:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-private"));
        assert!(!debug.contains("also-private"));
    }
}
