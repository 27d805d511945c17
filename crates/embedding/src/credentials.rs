use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::CredentialError;

/// Context for a single API-key lookup.
#[derive(Debug, Clone, Copy)]
pub struct ApiKeyRequest<'a> {
    /// Provider identifier (e.g. `"azure-openai"`).
    pub provider: &'a str,
    /// Active configuration tree.
    pub config: &'a serde_json::Value,
    /// Agent working directory, if any.
    pub agent_dir: Option<&'a Path>,
}

/// Resolves provider API keys from whatever secret sources are available.
#[async_trait]
pub trait ApiKeyResolver: Send + Sync {
    /// Look up a key. `Ok(None)` means this source has nothing for the provider.
    async fn resolve_api_key(
        &self,
        request: &ApiKeyRequest<'_>,
    ) -> Result<Option<SecretString>, CredentialError>;

    /// Look up a key and fail with [`CredentialError::MissingApiKey`] when
    /// nothing usable (absent or blank) is found.
    async fn require_api_key(
        &self,
        request: &ApiKeyRequest<'_>,
    ) -> Result<SecretString, CredentialError> {
        match self.resolve_api_key(request).await? {
            Some(key) if !key.expose_secret().trim().is_empty() => Ok(key),
            _ => Err(CredentialError::MissingApiKey {
                provider: request.provider.to_owned(),
            }),
        }
    }
}

/// Environment variable conventionally holding a provider's key.
///
/// `azure-openai` becomes `AZURE_OPENAI_API_KEY`.
pub fn env_var_for_provider(provider: &str) -> String {
    let mut name: String = provider
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    name.push_str("_API_KEY");
    name
}

/// Resolver backed by a fixed provider-to-key map.
#[derive(Default, Clone)]
pub struct StaticApiKeyResolver {
    keys: HashMap<String, String>,
}

impl std::fmt::Debug for StaticApiKeyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticApiKeyResolver")
            .field("providers", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl StaticApiKeyResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key for a provider.
    #[must_use]
    pub fn with_key(mut self, provider: impl Into<String>, key: impl Into<String>) -> Self {
        self.keys.insert(provider.into(), key.into());
        self
    }
}

#[async_trait]
impl ApiKeyResolver for StaticApiKeyResolver {
    async fn resolve_api_key(
        &self,
        request: &ApiKeyRequest<'_>,
    ) -> Result<Option<SecretString>, CredentialError> {
        Ok(self
            .keys
            .get(request.provider)
            .map(|key| SecretString::new(key.clone())))
    }
}

/// Resolver reading keys from process environment variables.
///
/// By default the variable name is derived with [`env_var_for_provider`];
/// explicit mappings registered with [`with_var`](Self::with_var) take
/// precedence.
#[derive(Debug, Default, Clone)]
pub struct EnvApiKeyResolver {
    vars: HashMap<String, String>,
}

impl EnvApiKeyResolver {
    /// Create a resolver using the derived variable names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `provider`'s key from `var` instead of the derived name.
    #[must_use]
    pub fn with_var(mut self, provider: impl Into<String>, var: impl Into<String>) -> Self {
        self.vars.insert(provider.into(), var.into());
        self
    }

    fn var_name(&self, provider: &str) -> String {
        self.vars
            .get(provider)
            .cloned()
            .unwrap_or_else(|| env_var_for_provider(provider))
    }
}

#[async_trait]
impl ApiKeyResolver for EnvApiKeyResolver {
    async fn resolve_api_key(
        &self,
        request: &ApiKeyRequest<'_>,
    ) -> Result<Option<SecretString>, CredentialError> {
        let var = self.var_name(request.provider);
        let value = std::env::var(&var)
            .ok()
            .filter(|v| !v.trim().is_empty());
        debug!(provider = request.provider, var = %var, found = value.is_some(), "env api key lookup");
        Ok(value.map(SecretString::new))
    }
}

/// Resolver reading `models.providers.<provider>.apiKey` from the active
/// configuration tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigApiKeyResolver;

#[async_trait]
impl ApiKeyResolver for ConfigApiKeyResolver {
    async fn resolve_api_key(
        &self,
        request: &ApiKeyRequest<'_>,
    ) -> Result<Option<SecretString>, CredentialError> {
        let Some(value) = request
            .config
            .get("models")
            .and_then(|m| m.get("providers"))
            .and_then(|p| p.get(request.provider))
            .and_then(|p| p.get("apiKey"))
        else {
            return Ok(None);
        };

        match value {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(key) => Ok(Some(SecretString::new(key.clone()))),
            other => Err(CredentialError::Lookup(format!(
                "models.providers.{}.apiKey must be a string, got {}",
                request.provider,
                json_kind(other)
            ))),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Tries each resolver in order; the first non-blank key wins.
///
/// A lookup error from any resolver aborts the chain.
#[derive(Default, Clone)]
pub struct ChainedApiKeyResolver {
    resolvers: Vec<Arc<dyn ApiKeyResolver>>,
}

impl std::fmt::Debug for ChainedApiKeyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainedApiKeyResolver")
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}

impl ChainedApiKeyResolver {
    /// Create an empty chain. An empty chain never finds a key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resolver to the end of the chain.
    #[must_use]
    pub fn with(mut self, resolver: Arc<dyn ApiKeyResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    /// Config tree first, then environment.
    pub fn standard() -> Self {
        Self::new()
            .with(Arc::new(ConfigApiKeyResolver))
            .with(Arc::new(EnvApiKeyResolver::new()))
    }
}

#[async_trait]
impl ApiKeyResolver for ChainedApiKeyResolver {
    async fn resolve_api_key(
        &self,
        request: &ApiKeyRequest<'_>,
    ) -> Result<Option<SecretString>, CredentialError> {
        for resolver in &self.resolvers {
            if let Some(key) = resolver.resolve_api_key(request).await?
                && !key.expose_secret().trim().is_empty()
            {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }
}
