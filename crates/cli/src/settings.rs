//! Provider options loaded from a TOML file and overridden by flags.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use mnemo_embedding::{EmbeddingProviderOptions, RemoteOptions};
use serde::Deserialize;

/// Contents of a `--config` file.
///
/// ```toml
/// model = "azure-openai/text-embedding-3-small"
/// timeoutSecs = 30
///
/// [remote]
/// baseUrl = "https://contoso.openai.azure.com/openai/deployments/emb?api-version=2023-05-15"
///
/// [remote.headers]
/// x-ms-useragent = "mnemo"
///
/// [config.models.providers.azure-openai]
/// apiKey = "..."
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(flatten)]
    pub options: EmbeddingProviderOptions,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Values given on the command line. `None` keeps the file value.
#[derive(Debug, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub headers: Vec<(String, String)>,
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid settings TOML")
    }

    /// Read settings from `path`, or start empty when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Self::from_toml_str(&text)
                    .with_context(|| format!("failed to load {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply command-line overrides on top of the file values.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        let mut remote = self.options.remote.take().unwrap_or_default();
        if let Some(base_url) = overrides.base_url {
            remote = remote.with_base_url(base_url);
        }
        if let Some(api_key) = overrides.api_key {
            remote = remote.with_api_key(api_key);
        }
        for (name, value) in overrides.headers {
            remote = remote.with_header(name, value);
        }
        self.options.remote = Some(remote);

        if let Some(model) = overrides.model {
            self.options.model = model;
        }
        if overrides.timeout_secs.is_some() {
            self.timeout_secs = overrides.timeout_secs;
        }
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn remote(&self) -> Option<&RemoteOptions> {
        self.options.remote.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
model = "azure-openai/text-embedding-3-small"
agentDir = "/srv/agent"
timeoutSecs = 15

[remote]
baseUrl = "https://contoso.openai.azure.com/openai/deployments/emb?api-version=2023-05-15"

[remote.headers]
x-ms-useragent = "mnemo"

[config.models.providers.azure-openai]
apiKey = "from-file"
"#;

    #[test]
    fn parses_sample_file() {
        let settings = Settings::from_toml_str(SAMPLE).unwrap();
        assert_eq!(settings.options.model, "azure-openai/text-embedding-3-small");
        assert_eq!(settings.timeout(), Some(Duration::from_secs(15)));
        let remote = settings.remote().unwrap();
        assert!(remote.base_url.as_deref().unwrap().contains("contoso"));
        assert_eq!(remote.headers.as_ref().unwrap()["x-ms-useragent"], "mnemo");
        assert_eq!(
            settings.options.config["models"]["providers"]["azure-openai"]["apiKey"],
            "from-file"
        );
    }

    #[test]
    fn flags_override_file_values() {
        let settings = Settings::from_toml_str(SAMPLE)
            .unwrap()
            .with_overrides(Overrides {
                base_url: Some("https://other.openai.azure.com/?api-version=1".into()),
                api_key: Some("flag-key".into()),
                model: Some("plain".into()),
                headers: vec![("x-ms-useragent".into(), "cli".into())],
                timeout_secs: None,
            });
        let remote = settings.remote().unwrap();
        assert_eq!(
            remote.base_url.as_deref(),
            Some("https://other.openai.azure.com/?api-version=1")
        );
        assert_eq!(remote.api_key.as_deref(), Some("flag-key"));
        assert_eq!(remote.headers.as_ref().unwrap()["x-ms-useragent"], "cli");
        assert_eq!(settings.options.model, "plain");
        assert_eq!(settings.timeout_secs, Some(15));
    }

    #[test]
    fn empty_file_is_valid() {
        let settings = Settings::from_toml_str("").unwrap();
        assert!(settings.remote().is_none());
        assert!(settings.timeout().is_none());
    }

    #[test]
    fn load_without_path_is_default() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.options.model, "");
    }
}
