use std::fmt;

use url::Url;

use crate::error::EndpointError;

const EMBEDDINGS_SEGMENT: &str = "embeddings";
const API_VERSION_PARAM: &str = "api-version";

/// A validated Azure OpenAI embeddings URL.
///
/// Always `https`, with a host, a path ending in `/embeddings`, and an
/// `api-version` query parameter. Only [`normalize_base_url`] builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEndpoint {
    url: Url,
}

impl NormalizedEndpoint {
    /// The full request URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The full request URL as a string.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Value of the `api-version` query parameter.
    pub fn api_version(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == API_VERSION_PARAM)
            .map(|(_, value)| value.into_owned())
    }
}

impl fmt::Display for NormalizedEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Validate and canonicalize a raw base URL.
///
/// Accepts either a deployment root or a full `.../embeddings` URL. Trailing
/// slashes are dropped and `/embeddings` is appended when the last path
/// segment is not already `embeddings` (ASCII case-insensitive). The query
/// string is left untouched but must carry `api-version`.
pub fn normalize_base_url(raw: &str) -> Result<NormalizedEndpoint, EndpointError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EndpointError::MissingBaseUrl);
    }

    let mut url = Url::parse(trimmed).map_err(|_| EndpointError::InvalidUrl {
        value: trimmed.to_owned(),
    })?;

    if url.scheme() != "https" {
        return Err(EndpointError::BadScheme {
            scheme: url.scheme().to_owned(),
        });
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(EndpointError::MissingHost);
    }

    let path = url.path().trim_end_matches('/');
    let path = if ends_with_embeddings_segment(path) {
        path.to_owned()
    } else {
        format!("{path}/{EMBEDDINGS_SEGMENT}")
    };
    url.set_path(&path);

    // Independent of the path rewrite above; both gates must pass.
    if !url.query_pairs().any(|(key, _)| key == API_VERSION_PARAM) {
        return Err(EndpointError::MissingApiVersion);
    }

    Ok(NormalizedEndpoint { url })
}

fn ends_with_embeddings_segment(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .is_some_and(|segment| segment.eq_ignore_ascii_case(EMBEDDINGS_SEGMENT))
}
