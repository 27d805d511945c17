use std::collections::BTreeMap;
use std::sync::Arc;

use mnemo_embedding::EmbeddingError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Value, json};
use tracing::debug;

use crate::endpoint::NormalizedEndpoint;
use crate::error::AzureOpenAiError;
use crate::transport::EmbeddingTransport;

/// Issues embedding requests against one validated Azure OpenAI endpoint.
///
/// Holds no mutable state; calls may run concurrently.
pub struct AzureOpenAiEmbeddingClient {
    endpoint: NormalizedEndpoint,
    headers: HeaderMap,
    model: String,
    transport: Arc<dyn EmbeddingTransport>,
}

impl std::fmt::Debug for AzureOpenAiEmbeddingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureOpenAiEmbeddingClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl AzureOpenAiEmbeddingClient {
    /// Bind a client to `endpoint`.
    ///
    /// Fails if a header name or value cannot be sent over HTTP.
    pub fn new(
        endpoint: NormalizedEndpoint,
        headers: &BTreeMap<String, String>,
        model: impl Into<String>,
        transport: Arc<dyn EmbeddingTransport>,
    ) -> Result<Self, AzureOpenAiError> {
        Ok(Self {
            endpoint,
            headers: build_header_map(headers)?,
            model: model.into(),
            transport,
        })
    }

    pub fn endpoint(&self) -> &NormalizedEndpoint {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Embed `texts` in one request.
    ///
    /// An empty slice returns immediately without touching the network. The
    /// result is aligned to `texts` by position; entries the server omits or
    /// malforms come back as empty vectors.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut body = json!({ "input": texts });
        if !self.model.is_empty() {
            body["model"] = json!(self.model);
        }

        debug!(
            host = self.endpoint.url().host_str().unwrap_or_default(),
            model = %self.model,
            batch_size = texts.len(),
            "requesting azure openai embeddings"
        );

        let response = self
            .transport
            .post_json(self.endpoint.url(), &self.headers, &body)
            .await?;

        if !response.is_success() {
            debug!(status = response.status, "azure openai embeddings request failed");
            return Err(EmbeddingError::Api {
                status: response.status,
                body: response.body,
            });
        }

        let payload: Value = serde_json::from_str(&response.body)
            .map_err(|e| EmbeddingError::Parse(format!("invalid embeddings response: {e}")))?;
        let vectors = vectors_from_response(&payload);

        debug!(
            count = vectors.len(),
            dimension = vectors.first().map_or(0, Vec::len),
            "azure openai embeddings received"
        );
        Ok(vectors)
    }

    /// Embed a single text. A response without entries yields an empty vector.
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.embed_batch(&[text.to_owned()]).await?;
        if vectors.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(vectors.swap_remove(0))
        }
    }
}

fn build_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, AzureOpenAiError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| AzureOpenAiError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let mut header_value =
            HeaderValue::from_str(value).map_err(|e| AzureOpenAiError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        if header_name.as_str().eq_ignore_ascii_case(crate::resolver::API_KEY_HEADER) {
            header_value.set_sensitive(true);
        }
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Map `data[i].embedding` to vectors, position by position.
///
/// A missing `data` array yields no vectors. An entry without a numeric
/// `embedding` array yields an empty vector in its slot.
fn vectors_from_response(payload: &Value) -> Vec<Vec<f32>> {
    payload
        .get("data")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().map(embedding_of).collect())
        .unwrap_or_default()
}

#[allow(clippy::cast_possible_truncation)]
fn embedding_of(entry: &Value) -> Vec<f32> {
    entry
        .get("embedding")
        .and_then(Value::as_array)
        .and_then(|values| {
            values
                .iter()
                .map(|v| v.as_f64().map(|f| f as f32))
                .collect::<Option<Vec<f32>>>()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::normalize_base_url;
    use crate::mock::MockTransport;

    const BASE_URL: &str =
        "https://res.openai.azure.com/openai/deployments/emb?api-version=2023-05-15";

    fn headers() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("Content-Type".to_owned(), "application/json".to_owned()),
            ("api-key".to_owned(), "k-123".to_owned()),
        ])
    }

    fn client(model: &str, transport: Arc<MockTransport>) -> AzureOpenAiEmbeddingClient {
        let endpoint = normalize_base_url(BASE_URL).unwrap();
        AzureOpenAiEmbeddingClient::new(endpoint, &headers(), model, transport).unwrap()
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[tokio::test]
    async fn empty_batch_makes_no_request() {
        let transport = Arc::new(MockTransport::new());
        let client = client("m", Arc::clone(&transport));

        let result = client.embed_batch(&[]).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_entries_keep_positional_alignment() {
        let transport = Arc::new(MockTransport::responding(
            200,
            r#"{"data":[{"embedding":[1,2]},{},{"embedding":[3,4]}]}"#,
        ));
        let client = client("m", Arc::clone(&transport));

        let result = client.embed_batch(&texts(&["a", "b", "c"])).await.unwrap();

        assert_eq!(result, vec![vec![1.0, 2.0], vec![], vec![3.0, 4.0]]);
    }

    #[tokio::test]
    async fn malformed_entry_degrades_to_empty_vector() {
        let transport = Arc::new(MockTransport::responding(
            200,
            r#"{"data":[{"embedding":[1,"x"]},{"embedding":null},{"embedding":[0.5]}]}"#,
        ));
        let client = client("m", transport);

        let result = client.embed_batch(&texts(&["a", "b", "c"])).await.unwrap();

        assert_eq!(result, vec![vec![], vec![], vec![0.5]]);
    }

    #[tokio::test]
    async fn missing_data_yields_no_vectors() {
        let transport = Arc::new(MockTransport::responding(200, r#"{"object":"list"}"#));
        let client = client("m", transport);

        let result = client.embed_batch(&texts(&["a"])).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn request_carries_input_model_and_headers() {
        let transport = Arc::new(MockTransport::new());
        let client = client("text-embedding-3-small", Arc::clone(&transport));

        client.embed_batch(&texts(&["a", "b"])).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(
            request.body,
            json!({ "input": ["a", "b"], "model": "text-embedding-3-small" })
        );
        assert_eq!(request.url.as_str(), client.endpoint().as_str());
        assert_eq!(request.headers["api-key"], "k-123");
        assert_eq!(request.headers["content-type"], "application/json");
        assert!(request.headers["api-key"].is_sensitive());
    }

    #[tokio::test]
    async fn empty_model_is_omitted_from_body() {
        let transport = Arc::new(MockTransport::new());
        let client = client("", Arc::clone(&transport));

        client.embed_batch(&texts(&["a"])).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.body, json!({ "input": ["a"] }));
        assert!(request.body.get("model").is_none());
    }

    #[tokio::test]
    async fn error_status_surfaces_code_and_body() {
        let transport = Arc::new(MockTransport::responding(429, "rate limited"));
        let client = client("m", transport);

        let err = client.embed_batch(&texts(&["a", "b"])).await.unwrap_err();

        assert!(matches!(err, EmbeddingError::Api { status: 429, .. }));
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("rate limited"));
    }

    #[tokio::test]
    async fn invalid_json_is_parse_error() {
        let transport = Arc::new(MockTransport::responding(200, "<html>oops</html>"));
        let client = client("m", transport);

        let err = client.embed_batch(&texts(&["a"])).await.unwrap_err();

        assert!(matches!(err, EmbeddingError::Parse(_)));
    }

    #[tokio::test]
    async fn query_returns_first_vector() {
        let transport = Arc::new(MockTransport::responding(
            200,
            r#"{"data":[{"embedding":[0.25,0.75]}]}"#,
        ));
        let client = client("m", Arc::clone(&transport));

        let result = client.embed_query("x").await.unwrap();

        assert_eq!(result, vec![0.25, 0.75]);
        assert_eq!(transport.last_request().unwrap().body["input"], json!(["x"]));
    }

    #[tokio::test]
    async fn query_with_no_entries_returns_empty_vector() {
        let transport = Arc::new(MockTransport::responding(200, r#"{"data":[]}"#));
        let client = client("m", transport);

        let result = client.embed_query("x").await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn client_stays_usable_after_failure() {
        let transport = Arc::new(MockTransport::responding(500, "boom"));
        transport.push_response(200, r#"{"data":[{"embedding":[1]}]}"#);
        let client = client("m", transport);

        assert!(client.embed_query("x").await.is_err());
        assert_eq!(client.embed_query("x").await.unwrap(), vec![1.0]);
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let endpoint = normalize_base_url(BASE_URL).unwrap();
        let mut headers = headers();
        headers.insert("bad header".to_owned(), "v".to_owned());

        let err = AzureOpenAiEmbeddingClient::new(
            endpoint,
            &headers,
            "m",
            Arc::new(MockTransport::new()),
        )
        .unwrap_err();

        assert!(
            matches!(err, AzureOpenAiError::InvalidHeader { ref name, .. } if name == "bad header")
        );
    }
}
