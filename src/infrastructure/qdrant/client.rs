//! Thin HTTP client for the Qdrant REST API

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::types::{
    CollectionDetail, CollectionsResult, CollectionSummary, PointId, PointRecord, RetrieveResult,
    ScrollRequest, ScrollResult, UpsertPoint,
};
use crate::domain::{Distance, DomainError};

pub const DEFAULT_QDRANT_URL: &str = "http://127.0.0.1:6333";

/// Request wrapper around the vector store REST API.
///
/// Holds no cache and no pooling beyond what reqwest provides. Failures
/// surface immediately; there is no retry in this path, a transient upstream
/// failure is the caller's to retry.
#[derive(Debug, Clone)]
pub struct QdrantClient {
    http: reqwest::Client,
    base_url: String,
}

impl QdrantClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Issue a JSON request against the store and decode the response body.
    ///
    /// Non-2xx responses become [`DomainError::VectorStore`] carrying the
    /// HTTP status and a best-effort message from the error envelope; a 204
    /// yields an empty object.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, DomainError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "qdrant request");

        let mut request = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::internal(format!("Qdrant request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let message = extract_error_message(response).await.unwrap_or_else(|| {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            });
            return Err(DomainError::vector_store(status.as_u16(), message));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Object(Map::new()));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::internal(format!("Qdrant response was not JSON: {}", e)))
    }

    /// `GET /collections`
    pub async fn list_collections(&self) -> Result<Vec<CollectionSummary>, DomainError> {
        let value = self.request(Method::GET, "/collections", None).await?;
        let result: CollectionsResult = decode_result(value)?;
        Ok(result.collections)
    }

    /// `GET /collections/{name}`
    pub async fn collection_detail(&self, name: &str) -> Result<CollectionDetail, DomainError> {
        let value = self
            .request(Method::GET, &collection_path(name), None)
            .await?;
        decode_result(value)
    }

    /// `PUT /collections/{name}` with the vector configuration.
    pub async fn create_collection(
        &self,
        name: &str,
        vector_size: u64,
        distance: Distance,
    ) -> Result<(), DomainError> {
        let body = json!({
            "vectors": {
                "size": vector_size,
                "distance": distance.as_str(),
            }
        });

        self.request(Method::PUT, &collection_path(name), Some(body))
            .await?;
        Ok(())
    }

    /// `DELETE /collections/{name}`; cascades to every point.
    pub async fn delete_collection(&self, name: &str) -> Result<(), DomainError> {
        self.request(Method::DELETE, &collection_path(name), None)
            .await?;
        Ok(())
    }

    /// `PUT /collections/{name}/points`
    pub async fn upsert_points(
        &self,
        collection: &str,
        points: &[UpsertPoint],
    ) -> Result<(), DomainError> {
        let body = json!({ "points": points });

        self.request(
            Method::PUT,
            &format!("{}/points", collection_path(collection)),
            Some(body),
        )
        .await?;
        Ok(())
    }

    /// `POST /collections/{name}/points/scroll`
    pub async fn scroll(
        &self,
        collection: &str,
        request: &ScrollRequest,
    ) -> Result<ScrollResult, DomainError> {
        let value = self
            .request(
                Method::POST,
                &format!("{}/points/scroll", collection_path(collection)),
                Some(serde_json::to_value(request).map_err(|e| {
                    DomainError::internal(format!("failed to encode scroll request: {}", e))
                })?),
            )
            .await?;
        decode_result(value)
    }

    /// `POST /collections/{name}/points/retrieve`; payload only, no vectors.
    pub async fn retrieve(
        &self,
        collection: &str,
        ids: &[PointId],
    ) -> Result<Vec<PointRecord>, DomainError> {
        let body = json!({
            "ids": ids,
            "with_payload": true,
            "with_vectors": false,
        });

        let value = self
            .request(
                Method::POST,
                &format!("{}/points/retrieve", collection_path(collection)),
                Some(body),
            )
            .await?;
        let result: RetrieveResult = decode_result(value)?;
        Ok(result.points)
    }

    /// `POST /collections/{name}/points/delete`
    pub async fn delete_points(
        &self,
        collection: &str,
        ids: &[PointId],
    ) -> Result<(), DomainError> {
        let body = json!({ "points": ids });

        self.request(
            Method::POST,
            &format!("{}/points/delete", collection_path(collection)),
            Some(body),
        )
        .await?;
        Ok(())
    }
}

fn collection_path(name: &str) -> String {
    format!("/collections/{}", urlencoding::encode(name))
}

/// Pull the `result` field out of the store's `{result, status, time}`
/// envelope and decode it.
fn decode_result<T: DeserializeOwned>(mut value: Value) -> Result<T, DomainError> {
    let result = value
        .get_mut("result")
        .map(Value::take)
        .unwrap_or(Value::Null);

    serde_json::from_value(result)
        .map_err(|e| DomainError::internal(format!("unexpected Qdrant response shape: {}", e)))
}

/// Best-effort extraction from the JSON error envelope. The store has used
/// several shapes over time: a bare string body, `{"status":{"error":..}}`,
/// and `{"error":..}`; anything else is surfaced verbatim.
async fn extract_error_message(response: reqwest::Response) -> Option<String> {
    let body: Value = response.json().await.ok()?;

    if let Value::String(message) = &body {
        return Some(message.clone());
    }

    if let Some(message) = body.pointer("/status/error").and_then(Value::as_str) {
        return Some(message.to_string());
    }

    if let Some(message) = body.get("error").and_then(Value::as_str) {
        return Some(message.to_string());
    }

    Some(body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_collection_path_is_percent_encoded() {
        assert_eq!(collection_path("policy-v1"), "/collections/policy-v1");
        assert_eq!(
            collection_path("风险 管理"),
            "/collections/%E9%A3%8E%E9%99%A9%20%E7%AE%A1%E7%90%86"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = QdrantClient::new("http://localhost:6333/");
        assert_eq!(client.base_url, "http://localhost:6333");
    }

    #[tokio::test]
    async fn test_list_collections_decodes_result_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/collections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": { "collections": [{ "name": "policy-v1" }, { "name": "faq" }] },
                "status": "ok",
                "time": 0.00001
            })))
            .mount(&server)
            .await;

        let client = QdrantClient::new(server.uri());
        let collections = client.list_collections().await.unwrap();
        let names: Vec<_> = collections.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["policy-v1", "faq"]);
    }

    #[tokio::test]
    async fn test_create_collection_sends_vector_config() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/collections/policy-v1"))
            .and(body_json(serde_json::json!({
                "vectors": { "size": 4, "distance": "Cosine" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": true, "status": "ok", "time": 0.01
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = QdrantClient::new(server.uri());
        client
            .create_collection("policy-v1", 4, Distance::Cosine)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_nested_status_error_envelope_is_extracted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/collections/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "status": { "error": "Collection `missing` doesn't exist!" },
                "time": 0.0
            })))
            .mount(&server)
            .await;

        let client = QdrantClient::new(server.uri());
        let error = client.collection_detail("missing").await.unwrap_err();
        assert_eq!(
            error.to_string(),
            "Qdrant request failed (404): Collection `missing` doesn't exist!"
        );
    }

    #[tokio::test]
    async fn test_flat_error_envelope_is_extracted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/collections"))
            .respond_with(
                ResponseTemplate::new(503)
                    .set_body_json(serde_json::json!({ "error": "service unavailable" })),
            )
            .mount(&server)
            .await;

        let client = QdrantClient::new(server.uri());
        let error = client.list_collections().await.unwrap_err();
        assert_eq!(
            error.to_string(),
            "Qdrant request failed (503): service unavailable"
        );
    }

    #[tokio::test]
    async fn test_string_body_error_envelope_is_extracted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/collections"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!("bad request")))
            .mount(&server)
            .await;

        let client = QdrantClient::new(server.uri());
        let error = client.list_collections().await.unwrap_err();
        assert_eq!(error.to_string(), "Qdrant request failed (400): bad request");
    }

    #[tokio::test]
    async fn test_non_json_error_falls_back_to_status_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/collections"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let client = QdrantClient::new(server.uri());
        let error = client.list_collections().await.unwrap_err();
        assert_eq!(error.to_string(), "Qdrant request failed (502): Bad Gateway");
    }

    #[tokio::test]
    async fn test_no_content_yields_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/collections/old"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = QdrantClient::new(server.uri());
        client.delete_collection("old").await.unwrap();
    }
}
