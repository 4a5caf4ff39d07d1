//! Wire types for the Qdrant REST surface

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{Distance, DomainError};

/// Reserved point id of the per-collection metadata sentinel.
pub const METADATA_POINT_ID: &str = "__knowledge_metadata__";

const UNRESOLVED_VECTOR_SIZE: &str = "无法确定集合的向量维度";

/// Payload discriminator separating content chunks from the metadata sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Chunk,
    Metadata,
    /// Anything this service did not write.
    #[serde(other)]
    Unknown,
}

/// Point id as the store represents it: numeric or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointId {
    Num(u64),
    Str(String),
}

impl From<&str> for PointId {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PointId {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl std::fmt::Display for PointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Num(id) => write!(f, "{}", id),
            Self::Str(id) => write!(f, "{}", id),
        }
    }
}

/// Opaque scroll cursor. String or number depending on the store response;
/// never parsed or compared, only handed back on the next page request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScrollOffset {
    Num(u64),
    Str(String),
}

/// Entry of the `GET /collections` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSummary {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionsResult {
    pub collections: Vec<CollectionSummary>,
}

/// Detail of one collection as reported by `GET /collections/{name}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionDetail {
    pub status: String,
    #[serde(default)]
    pub points_count: u64,
    pub config: CollectionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    pub params: CollectionParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionParams {
    #[serde(default)]
    pub vectors: Option<VectorParams>,
}

/// The three historical shapes of the `vectors` configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VectorParams {
    Size(u64),
    Single(VectorSpec),
    Named(HashMap<String, VectorSpec>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct VectorSpec {
    pub size: u64,
    #[serde(default)]
    pub distance: Option<String>,
}

impl CollectionConfig {
    /// Resolve the configured dimensionality, whatever config shape the
    /// collection was created with.
    pub fn vector_size(&self) -> Result<u64, DomainError> {
        match &self.params.vectors {
            Some(VectorParams::Size(size)) => Ok(*size),
            Some(VectorParams::Single(spec)) => Ok(spec.size),
            Some(VectorParams::Named(specs)) => specs
                .values()
                .map(|spec| spec.size)
                .find(|size| *size > 0)
                .ok_or_else(|| DomainError::configuration(UNRESOLVED_VECTOR_SIZE)),
            None => Err(DomainError::configuration(UNRESOLVED_VECTOR_SIZE)),
        }
    }

    /// Distance metric, when the config shape carries one.
    pub fn distance(&self) -> Option<Distance> {
        match &self.params.vectors {
            Some(VectorParams::Single(spec)) => {
                spec.distance.as_deref().and_then(Distance::parse)
            }
            Some(VectorParams::Named(specs)) => specs
                .values()
                .find_map(|spec| spec.distance.as_deref().and_then(Distance::parse)),
            _ => None,
        }
    }
}

/// Payload stored on every point this service writes.
///
/// `displayName` and `description` belong to the metadata sentinel; the
/// remaining optional fields belong to chunk points. Field names keep the
/// camelCase spelling already present in deployed collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<PayloadKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Point returned by scroll/retrieve calls (vectors never requested).
#[derive(Debug, Clone, Deserialize)]
pub struct PointRecord {
    pub id: PointId,
    #[serde(default)]
    pub payload: Option<PointPayload>,
}

/// Body of `POST /collections/{name}/points/scroll`.
#[derive(Debug, Clone, Serialize)]
pub struct ScrollRequest {
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<ScrollOffset>,
    pub with_payload: bool,
    pub with_vectors: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrollResult {
    pub points: Vec<PointRecord>,
    #[serde(default)]
    pub next_page_offset: Option<ScrollOffset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrieveResult {
    pub points: Vec<PointRecord>,
}

/// Point written by `PUT /collections/{name}/points`.
#[derive(Debug, Clone, Serialize)]
pub struct UpsertPoint {
    pub id: PointId,
    pub vector: Vec<f32>,
    pub payload: PointPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(vectors: Value) -> CollectionConfig {
        serde_json::from_value(json!({ "params": { "vectors": vectors } })).unwrap()
    }

    #[test]
    fn test_vector_size_from_bare_integer() {
        assert_eq!(config(json!(768)).vector_size().unwrap(), 768);
    }

    #[test]
    fn test_vector_size_from_single_vector_object() {
        let config = config(json!({ "size": 4, "distance": "Cosine" }));
        assert_eq!(config.vector_size().unwrap(), 4);
        assert_eq!(config.distance(), Some(Distance::Cosine));
    }

    #[test]
    fn test_vector_size_from_named_vector_map() {
        let config = config(json!({ "default": { "size": 1536, "distance": "Dot" } }));
        assert_eq!(config.vector_size().unwrap(), 1536);
        assert_eq!(config.distance(), Some(Distance::Dot));
    }

    #[test]
    fn test_vector_size_unresolvable() {
        let config: CollectionConfig =
            serde_json::from_value(json!({ "params": {} })).unwrap();
        let error = config.vector_size().unwrap_err();
        assert_eq!(error.to_string(), "无法确定集合的向量维度");
    }

    #[test]
    fn test_unknown_distance_is_ignored() {
        let config = config(json!({ "size": 4, "distance": "Manhattan" }));
        assert_eq!(config.distance(), None);
    }

    #[test]
    fn test_point_id_round_trip() {
        let numeric: PointId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(numeric, PointId::Num(42));
        assert_eq!(numeric.to_string(), "42");

        let text: PointId = serde_json::from_value(json!("chunk-1")).unwrap();
        assert_eq!(text, PointId::Str("chunk-1".to_string()));
        assert_eq!(serde_json::to_value(&text).unwrap(), json!("chunk-1"));
    }

    #[test]
    fn test_scroll_offset_stays_opaque() {
        let numeric: ScrollOffset = serde_json::from_value(json!(128)).unwrap();
        assert_eq!(serde_json::to_value(&numeric).unwrap(), json!(128));

        let id: ScrollOffset =
            serde_json::from_value(json!("019097cb-0000-7000-8000-000000000000")).unwrap();
        assert_eq!(
            serde_json::to_value(&id).unwrap(),
            json!("019097cb-0000-7000-8000-000000000000")
        );
    }

    #[test]
    fn test_payload_unknown_kind_tolerated() {
        let payload: PointPayload =
            serde_json::from_value(json!({ "kind": "draft", "text": "x" })).unwrap();
        assert_eq!(payload.kind, Some(PayloadKind::Unknown));
    }

    #[test]
    fn test_payload_serializes_camel_case_and_skips_absent() {
        let payload = PointPayload {
            kind: Some(PayloadKind::Metadata),
            display_name: Some("风险政策".to_string()),
            tags: Some(vec![]),
            ..Default::default()
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "metadata");
        assert_eq!(json["displayName"], "风险政策");
        assert!(json.get("text").is_none());
        assert!(json.get("updatedAt").is_none());
    }
}
