//! Knowledge base and chunk entities

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Similarity metric of a collection. Fixed at creation time.
///
/// Serialized with the exact capitalization the vector store expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distance {
    Cosine,
    Dot,
    Euclid,
}

impl Distance {
    /// Parse a metric name, accepting only the exact store spelling.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Cosine" => Some(Self::Cosine),
            "Dot" => Some(Self::Dot),
            "Euclid" => Some(Self::Euclid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "Cosine",
            Self::Dot => "Dot",
            Self::Euclid => "Euclid",
        }
    }
}

impl std::fmt::Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable descriptive data of a knowledge base, stored as the payload of the
/// sentinel metadata point inside the collection itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeMetadata {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// One knowledge base, backed by one vector store collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBase {
    /// Collection name; unique and immutable after creation.
    pub name: String,
    /// Operational status reported by the vector store.
    pub status: String,
    pub vector_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<Distance>,
    /// Point count minus the metadata sentinel, never negative.
    pub chunk_count: u64,
    pub metadata: KnowledgeMetadata,
}

/// One unit of retrievable text content within a knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeChunk {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub tags: Vec<String>,
    /// Opaque key-value data supplied by the caller.
    pub metadata: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_parse() {
        assert_eq!(Distance::parse("Cosine"), Some(Distance::Cosine));
        assert_eq!(Distance::parse("Dot"), Some(Distance::Dot));
        assert_eq!(Distance::parse("Euclid"), Some(Distance::Euclid));
        assert_eq!(Distance::parse("cosine"), None);
        assert_eq!(Distance::parse("Manhattan"), None);
    }

    #[test]
    fn test_distance_serialization() {
        assert_eq!(serde_json::to_string(&Distance::Cosine).unwrap(), "\"Cosine\"");
        assert_eq!(serde_json::to_string(&Distance::Euclid).unwrap(), "\"Euclid\"");
    }

    #[test]
    fn test_knowledge_base_wire_format_is_camel_case() {
        let base = KnowledgeBase {
            name: "policy-v1".to_string(),
            status: "green".to_string(),
            vector_size: 4,
            distance: Some(Distance::Cosine),
            chunk_count: 0,
            metadata: KnowledgeMetadata {
                display_name: "policy-v1".to_string(),
                description: None,
                tags: vec![],
            },
        };

        let json = serde_json::to_string(&base).unwrap();
        assert!(json.contains("\"vectorSize\":4"));
        assert!(json.contains("\"chunkCount\":0"));
        assert!(json.contains("\"displayName\":\"policy-v1\""));
        assert!(!json.contains("description"));
    }

    #[test]
    fn test_knowledge_chunk_omits_absent_fields() {
        let chunk = KnowledgeChunk {
            id: "c-1".to_string(),
            text: "hello".to_string(),
            title: None,
            source: None,
            tags: vec![],
            metadata: Map::new(),
            updated_at: Some("2024-05-01T00:00:00Z".to_string()),
        };

        let json = serde_json::to_string(&chunk).unwrap();
        assert!(json.contains("\"updatedAt\""));
        assert!(json.contains("\"tags\":[]"));
        assert!(json.contains("\"metadata\":{}"));
        assert!(!json.contains("\"title\""));
        assert!(!json.contains("\"source\""));
    }
}
