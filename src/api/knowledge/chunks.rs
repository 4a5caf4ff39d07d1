//! Chunk endpoints within a knowledge base

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{lenient, ApiError, DataResponse, Json, SuccessResponse};
use crate::domain::KnowledgeChunk;
use crate::infrastructure::qdrant::ScrollOffset;
use crate::infrastructure::services::UpsertChunkRequest;

const CHUNK_NOT_FOUND: &str = "未找到指定 Chunk";
const EMPTY_TEXT: &str = "Chunk 内容不能为空";

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

/// Pagination query of the chunk listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkListQuery {
    pub limit: Option<i64>,
    pub offset: Option<String>,
}

/// Chunk create/update body. PATCH reuses it; absent fields keep the stored
/// values there.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertChunkBody {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_vec")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

/// `{"data": [...], "nextOffset": ...}` page envelope; the cursor is omitted
/// once the listing is exhausted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkPageResponse {
    pub data: Vec<KnowledgeChunk>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_offset: Option<ScrollOffset>,
}

/// GET /api/knowledge/collections/{collection}/chunks
pub async fn list_chunks(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(query): Query<ChunkListQuery>,
) -> Result<Json<ChunkPageResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT) as usize;
    let offset = parse_offset(query.offset);

    debug!(collection = %collection, limit, "listing chunks");

    let page = state
        .knowledge_service
        .fetch_chunks(&collection, limit, offset)
        .await?;

    Ok(Json(ChunkPageResponse {
        data: page.chunks,
        next_offset: page.next_offset,
    }))
}

/// POST /api/knowledge/collections/{collection}/chunks
pub async fn create_chunk(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(body): Json<UpsertChunkBody>,
) -> Result<(StatusCode, Json<DataResponse<KnowledgeChunk>>), ApiError> {
    let text = body.text.as_deref().unwrap_or_default().trim().to_string();
    if text.is_empty() {
        return Err(ApiError::bad_request(EMPTY_TEXT));
    }

    debug!(collection = %collection, "creating chunk");

    let data = state
        .knowledge_service
        .upsert_chunk(
            &collection,
            UpsertChunkRequest {
                id: body.id,
                text,
                title: body.title.map(|value| value.trim().to_string()),
                source: body.source.map(|value| value.trim().to_string()),
                tags: body.tags.unwrap_or_default(),
                metadata: body.metadata.unwrap_or_default(),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/knowledge/collections/{collection}/chunks/{chunk_id}
pub async fn get_chunk(
    State(state): State<AppState>,
    Path((collection, chunk_id)): Path<(String, String)>,
) -> Result<Json<DataResponse<KnowledgeChunk>>, ApiError> {
    debug!(collection = %collection, chunk_id = %chunk_id, "getting chunk");

    let data = state
        .knowledge_service
        .get_chunk(&collection, &chunk_id)
        .await?
        .ok_or_else(|| ApiError::not_found(CHUNK_NOT_FOUND))?;

    Ok(Json(DataResponse { data }))
}

/// PATCH /api/knowledge/collections/{collection}/chunks/{chunk_id}
///
/// Rebuilds the complete record from the stored chunk plus the provided
/// fields; the vector store layer only knows full-record upserts.
pub async fn update_chunk(
    State(state): State<AppState>,
    Path((collection, chunk_id)): Path<(String, String)>,
    Json(body): Json<UpsertChunkBody>,
) -> Result<Json<DataResponse<KnowledgeChunk>>, ApiError> {
    let existing = state
        .knowledge_service
        .get_chunk(&collection, &chunk_id)
        .await?
        .ok_or_else(|| ApiError::not_found(CHUNK_NOT_FOUND))?;

    let text = body
        .text
        .map(|value| value.trim().to_string())
        .unwrap_or(existing.text);
    if text.is_empty() {
        return Err(ApiError::bad_request(EMPTY_TEXT));
    }

    let title = body.title.map(|value| value.trim().to_string()).or(existing.title);
    let source = body
        .source
        .map(|value| value.trim().to_string())
        .or(existing.source);

    debug!(collection = %collection, chunk_id = %chunk_id, "updating chunk");

    let data = state
        .knowledge_service
        .upsert_chunk(
            &collection,
            UpsertChunkRequest {
                id: Some(chunk_id),
                text,
                title,
                source,
                tags: body.tags.unwrap_or(existing.tags),
                metadata: body.metadata.unwrap_or(existing.metadata),
            },
        )
        .await?;

    Ok(Json(DataResponse { data }))
}

/// DELETE /api/knowledge/collections/{collection}/chunks/{chunk_id}
pub async fn delete_chunk(
    State(state): State<AppState>,
    Path((collection, chunk_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>, ApiError> {
    debug!(collection = %collection, chunk_id = %chunk_id, "deleting chunk");

    state
        .knowledge_service
        .delete_chunk(&collection, &chunk_id)
        .await?;

    Ok(Json(SuccessResponse::ok()))
}

/// Numeric-looking offsets travel as numbers, everything else stays an
/// opaque string.
fn parse_offset(value: Option<String>) -> Option<ScrollOffset> {
    let value = value?;

    if value.is_empty() {
        return None;
    }

    match value.parse::<u64>() {
        Ok(numeric) => Some(ScrollOffset::Num(numeric)),
        Err(_) => Some(ScrollOffset::Str(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset(None), None);
        assert_eq!(parse_offset(Some(String::new())), None);
        assert_eq!(parse_offset(Some("128".to_string())), Some(ScrollOffset::Num(128)));
        assert_eq!(
            parse_offset(Some("019097cb-0001".to_string())),
            Some(ScrollOffset::Str("019097cb-0001".to_string()))
        );
    }

    #[test]
    fn test_limit_clamps_to_range() {
        assert_eq!(0i64.clamp(1, MAX_LIMIT), 1);
        assert_eq!(500i64.clamp(1, MAX_LIMIT), 200);
        assert_eq!(DEFAULT_LIMIT.clamp(1, MAX_LIMIT), 50);
    }

    #[test]
    fn test_upsert_body_defaults() {
        let body: UpsertChunkBody = serde_json::from_value(json!({ "text": "hello" })).unwrap();
        assert_eq!(body.text.as_deref(), Some("hello"));
        assert!(body.id.is_none());
        assert!(body.tags.is_none());
        assert!(body.metadata.is_none());
    }

    #[test]
    fn test_upsert_body_tolerates_wrong_types() {
        let body: UpsertChunkBody = serde_json::from_value(json!({
            "id": 9,
            "text": "hello",
            "tags": "loan",
            "metadata": [1, 2],
        }))
        .unwrap();

        assert!(body.id.is_none());
        assert!(body.tags.is_none());
        assert!(body.metadata.is_none());
    }

    #[test]
    fn test_page_response_omits_exhausted_cursor() {
        let response = ChunkPageResponse {
            data: vec![],
            next_offset: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, "{\"data\":[]}");

        let response = ChunkPageResponse {
            data: vec![],
            next_offset: Some(ScrollOffset::Num(9)),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, "{\"data\":[],\"nextOffset\":9}");
    }
}
