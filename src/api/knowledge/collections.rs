//! Knowledge base collection endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{lenient, ApiError, DataResponse, Json, SuccessResponse};
use crate::domain::{Distance, KnowledgeBase};
use crate::infrastructure::services::{CreateKnowledgeBaseRequest, MetadataUpdate};

/// Dimensionality used when the caller does not pick one.
const DEFAULT_VECTOR_SIZE: f64 = 1536.0;

/// Request to create a new knowledge base
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKnowledgeBaseBody {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub vector_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub distance: Option<String>,
}

/// Request to update the descriptive metadata of a knowledge base
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMetadataBody {
    #[serde(default, deserialize_with = "lenient::string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_vec")]
    pub tags: Option<Vec<String>>,
}

/// GET /api/knowledge/collections
pub async fn list_knowledge_bases(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<KnowledgeBase>>>, ApiError> {
    debug!("listing knowledge bases");

    let data = state.knowledge_service.list_knowledge_bases().await?;

    Ok(Json(DataResponse { data }))
}

/// POST /api/knowledge/collections
pub async fn create_knowledge_base(
    State(state): State<AppState>,
    Json(body): Json<CreateKnowledgeBaseBody>,
) -> Result<(StatusCode, Json<DataResponse<KnowledgeBase>>), ApiError> {
    let name = body.name.as_deref().unwrap_or_default().trim().to_string();
    if name.is_empty() {
        return Err(ApiError::bad_request("知识库名称不能为空"));
    }

    let vector_size = body.vector_size.unwrap_or(DEFAULT_VECTOR_SIZE);
    if !vector_size.is_finite() || vector_size <= 0.0 {
        return Err(ApiError::bad_request("向量维度必须为正数"));
    }

    let distance = body
        .distance
        .as_deref()
        .and_then(Distance::parse)
        .unwrap_or(Distance::Cosine);

    debug!(collection = %name, "creating knowledge base");

    let data = state
        .knowledge_service
        .create_knowledge_base(CreateKnowledgeBaseRequest {
            name,
            vector_size: vector_size as u64,
            distance,
            display_name: body.display_name,
            description: body.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/knowledge/collections/{collection}
pub async fn get_knowledge_base(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<DataResponse<KnowledgeBase>>, ApiError> {
    debug!(collection = %collection, "getting knowledge base");

    let data = state.knowledge_service.get_knowledge_base(&collection).await?;

    Ok(Json(DataResponse { data }))
}

/// PATCH /api/knowledge/collections/{collection}
pub async fn update_metadata(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(body): Json<UpdateMetadataBody>,
) -> Result<Json<DataResponse<KnowledgeBase>>, ApiError> {
    let display_name = body.display_name.map(|value| value.trim().to_string());

    if let Some(display_name) = &display_name {
        if display_name.is_empty() {
            return Err(ApiError::bad_request("展示名称不能为空"));
        }
    }

    let description = body.description.map(|value| value.trim().to_string());

    debug!(collection = %collection, "updating knowledge base metadata");

    state
        .knowledge_service
        .upsert_metadata(
            &collection,
            MetadataUpdate {
                display_name,
                description,
                tags: body.tags,
            },
        )
        .await?;

    let data = state.knowledge_service.get_knowledge_base(&collection).await?;

    Ok(Json(DataResponse { data }))
}

/// DELETE /api/knowledge/collections/{collection}
pub async fn delete_knowledge_base(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    debug!(collection = %collection, "deleting knowledge base");

    state
        .knowledge_service
        .delete_knowledge_base(&collection)
        .await?;

    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_body_accepts_minimal_request() {
        let body: CreateKnowledgeBaseBody =
            serde_json::from_value(json!({ "name": "policy-v1" })).unwrap();

        assert_eq!(body.name.as_deref(), Some("policy-v1"));
        assert!(body.display_name.is_none());
        assert!(body.vector_size.is_none());
        assert!(body.distance.is_none());
    }

    #[test]
    fn test_create_body_tolerates_wrong_types() {
        let body: CreateKnowledgeBaseBody = serde_json::from_value(json!({
            "name": 42,
            "displayName": ["x"],
            "vectorSize": "768",
            "distance": { "weird": true },
        }))
        .unwrap();

        assert!(body.name.is_none());
        assert!(body.display_name.is_none());
        assert_eq!(body.vector_size, Some(768.0));
        assert!(body.distance.is_none());
    }

    #[test]
    fn test_update_body_tags_must_be_all_strings() {
        let body: UpdateMetadataBody =
            serde_json::from_value(json!({ "tags": ["a", 1] })).unwrap();
        assert!(body.tags.is_none());

        let body: UpdateMetadataBody =
            serde_json::from_value(json!({ "tags": ["a", "b"] })).unwrap();
        assert_eq!(body.tags.unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_invalid_distance_falls_back_to_cosine() {
        let distance = Some("Manhattan".to_string())
            .as_deref()
            .and_then(Distance::parse)
            .unwrap_or(Distance::Cosine);
        assert_eq!(distance, Distance::Cosine);
    }
}
