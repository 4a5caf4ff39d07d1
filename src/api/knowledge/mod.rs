//! Knowledge base management endpoints

pub mod chunks;
pub mod collections;

use axum::routing::{delete, get, patch, post};
use axum::Router;

use super::state::AppState;

pub fn create_knowledge_router() -> Router<AppState> {
    Router::new()
        .route("/collections", get(collections::list_knowledge_bases))
        .route("/collections", post(collections::create_knowledge_base))
        .route("/collections/{collection}", get(collections::get_knowledge_base))
        .route("/collections/{collection}", patch(collections::update_metadata))
        .route(
            "/collections/{collection}",
            delete(collections::delete_knowledge_base),
        )
        .route("/collections/{collection}/chunks", get(chunks::list_chunks))
        .route("/collections/{collection}/chunks", post(chunks::create_chunk))
        .route(
            "/collections/{collection}/chunks/{chunk_id}",
            get(chunks::get_chunk),
        )
        .route(
            "/collections/{collection}/chunks/{chunk_id}",
            patch(chunks::update_chunk),
        )
        .route(
            "/collections/{collection}/chunks/{chunk_id}",
            delete(chunks::delete_chunk),
        )
}
