//! Copilot Knowledge Gateway
//!
//! REST management layer for Qdrant-backed knowledge bases:
//! - knowledge base CRUD mapped onto collections, with descriptive metadata
//!   stored as a sentinel point inside each collection
//! - chunk CRUD mapped onto points, with deterministic placeholder vectors
//! - health endpoints for deployment probes

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::DeterministicEmbedder;
use infrastructure::qdrant::QdrantClient;
use infrastructure::services::KnowledgeService;

/// Create the application state with all services initialized
pub fn create_app_state(config: &AppConfig) -> AppState {
    let vector_store = Arc::new(QdrantClient::new(config.qdrant.url.as_str()));
    let embedder = Arc::new(DeterministicEmbedder);
    let knowledge_service = Arc::new(KnowledgeService::new(vector_store.clone(), embedder));

    AppState::new(knowledge_service, vector_store)
}
