//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::qdrant::QdrantClient;
use crate::infrastructure::services::KnowledgeService;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub knowledge_service: Arc<KnowledgeService>,
    /// Kept alongside the service so readiness probes can ping the store
    /// without walking every collection.
    pub vector_store: Arc<QdrantClient>,
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(knowledge_service: Arc<KnowledgeService>, vector_store: Arc<QdrantClient>) -> Self {
        Self {
            knowledge_service,
            vector_store,
        }
    }
}
