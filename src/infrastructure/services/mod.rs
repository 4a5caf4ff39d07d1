//! Business services built on the infrastructure clients

mod knowledge_service;

pub use knowledge_service::{
    ChunkPage, CreateKnowledgeBaseRequest, KnowledgeService, MetadataUpdate, UpsertChunkRequest,
};
