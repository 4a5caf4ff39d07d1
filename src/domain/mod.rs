//! Domain layer - entities, errors, and the embedding seam

pub mod embedding;
pub mod error;
pub mod knowledge;

pub use embedding::{
    build_zero_vector, deterministic_vector, DeterministicEmbedder, EmbeddingProvider,
};
pub use error::DomainError;
pub use knowledge::{Distance, KnowledgeBase, KnowledgeChunk, KnowledgeMetadata};
