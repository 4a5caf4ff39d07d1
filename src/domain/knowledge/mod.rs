//! Knowledge base domain types

mod entity;

pub use entity::{Distance, KnowledgeBase, KnowledgeChunk, KnowledgeMetadata};
