//! Embedding seam for chunk vectors
//!
//! The gateway has no embedding model integrated. Chunk vectors come from
//! [`DeterministicEmbedder`], a placeholder that hashes the seed text into a
//! reproducible distribution so that re-upserting identical content yields an
//! identical vector. It carries no semantic meaning and gives no retrieval
//! quality; a real embedding client can replace it behind
//! [`EmbeddingProvider`] without touching the service layer.

use async_trait::async_trait;

use crate::domain::DomainError;

const DIMENSION_ERROR: &str = "向量维度必须为正数";

/// Produces the vector stored alongside a chunk payload.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str, dimension: usize) -> Result<Vec<f32>, DomainError>;
}

/// Placeholder embedder, not a semantic embedding model.
#[derive(Debug, Default)]
pub struct DeterministicEmbedder;

#[async_trait]
impl EmbeddingProvider for DeterministicEmbedder {
    async fn embed(&self, text: &str, dimension: usize) -> Result<Vec<f32>, DomainError> {
        deterministic_vector(text, dimension)
    }
}

/// Build a vector of `dimension` zeros, as stored on the metadata sentinel.
pub fn build_zero_vector(dimension: usize) -> Result<Vec<f32>, DomainError> {
    if dimension == 0 {
        return Err(DomainError::validation(DIMENSION_ERROR));
    }

    Ok(vec![0.0; dimension])
}

/// Derive a reproducible pseudo-embedding from an arbitrary seed string.
///
/// Each character adds `(code % 97) / 97` into the slot at
/// `position % dimension`; the result is normalized so its components sum
/// to 1. An empty seed, or a seed whose accumulated sum is zero, yields the
/// all-zero vector unchanged.
pub fn deterministic_vector(seed: &str, dimension: usize) -> Result<Vec<f32>, DomainError> {
    let mut vector = build_zero_vector(dimension)?;

    if seed.is_empty() {
        return Ok(vector);
    }

    for (position, ch) in seed.chars().enumerate() {
        let code = ch as u32;
        vector[position % dimension] += (code % 97) as f32 / 97.0;
    }

    let total: f32 = vector.iter().sum();
    if total == 0.0 {
        return Ok(vector);
    }

    Ok(vector.into_iter().map(|value| value / total).collect())
}
