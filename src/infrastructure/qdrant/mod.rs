//! Qdrant REST client and wire types

mod client;
mod types;

pub use client::{QdrantClient, DEFAULT_QDRANT_URL};
pub use types::{
    CollectionConfig, CollectionDetail, CollectionParams, CollectionSummary, PayloadKind, PointId,
    PointPayload, PointRecord, ScrollOffset, ScrollRequest, ScrollResult, UpsertPoint,
    VectorParams, VectorSpec, METADATA_POINT_ID,
};
