//! Knowledge service - maps knowledge bases and chunks onto the vector
//! store's collection and point primitives
//!
//! Collection-level metadata lives inside the collection itself, as the
//! payload of a sentinel point with a fixed id and a zero vector. The
//! sentinel never surfaces as a chunk and never counts toward the chunk
//! count.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use futures::future::try_join_all;
use serde_json::{json, Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    build_zero_vector, Distance, DomainError, EmbeddingProvider, KnowledgeBase, KnowledgeChunk,
    KnowledgeMetadata,
};
use crate::infrastructure::qdrant::{
    PayloadKind, PointId, PointPayload, PointRecord, QdrantClient, ScrollOffset, ScrollRequest,
    UpsertPoint, METADATA_POINT_ID,
};

/// Request to create a new knowledge base
#[derive(Debug, Clone)]
pub struct CreateKnowledgeBaseRequest {
    pub name: String,
    pub vector_size: u64,
    pub distance: Distance,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

/// Replacement values for the metadata sentinel payload.
///
/// This is a full overwrite, not a field-level patch: a `None` display name
/// falls back to the collection name and `None` tags fall back to empty.
/// Callers wanting a merge must supply already-merged values.
#[derive(Debug, Clone, Default)]
pub struct MetadataUpdate {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Chunk create/update input. Serves both creation and full-record update;
/// a missing id gets a random UUID.
#[derive(Debug, Clone)]
pub struct UpsertChunkRequest {
    pub id: Option<String>,
    pub text: String,
    pub title: Option<String>,
    pub source: Option<String>,
    pub tags: Vec<String>,
    pub metadata: Map<String, Value>,
}

/// One page of chunks plus the opaque cursor for the next page.
#[derive(Debug, Clone)]
pub struct ChunkPage {
    pub chunks: Vec<KnowledgeChunk>,
    /// Absent when the listing is exhausted.
    pub next_offset: Option<ScrollOffset>,
}

/// Knowledge base and chunk operations on top of the vector store client.
pub struct KnowledgeService {
    store: Arc<QdrantClient>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl std::fmt::Debug for KnowledgeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeService").finish()
    }
}

impl KnowledgeService {
    pub fn new(store: Arc<QdrantClient>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    /// List every knowledge base with full detail, sorted by display name.
    ///
    /// One detail fetch per collection, dispatched concurrently. Fine at the
    /// collection counts this service manages.
    pub async fn list_knowledge_bases(&self) -> Result<Vec<KnowledgeBase>, DomainError> {
        let collections = self.store.list_collections().await?;

        if collections.is_empty() {
            return Ok(Vec::new());
        }

        let mut bases = try_join_all(
            collections
                .iter()
                .map(|collection| self.get_knowledge_base(&collection.name)),
        )
        .await?;

        bases.sort_by(|a, b| {
            a.metadata
                .display_name
                .to_lowercase()
                .cmp(&b.metadata.display_name.to_lowercase())
        });

        Ok(bases)
    }

    pub async fn get_knowledge_base(&self, name: &str) -> Result<KnowledgeBase, DomainError> {
        let detail = self.store.collection_detail(name).await?;
        let vector_size = detail.config.vector_size()?;
        let distance = detail.config.distance();
        let metadata = self.fetch_metadata(name).await?;

        let sentinel = u64::from(metadata.is_some());
        let chunk_count = detail.points_count.saturating_sub(sentinel);

        Ok(KnowledgeBase {
            name: name.to_string(),
            status: detail.status,
            vector_size,
            distance,
            chunk_count,
            metadata: metadata.unwrap_or_else(|| KnowledgeMetadata {
                display_name: name.to_string(),
                description: None,
                tags: Vec::new(),
            }),
        })
    }

    /// Create the collection, write its metadata sentinel, and return the
    /// freshly read knowledge base.
    pub async fn create_knowledge_base(
        &self,
        request: CreateKnowledgeBaseRequest,
    ) -> Result<KnowledgeBase, DomainError> {
        let name = request.name.trim().to_string();

        debug!(collection = %name, vector_size = request.vector_size, "creating collection");

        self.store
            .create_collection(&name, request.vector_size, request.distance)
            .await?;

        let display_name = request
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let description = request
            .description
            .as_deref()
            .map(str::trim)
            .map(str::to_string);

        self.upsert_metadata(
            &name,
            MetadataUpdate {
                display_name,
                description,
                tags: None,
            },
        )
        .await?;

        self.get_knowledge_base(&name).await
    }

    /// Drop the whole collection; chunks and sentinel go with it.
    pub async fn delete_knowledge_base(&self, name: &str) -> Result<(), DomainError> {
        self.store.delete_collection(name).await
    }

    /// Overwrite the metadata sentinel point.
    pub async fn upsert_metadata(
        &self,
        collection: &str,
        update: MetadataUpdate,
    ) -> Result<(), DomainError> {
        let detail = self.store.collection_detail(collection).await?;
        let vector_size = detail.config.vector_size()?;

        let payload = PointPayload {
            kind: Some(PayloadKind::Metadata),
            display_name: Some(
                update
                    .display_name
                    .unwrap_or_else(|| collection.to_string()),
            ),
            description: update.description,
            tags: Some(update.tags.unwrap_or_default()),
            ..Default::default()
        };

        let point = UpsertPoint {
            id: PointId::from(METADATA_POINT_ID),
            vector: build_zero_vector(vector_size as usize)?,
            payload,
        };

        self.store.upsert_points(collection, &[point]).await
    }

    /// Page through content chunks, sentinel excluded, payload only.
    pub async fn fetch_chunks(
        &self,
        collection: &str,
        limit: usize,
        offset: Option<ScrollOffset>,
    ) -> Result<ChunkPage, DomainError> {
        let request = ScrollRequest {
            limit,
            offset,
            with_payload: true,
            with_vectors: false,
            filter: Some(chunk_filter()),
        };

        let result = self.store.scroll(collection, &request).await?;

        Ok(ChunkPage {
            chunks: result.points.into_iter().map(format_chunk).collect(),
            next_offset: result.next_page_offset,
        })
    }

    /// Write one chunk point: payload plus a deterministic vector derived
    /// from title, text, and id. Used for both creation and full update.
    pub async fn upsert_chunk(
        &self,
        collection: &str,
        request: UpsertChunkRequest,
    ) -> Result<KnowledgeChunk, DomainError> {
        let detail = self.store.collection_detail(collection).await?;
        let vector_size = detail.config.vector_size()?;

        let point_id = request
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let updated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let seed = [
            request.title.as_deref(),
            Some(request.text.as_str()),
            Some(point_id.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        let vector = self.embedder.embed(&seed, vector_size as usize).await?;

        let point = UpsertPoint {
            id: PointId::from(point_id.clone()),
            vector,
            payload: PointPayload {
                kind: Some(PayloadKind::Chunk),
                text: Some(request.text.clone()),
                title: request.title.clone(),
                source: request.source.clone(),
                tags: Some(request.tags.clone()),
                metadata: Some(request.metadata.clone()),
                updated_at: Some(updated_at.clone()),
                ..Default::default()
            },
        };

        self.store.upsert_points(collection, &[point]).await?;

        Ok(KnowledgeChunk {
            id: point_id,
            text: request.text,
            title: request.title,
            source: request.source,
            tags: request.tags,
            metadata: request.metadata,
            updated_at: Some(updated_at),
        })
    }

    pub async fn delete_chunk(&self, collection: &str, chunk_id: &str) -> Result<(), DomainError> {
        self.store
            .delete_points(collection, &[PointId::from(chunk_id)])
            .await
    }

    /// Fetch one chunk by id; `None` when the point does not exist.
    pub async fn get_chunk(
        &self,
        collection: &str,
        chunk_id: &str,
    ) -> Result<Option<KnowledgeChunk>, DomainError> {
        let points = self
            .store
            .retrieve(collection, &[PointId::from(chunk_id)])
            .await?;

        Ok(points.into_iter().next().map(format_chunk))
    }

    async fn fetch_metadata(
        &self,
        collection: &str,
    ) -> Result<Option<KnowledgeMetadata>, DomainError> {
        let request = ScrollRequest {
            limit: 1,
            offset: None,
            with_payload: true,
            with_vectors: false,
            filter: Some(metadata_filter()),
        };

        let result = self.store.scroll(collection, &request).await?;

        let Some(point) = result.points.into_iter().next() else {
            return Ok(None);
        };
        let Some(payload) = point.payload else {
            return Ok(None);
        };

        // Early sentinels nested displayName/description inside the opaque
        // metadata map; still honored when reading deployed collections.
        let nested = payload.metadata.unwrap_or_default();
        let display_name = payload
            .display_name
            .or_else(|| {
                nested
                    .get("displayName")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_default();
        let description = payload.description.or_else(|| {
            nested
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string)
        });

        Ok(Some(KnowledgeMetadata {
            display_name,
            description,
            tags: payload.tags.unwrap_or_default(),
        }))
    }
}

fn metadata_filter() -> Value {
    json!({ "must": [{ "key": "kind", "match": { "value": "metadata" } }] })
}

fn chunk_filter() -> Value {
    json!({ "must_not": [{ "key": "kind", "match": { "value": "metadata" } }] })
}

fn format_chunk(point: PointRecord) -> KnowledgeChunk {
    let payload = point.payload.unwrap_or_default();

    KnowledgeChunk {
        id: point.id.to_string(),
        text: payload.text.unwrap_or_default(),
        title: payload.title,
        source: payload.source,
        tags: payload.tags.unwrap_or_default(),
        metadata: payload.metadata.unwrap_or_default(),
        updated_at: payload.updated_at,
    }
}
