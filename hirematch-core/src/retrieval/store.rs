//! Vector store abstraction and factory.
//!
//! This module provides a unified interface for the vector databases backing
//! dense search.

use super::memory_store::MemoryStore;
use super::qdrant_store::QdrantStore;
use super::types::{EmbeddedDocument, Payload, RankedResult};
use crate::config::{StorageConfig, StorageMode};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Unified interface for vector database operations.
///
/// Implementations handle document storage, similarity search, and payload
/// lookup across different backends (in-process for embedded, Qdrant for gRPC).
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Adds or replaces documents, keyed by document id.
    async fn upsert(&self, documents: Vec<EmbeddedDocument>) -> Result<()>;

    /// Searches for the most similar documents using cosine similarity.
    ///
    /// # Returns
    ///
    /// At most `top_k` results sorted by descending similarity, each carrying
    /// the stored payload.
    async fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<RankedResult>>;

    /// Looks up stored payloads by document id. Unknown ids are absent from
    /// the returned map.
    async fn retrieve(&self, ids: &[String]) -> Result<HashMap<String, Payload>>;

    /// Returns the total number of documents in the store.
    async fn count(&self) -> Result<usize>;

    /// Removes all documents from the store.
    async fn clear(&self) -> Result<()>;
}

/// Creates a vector store instance based on the storage mode.
///
/// - `Embedded` mode keeps vectors in process for the lifetime of the run
/// - `Grpc` mode uses Qdrant for remote server connectivity
///
/// # Arguments
///
/// * `storage_config` - Storage configuration including storage mode and collection name
/// * `vector_size` - Dimension of the embedding vectors
pub async fn create_vector_store(
    storage_config: StorageConfig,
    vector_size: u64,
) -> Result<Arc<dyn VectorStore>> {
    match storage_config.storage_mode.clone() {
        StorageMode::Embedded => Ok(Arc::new(MemoryStore::new())),
        StorageMode::Grpc { .. } => {
            let store = QdrantStore::new(storage_config, vector_size).await?;
            Ok(Arc::new(store))
        }
    }
}
