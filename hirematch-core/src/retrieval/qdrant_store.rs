//! Qdrant vector database storage implementation.
//!
//! Qdrant point ids must be integers or UUIDs, so each document id maps to a
//! name-based (v5) UUID point id and the original id travels in the payload
//! under [`ID_FIELD`].

use super::store::VectorStore;
use super::types::{EmbeddedDocument, Payload, RankedResult};
use crate::config::{StorageConfig, StorageMode};
use anyhow::{Context, Result};
use async_trait::async_trait;
use qdrant_client::{
    Qdrant,
    qdrant::{
        vectors_config::Config, CreateCollectionBuilder, Distance, GetPointsBuilder, PointId,
        PointStruct, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder, VectorsConfig,
    },
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Payload key holding the original document id.
pub const ID_FIELD: &str = "_doc_id";

/// Point id for a document id, stable across processes.
fn point_id(document_id: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, document_id.as_bytes()).to_string()
}

fn split_payload(
    payload: &HashMap<String, qdrant_client::qdrant::Value>,
) -> (Option<String>, Payload) {
    let id = payload
        .get(ID_FIELD)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let fields = payload
        .iter()
        .filter(|(k, _)| k.as_str() != ID_FIELD)
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect();

    (id, fields)
}

/// Qdrant-based vector store for job embeddings.
///
/// Re-indexing a document with an existing id replaces the old point, which
/// gives upsert semantics for free.
#[derive(Clone)]
pub struct QdrantStore {
    client: Arc<Qdrant>,
    collection_name: String,
    vector_size: u64,
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn upsert(&self, documents: Vec<EmbeddedDocument>) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = documents
            .into_iter()
            .map(|EmbeddedDocument { document, embedding }| {
                let payload: HashMap<String, serde_json::Value> = document
                    .payload
                    .iter()
                    .map(|(k, v)| (k.clone(), json!(v)))
                    .chain(std::iter::once((ID_FIELD.to_string(), json!(document.id))))
                    .collect();

                PointStruct::new(point_id(&document.id), embedding, payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection_name, points).wait(true))
            .await
            .context("Failed to upsert points")?;

        Ok(())
    }

    async fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<RankedResult>> {
        let search_result = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection_name, query_embedding.to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .context("Failed to search points")?;

        let results = search_result
            .result
            .into_iter()
            .filter_map(|point| {
                let (id, payload) = split_payload(&point.payload);
                id.map(|id| RankedResult::new(id, point.score).with_payload(payload))
            })
            .collect();

        Ok(results)
    }

    async fn retrieve(&self, ids: &[String]) -> Result<HashMap<String, Payload>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let point_ids: Vec<PointId> = ids.iter().map(|id| PointId::from(point_id(id))).collect();

        let response = self
            .client
            .get_points(
                GetPointsBuilder::new(&self.collection_name, point_ids).with_payload(true),
            )
            .await
            .context("Failed to retrieve points")?;

        Ok(response
            .result
            .into_iter()
            .filter_map(|point| {
                let (id, payload) = split_payload(&point.payload);
                id.map(|id| (id, payload))
            })
            .collect())
    }

    /// Returns the total number of documents in the collection.
    async fn count(&self) -> Result<usize> {
        let info = self
            .client
            .collection_info(&self.collection_name)
            .await
            .context("Failed to get collection info")?;

        Ok(info.result.map(|r| r.points_count.unwrap_or(0) as usize).unwrap_or(0))
    }

    /// Removes all documents from the collection.
    async fn clear(&self) -> Result<()> {
        self.client
            .delete_collection(&self.collection_name)
            .await
            .context("Failed to delete collection")?;

        self.ensure_collection().await?;

        Ok(())
    }
}

impl QdrantStore {
    /// Creates a new Qdrant store and ensures the collection exists.
    ///
    /// # Arguments
    ///
    /// * `storage_config` - Storage configuration including storage mode and collection name
    /// * `vector_size` - Dimension of the embedding vectors
    pub async fn new(storage_config: StorageConfig, vector_size: u64) -> Result<Self> {
        let client = match &storage_config.storage_mode {
            StorageMode::Grpc { url } => Arc::new(
                Qdrant::from_url(url)
                    .build()
                    .context("Failed to connect to Qdrant server")?,
            ),
            _ => {
                anyhow::bail!("QdrantStore only supports Grpc mode")
            }
        };

        let store = Self {
            client,
            collection_name: storage_config.vector_db.collection_name.clone(),
            vector_size,
        };

        store.ensure_collection().await?;

        Ok(store)
    }

    async fn ensure_collection(&self) -> Result<()> {
        let exists = self
            .client
            .collection_exists(&self.collection_name)
            .await
            .context("Failed to check collection")?;

        if !exists {
            tracing::info!(collection = %self.collection_name, "Creating Qdrant collection");
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection_name).vectors_config(
                        VectorsConfig {
                            config: Some(Config::Params(
                                VectorParamsBuilder::new(self.vector_size, Distance::Cosine).build(),
                            )),
                        },
                    ),
                )
                .await
                .context("Failed to create collection")?;
        }

        Ok(())
    }
}
