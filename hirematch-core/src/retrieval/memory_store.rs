//! In-process vector store.
//!
//! Holds every vector in memory and answers queries with an exhaustive cosine
//! scan. Suited to the batch model where the index is rebuilt for each run.

use super::store::VectorStore;
use super::types::{EmbeddedDocument, Payload, RankedResult};
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Cosine similarity of two vectors. Zero-norm or mismatched inputs score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[derive(Default)]
struct Inner {
    // first insertion order, used to break similarity ties
    order: Vec<String>,
    entries: HashMap<String, (Vec<f32>, Payload)>,
}

/// Embedded vector store backed by a `RwLock`ed map.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn upsert(&self, documents: Vec<EmbeddedDocument>) -> Result<()> {
        let mut inner = self.inner.write();
        for EmbeddedDocument { document, embedding } in documents {
            if !inner.entries.contains_key(&document.id) {
                inner.order.push(document.id.clone());
            }
            inner.entries.insert(document.id, (embedding, document.payload));
        }
        Ok(())
    }

    async fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<RankedResult>> {
        let inner = self.inner.read();

        let mut scored: Vec<(&String, f32)> = inner
            .order
            .iter()
            .filter_map(|id| {
                inner
                    .entries
                    .get(id)
                    .map(|(vector, _)| (id, cosine_similarity(query_embedding, vector)))
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(id, score)| {
                let payload = inner.entries[id].1.clone();
                RankedResult::new(id.clone(), score).with_payload(payload)
            })
            .collect())
    }

    async fn retrieve(&self, ids: &[String]) -> Result<HashMap<String, Payload>> {
        let inner = self.inner.read();
        Ok(ids
            .iter()
            .filter_map(|id| {
                inner
                    .entries
                    .get(id)
                    .map(|(_, payload)| (id.clone(), payload.clone()))
            })
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.inner.read().entries.len())
    }

    async fn clear(&self) -> Result<()> {
        let mut inner = self.inner.write();
        inner.order.clear();
        inner.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::Document;

    fn embedded(id: &str, embedding: Vec<f32>) -> EmbeddedDocument {
        EmbeddedDocument {
            document: Document::new(id, format!("text of {id}")).with_payload("role", id),
            embedding,
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity() {
        let store = MemoryStore::new();
        store
            .upsert(vec![
                embedded("far", vec![0.0, 1.0]),
                embedded("near", vec![1.0, 0.1]),
                embedded("mid", vec![1.0, 1.0]),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 2).await.unwrap();
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid"]);
        assert_eq!(results[0].payload.as_ref().unwrap()["role"], "near");
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_by_id() {
        let store = MemoryStore::new();
        store.upsert(vec![embedded("a", vec![1.0, 0.0])]).await.unwrap();
        store.upsert(vec![embedded("a", vec![0.0, 1.0])]).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let results = store.search(&[0.0, 1.0], 1).await.unwrap();
        assert!((results[0].score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let store = MemoryStore::new();
        store
            .upsert(vec![embedded("second", vec![1.0, 0.0]), embedded("first", vec![1.0, 0.0])])
            .await
            .unwrap();
        let ids: Vec<_> = store
            .search(&[1.0, 0.0], 5)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_retrieve_and_clear() {
        let store = MemoryStore::new();
        store.upsert(vec![embedded("a", vec![1.0])]).await.unwrap();

        let payloads = store
            .retrieve(&["a".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads["a"]["role"], "a");

        store.clear().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.search(&[1.0], 5).await.unwrap().is_empty());
    }
}
