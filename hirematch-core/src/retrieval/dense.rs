//! Dense search over an external vector store.
//!
//! Indexing runs in fixed-size batches. Each batch commits on its own: a
//! document whose embedding fails is skipped, a batch whose upsert fails is
//! retried and then skipped, and neither touches batches already written.

use super::embedder::{is_zero_vector, Embedder};
use super::store::VectorStore;
use super::types::{Document, EmbeddedDocument, Payload, RankedResult};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of an indexing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    /// Documents written to the store
    pub indexed: usize,
    /// Documents dropped because their embedding failed
    pub skipped: usize,
    /// Batches dropped after exhausting retries
    pub failed_batches: usize,
}

#[derive(Clone)]
pub struct DenseIndex {
    embedder: Embedder,
    store: Arc<dyn VectorStore>,
    batch_size: usize,
    batch_retries: usize,
    concurrency: usize,
}

impl DenseIndex {
    pub fn new(embedder: Embedder, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            batch_size: 16,
            batch_retries: 1,
            concurrency: 1,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_batch_retries(mut self, batch_retries: usize) -> Self {
        self.batch_retries = batch_retries;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// The store this index writes to, also the canonical payload source.
    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Embeds and upserts `documents` in batches. Re-indexing an id replaces
    /// the stored document.
    pub async fn index(&self, documents: &[Document]) -> IndexReport {
        let total_batches = documents.len().div_ceil(self.batch_size);
        info!(
            documents = documents.len(),
            batches = total_batches,
            "Indexing documents into vector store"
        );

        let reports: Vec<IndexReport> = stream::iter(documents.chunks(self.batch_size).enumerate())
            .map(|(batch_idx, batch)| self.index_batch(batch_idx, batch))
            .buffered(self.concurrency)
            .collect()
            .await;

        let report = reports.into_iter().fold(IndexReport::default(), |acc, r| IndexReport {
            indexed: acc.indexed + r.indexed,
            skipped: acc.skipped + r.skipped,
            failed_batches: acc.failed_batches + r.failed_batches,
        });

        info!(
            indexed = report.indexed,
            skipped = report.skipped,
            failed_batches = report.failed_batches,
            "Indexing finished"
        );
        report
    }

    async fn index_batch(&self, batch_idx: usize, batch: &[Document]) -> IndexReport {
        let texts: Vec<&str> = batch.iter().map(|d| d.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await;

        let mut report = IndexReport::default();
        let mut points = Vec::with_capacity(batch.len());
        for (document, embedding) in batch.iter().zip(embeddings) {
            if is_zero_vector(&embedding) {
                warn!(id = %document.id, "Skipping document due to embedding failure");
                report.skipped += 1;
                continue;
            }
            points.push(EmbeddedDocument {
                document: document.clone(),
                embedding,
            });
        }

        if points.is_empty() {
            return report;
        }

        let count = points.len();
        for attempt in 0..=self.batch_retries {
            match self.store.upsert(points.clone()).await {
                Ok(()) => {
                    debug!(batch = batch_idx + 1, points = count, "Upserted batch");
                    report.indexed = count;
                    return report;
                }
                Err(e) => {
                    warn!(batch = batch_idx + 1, attempt = attempt + 1, error = %e, "Batch upsert failed");
                }
            }
        }

        warn!(batch = batch_idx + 1, points = count, "Skipping batch after retries");
        report.failed_batches = 1;
        report
    }

    /// Returns up to `k` stored documents most similar to `text`.
    ///
    /// Yields an empty list when the query cannot be embedded or the store
    /// fails, so fusion can fall back to sparse results alone.
    pub async fn query(&self, text: &str, k: usize) -> Vec<RankedResult> {
        if k == 0 {
            return Vec::new();
        }

        let query_embedding = self.embedder.embed(text).await;
        if is_zero_vector(&query_embedding) {
            warn!("Could not embed query, dense search returns no results");
            return Vec::new();
        }

        match self.store.search(&query_embedding, k).await {
            Ok(mut results) => {
                results.truncate(k);
                debug!(results = results.len(), "Dense search finished");
                results
            }
            Err(e) => {
                warn!(error = %e, "Dense search failed");
                Vec::new()
            }
        }
    }

    /// Resolves payloads by id. `None` if the store lookup fails.
    pub async fn payloads(&self, ids: &[String]) -> Option<HashMap<String, Payload>> {
        match self.store.retrieve(ids).await {
            Ok(payloads) => Some(payloads),
            Err(e) => {
                warn!(error = %e, "Payload lookup failed");
                None
            }
        }
    }
}
