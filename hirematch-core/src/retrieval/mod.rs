//! Hybrid dense/sparse retrieval.
//!
//! # Architecture
//!
//! - [`tokenizer`]: lexical preprocessing for BM25
//! - [`SparseIndex`]: in-memory BM25 over a fixed corpus
//! - [`DenseIndex`]: embeddings in an external [`VectorStore`]
//! - [`fusion`]: reciprocal rank fusion of the two rankings
//! - [`Calibrator`]: maps fused scores to a 1-10 fit scale
//!
//! # How It Works
//!
//! 1. **Indexing Phase**:
//!    - The corpus is tokenized into the sparse index, in corpus order
//!    - Each document is embedded and upserted in batches
//!
//! 2. **Retrieval Phase**:
//!    - The query runs through dense and sparse search concurrently
//!    - Both rankings are fused by reciprocal rank
//!    - Payloads are hydrated from the vector store by id

mod dense;
mod embedder;
mod memory_store;
mod qdrant_store;
mod sparse;
mod store;
mod types;

pub mod calibration;
pub mod fusion;
pub mod tokenizer;

pub use calibration::{calibrate, Calibrator};
pub use dense::{DenseIndex, IndexReport};
pub use embedder::{is_zero_vector, Embedder};
pub use fusion::{fuse, hydrate, DEFAULT_RRF_K};
pub use memory_store::{cosine_similarity, MemoryStore};
pub use qdrant_store::QdrantStore;
pub use sparse::{Bm25Params, SparseIndex};
pub use store::{create_vector_store, VectorStore};
pub use types::{Document, EmbeddedDocument, FusedResult, Payload, RankedResult};

use tracing::debug;

/// Runs dense and sparse search for one query and fuses the results.
///
/// Both indices must have been built over the same corpus and are read-only
/// here; rebuild by constructing a new searcher.
#[derive(Clone)]
pub struct HybridSearcher {
    dense: DenseIndex,
    sparse: SparseIndex,
    top_k: usize,
    rrf_k: u32,
}

impl HybridSearcher {
    pub fn new(dense: DenseIndex, sparse: SparseIndex) -> Self {
        Self {
            dense,
            sparse,
            top_k: 20,
            rrf_k: DEFAULT_RRF_K,
        }
    }

    /// Results requested from each search path.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_rrf_k(mut self, rrf_k: u32) -> Self {
        self.rrf_k = rrf_k;
        self
    }

    pub fn sparse(&self) -> &SparseIndex {
        &self.sparse
    }

    pub fn dense(&self) -> &DenseIndex {
        &self.dense
    }

    /// Searches both indices, fuses and hydrates.
    ///
    /// Never fails: a dense-side failure degrades to sparse-only ranking and
    /// a failed payload lookup leaves `payload = None`.
    pub async fn search(&self, query: &str) -> Vec<FusedResult> {
        let sparse_future = async { self.sparse.search(query, self.top_k) };
        let (dense_results, sparse_results) =
            tokio::join!(self.dense.query(query, self.top_k), sparse_future);

        debug!(
            dense = dense_results.len(),
            sparse = sparse_results.len(),
            "Fusing search results"
        );

        let mut fused = fuse(&dense_results, &sparse_results, self.rrf_k);
        if fused.is_empty() {
            return fused;
        }

        let ids: Vec<String> = fused.iter().map(|r| r.id.clone()).collect();
        let payloads = self.dense.payloads(&ids).await;
        hydrate(&mut fused, payloads);
        fused
    }
}
