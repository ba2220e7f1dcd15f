use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Structured metadata stored alongside an indexed document.
pub type Payload = HashMap<String, String>;

/// A document handed to both indices.
///
/// Documents are immutable once indexed and identified by `id`. The same id
/// keys the document in the sparse index and in the vector store.
///
/// # Example
///
/// ```
/// # use hirematch_core::retrieval::Document;
/// let doc = Document::new("job_1", "Role: Backend Engineer. Tech Stack: Rust, Postgres")
///     .with_payload("company", "Acme")
///     .with_payload("role", "Backend Engineer");
/// assert_eq!(doc.payload["company"], "Acme");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub payload: Payload,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            payload: Payload::new(),
        }
    }

    pub fn with_payload(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }
}

/// A document together with its embedding, ready for the vector store.
#[derive(Debug, Clone)]
pub struct EmbeddedDocument {
    pub document: Document,
    pub embedding: Vec<f32>,
}

/// A single hit from either search path, ordered by descending `score`.
///
/// Sparse hits carry no payload; it is resolved by id after fusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub id: String,
    pub score: f32,
    pub payload: Option<Payload>,
}

impl RankedResult {
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// A hit after reciprocal rank fusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedResult {
    pub id: String,
    pub rrf_score: f64,
    pub payload: Option<Payload>,
    /// 0-based position in the dense list, if present there
    pub dense_rank: Option<usize>,
    /// 0-based position in the sparse list, if present there
    pub sparse_rank: Option<usize>,
}
