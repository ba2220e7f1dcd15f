//! Embedding generation using model providers.
//!
//! This module converts text into vector embeddings. The embedder never
//! returns an error: a failed or empty embedding comes back as an all-zero
//! vector of the configured dimension so callers can detect "no signal"
//! without special-casing provider errors.

use crate::provider::Provider;
use std::sync::Arc;
use tracing::warn;

/// Returns `true` if `vector` carries no signal (empty or all zeros).
pub fn is_zero_vector(vector: &[f32]) -> bool {
    vector.iter().all(|v| *v == 0.0)
}

/// Generates vector embeddings for text using a provider's embedding model.
///
/// # Supported Models
///
/// Common embedding models:
/// - `nomic-embed-text` - 768-dimensional embeddings, good general purpose
/// - `mxbai-embed-large` - 1024-dimensional embeddings, higher quality
#[derive(Clone)]
pub struct Embedder {
    provider: Arc<dyn Provider>,
    model: String,
    dimension: usize,
}

impl Embedder {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            provider,
            model: model.into(),
            dimension,
        }
    }

    /// Length of every vector this embedder returns.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn zero_vector(&self) -> Vec<f32> {
        vec![0.0; self.dimension]
    }

    /// Generates a vector embedding for the given text.
    ///
    /// Returns the zero vector when `text` is blank, when the provider fails,
    /// or when the provider answers with a vector of the wrong length.
    pub async fn embed(&self, text: &str) -> Vec<f32> {
        if text.trim().is_empty() {
            warn!("Empty text passed to embedder, returning zero vector");
            return self.zero_vector();
        }

        match self.provider.embed(text, &self.model).await {
            Ok(embedding) if embedding.len() == self.dimension => embedding,
            Ok(embedding) => {
                warn!(
                    expected = self.dimension,
                    actual = embedding.len(),
                    "Embedding has unexpected dimension, returning zero vector"
                );
                self.zero_vector()
            }
            Err(e) => {
                warn!(error = %e, "Embedding failed, returning zero vector");
                self.zero_vector()
            }
        }
    }

    /// Embeds each text independently; one failure does not affect the rest.
    pub async fn embed_batch(&self, texts: &[&str]) -> Vec<Vec<f32>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await);
        }
        embeddings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ChatRequest, ChatResponse, ProviderError, Result};
    use async_trait::async_trait;

    struct FakeProvider;

    #[async_trait]
    impl Provider for FakeProvider {
        async fn chat<'a>(
            &'a self,
            _request: ChatRequest,
            _callback: Box<dyn FnMut(ChatResponse) + Send + 'a>,
        ) -> Result<()> {
            Ok(())
        }

        async fn embed(&self, text: &str, _model: &str) -> Result<Vec<f32>> {
            match text {
                "fail" => Err(ProviderError::Api("boom".to_string())),
                "short" => Ok(vec![1.0]),
                _ => Ok(vec![1.0, 2.0, 3.0]),
            }
        }
    }

    fn embedder() -> Embedder {
        Embedder::new(Arc::new(FakeProvider), "test-model", 3)
    }

    #[tokio::test]
    async fn test_embed_success() {
        assert_eq!(embedder().embed("hello").await, vec![1.0, 2.0, 3.0]);
    }

    #[tokio::test]
    async fn test_failure_returns_zero_sentinel() {
        let embedding = embedder().embed("fail").await;
        assert_eq!(embedding.len(), 3);
        assert!(is_zero_vector(&embedding));
    }

    #[tokio::test]
    async fn test_blank_text_returns_zero_sentinel() {
        assert!(is_zero_vector(&embedder().embed("  ").await));
    }

    #[tokio::test]
    async fn test_wrong_dimension_returns_zero_sentinel() {
        let embedding = embedder().embed("short").await;
        assert_eq!(embedding, vec![0.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_batch_isolates_failures() {
        let embeddings = embedder().embed_batch(&["a", "fail", "b"]).await;
        assert_eq!(embeddings.len(), 3);
        assert!(!is_zero_vector(&embeddings[0]));
        assert!(is_zero_vector(&embeddings[1]));
        assert!(!is_zero_vector(&embeddings[2]));
    }
}
