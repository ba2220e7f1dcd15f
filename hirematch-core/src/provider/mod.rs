//! Model provider abstraction layer.
//!
//! This module defines a common interface for model backends that supply
//! embeddings (dense search) and chat completions (justifications).

mod types;
pub mod ollama;

// Re-export common types
pub use types::{
    ChatRequest,
    ChatResponse,
    EmbedRequest,
    EmbedResponse,
    Message,
    Provider,
    ProviderError,
    Result,
};

// Re-export provider implementations
pub use ollama::OllamaProvider;

/// Runs a chat request to completion and returns the concatenated reply.
pub async fn complete(provider: &dyn Provider, request: ChatRequest) -> Result<String> {
    let mut reply = String::new();
    provider
        .chat(request, Box::new(|chunk: ChatResponse| reply.push_str(&chunk.content)))
        .await?;
    Ok(reply)
}
