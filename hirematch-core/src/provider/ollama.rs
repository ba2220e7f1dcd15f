//! Ollama provider implementation.
//!
//! This module provides an Ollama HTTP API client that implements the Provider trait.

use super::types::*;
use async_trait::async_trait;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ollama HTTP API provider.
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    base_url: String,
    http_client: reqwest::Client,
}

impl OllamaProvider {
    /// Creates a new Ollama provider talking to `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Creates a provider from the `llm` section of the config.
    pub fn from_config(config: &crate::Config) -> Self {
        Self::new(config.llm.base_url.clone())
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::from_config(&crate::Config::default())
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn chat<'a>(
        &'a self,
        request: ChatRequest,
        mut callback: Box<dyn FnMut(ChatResponse) + Send + 'a>,
    ) -> Result<()> {
        let url = format!("{}/api/chat", self.base_url);

        let ollama_request = OllamaChatRequest {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| OllamaMessage {
                    role: m.role.clone(),
                    content: m.content.clone(),
                })
                .collect(),
            options: {
                let mut opts = HashMap::new();
                opts.insert("temperature".to_string(), serde_json::json!(request.temperature));
                if let Some(max_tokens) = request.max_tokens {
                    opts.insert("num_predict".to_string(), serde_json::json!(max_tokens));
                }
                Some(opts)
            },
            stream: true,
        };

        let response = self.http_client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(ProviderError::Api(error_text));
        }

        let mut stream = response.bytes_stream();
        let mut buffer = Vec::new();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result?;
            buffer.extend_from_slice(&chunk);

            while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                let line = buffer.drain(..=newline_pos).collect::<Vec<_>>();

                if line.len() <= 1 {
                    continue;
                }

                let line_str = String::from_utf8_lossy(&line[..line.len() - 1]);

                if let Ok(ollama_response) = serde_json::from_str::<OllamaChatResponse>(&line_str) {
                    callback(ChatResponse {
                        model: ollama_response.model,
                        content: ollama_response.message.content,
                        done: ollama_response.done,
                    });
                }
            }
        }

        Ok(())
    }

    async fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embed", self.base_url);

        let embed_request = EmbedRequest {
            model: model.to_string(),
            input: text.to_string(),
        };

        let response = self.http_client
            .post(&url)
            .json(&embed_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(ProviderError::Api(error_text));
        }

        let embed_response = response.json::<EmbedResponse>().await?;

        embed_response.embeddings
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Other("No embeddings returned".to_string()))
    }
}

// Ollama-specific request/response types (internal)

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<HashMap<String, serde_json::Value>>,
    #[serde(default = "default_stream")]
    stream: bool,
}

fn default_stream() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OllamaChatResponse {
    model: String,
    #[serde(default)]
    created_at: String,
    message: OllamaMessage,
    #[serde(default)]
    done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let provider = OllamaProvider::new("http://localhost:11434/");
        assert_eq!(provider.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_chat_chunk_parses() {
        let line = r#"{"model":"m","created_at":"t","message":{"role":"assistant","content":"Hi"},"done":false}"#;
        let parsed: OllamaChatResponse = serde_json::from_str(line).unwrap();
        assert_eq!(parsed.message.content, "Hi");
        assert!(!parsed.done);
    }
}
