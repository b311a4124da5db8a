//! Ollama provider for local models
//!
//! Talks to the Ollama chat API, typically at http://localhost:11434. No
//! API key involved. Ollama has no native function calling here, so tool
//! definitions are not forwarded; tool-capable agents on Ollama rely on
//! prompt-level instructions instead.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::{
    error_from_status, map_transport_error, Message, ModelProvider, ProviderError,
    ProviderResponse, Result, TokenUsage,
};
use crate::config::OllamaConfig;
use sdk::ToolDefinition;

pub struct OllamaProvider {
    base_url: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    client: Client,
}

impl OllamaProvider {
    pub fn new(config: &OllamaConfig, temperature: f64, max_tokens: u32) -> Self {
        Self {
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            temperature,
            max_tokens,
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    fn request_payload(&self, messages: &[Message]) -> Value {
        let api_messages: Vec<Value> = messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.to_string(),
                    "content": msg.content,
                })
            })
            .collect();

        json!({
            "model": self.model,
            "messages": api_messages,
            "stream": false,
            "options": {
                "temperature": self.temperature,
                "num_predict": self.max_tokens,
            },
        })
    }
}

#[async_trait]
impl ModelProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ProviderResponse> {
        if !tools.is_empty() {
            debug!(
                "Ollama request ignores {} tool definitions (no native function calling)",
                tools.len()
            );
        }

        let payload = self.request_payload(messages);
        debug!(
            "Ollama request: model={}, messages={}",
            self.model,
            messages.len()
        );

        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_status(response).await);
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let content = data
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .unwrap_or_default()
            .to_string();

        let prompt_tokens = data
            .get("prompt_eval_count")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32;
        let completion_tokens = data.get("eval_count").and_then(|v| v.as_u64()).unwrap_or(0) as u32;

        Ok(ProviderResponse {
            content,
            call: None,
            usage: Some(TokenUsage::new(prompt_tokens, completion_tokens)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OllamaProvider {
        let config = OllamaConfig {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.1:8b".to_string(),
        };
        OllamaProvider::new(&config, 0.7, 512)
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(provider().name(), "ollama");
    }

    #[test]
    fn test_request_payload_shape() {
        let payload = provider().request_payload(&[
            Message::system("You are a helpful assistant"),
            Message::user("Hello"),
        ]);

        assert_eq!(payload["model"], "llama3.1:8b");
        assert_eq!(payload["stream"], false);
        assert_eq!(payload["options"]["num_predict"], 512);

        let messages = payload["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "Hello");
    }
}
