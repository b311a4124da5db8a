//! Anthropic (Claude) provider
//!
//! The messages API takes the system prompt as a top-level field rather
//! than a message, and returns content as typed blocks; text blocks are
//! concatenated and a tool_use block becomes the function call.

use async_trait::async_trait;
use reqwest::Client;
use sdk::{EngineError, ToolDefinition};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::{
    error_from_status, map_transport_error, FunctionCall, Message, MessageRole, ModelProvider,
    ProviderError, ProviderResponse, Result, TokenUsage,
};
use crate::config::AnthropicConfig;

pub struct AnthropicProvider {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    client: Client,
}

impl AnthropicProvider {
    pub fn new(
        config: &AnthropicConfig,
        temperature: f64,
        max_tokens: u32,
    ) -> std::result::Result<Self, EngineError> {
        let Some(api_key) = config.resolved_api_key() else {
            return Err(EngineError::Config(
                "Anthropic API key is required".to_string(),
            ));
        };

        Ok(Self {
            api_key,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            temperature,
            max_tokens,
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to create HTTP client"),
        })
    }

    fn request_payload(&self, messages: &[Message], tools: &[ToolDefinition]) -> Value {
        let mut system_prompt = String::new();
        let mut api_messages = Vec::new();
        for msg in messages {
            if msg.role == MessageRole::System {
                system_prompt.push_str(&msg.content);
                system_prompt.push('\n');
                continue;
            }
            api_messages.push(json!({
                "role": if msg.role == MessageRole::Assistant { "assistant" } else { "user" },
                "content": msg.content,
            }));
        }

        let mut payload = json!({
            "model": self.model,
            "messages": api_messages,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        if !system_prompt.is_empty() {
            payload["system"] = json!(system_prompt.trim_end());
        }

        if !tools.is_empty() {
            let entries: Vec<Value> = tools
                .iter()
                .map(|tool| {
                    json!({
                        "name": tool.name,
                        "description": tool.description,
                        "input_schema": tool.parameters,
                    })
                })
                .collect();
            payload["tools"] = Value::Array(entries);
        }

        payload
    }
}

#[async_trait]
impl ModelProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ProviderResponse> {
        let payload = self.request_payload(messages, tools);
        debug!(
            "Anthropic request: model={}, messages={}, tools={}",
            self.model,
            messages.len(),
            tools.len()
        );

        let url = format!("{}/messages", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
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

        let blocks = data
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| ProviderError::Parse("No content array in response".to_string()))?;

        let mut content = String::new();
        let mut call = None;
        for block in blocks {
            match block.get("type").and_then(|t| t.as_str()) {
                Some("text") => {
                    if let Some(text) = block.get("text").and_then(|t| t.as_str()) {
                        content.push_str(text);
                    }
                }
                Some("tool_use") => {
                    if let Some(name) = block.get("name").and_then(|n| n.as_str()) {
                        let arguments = block
                            .get("input")
                            .map(|input| input.to_string())
                            .unwrap_or_else(|| "{}".to_string());
                        call = Some(FunctionCall::new(name, arguments));
                    }
                }
                _ => {}
            }
        }

        let prompt_tokens = data
            .get("usage")
            .and_then(|u| u.get("input_tokens"))
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32;
        let completion_tokens = data
            .get("usage")
            .and_then(|u| u.get("output_tokens"))
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32;

        Ok(ProviderResponse {
            content,
            call,
            usage: Some(TokenUsage::new(prompt_tokens, completion_tokens)),
        })
    }
}
