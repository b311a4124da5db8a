//! OpenAI provider

use async_trait::async_trait;
use reqwest::Client;
use sdk::{EngineError, ToolDefinition};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::{
    error_from_status, map_transport_error, openai_tool_schema, usage_from_openai, FunctionCall,
    Message, ModelProvider, ProviderError, ProviderResponse, Result,
};
use crate::config::OpenAIConfig;

pub struct OpenAIProvider {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(
        config: &OpenAIConfig,
        temperature: f64,
        max_tokens: u32,
    ) -> std::result::Result<Self, EngineError> {
        let Some(api_key) = config.resolved_api_key() else {
            return Err(EngineError::Config(
                "OpenAI API key is required".to_string(),
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
        let mut api_messages = Vec::new();
        for msg in messages {
            let mut entry = json!({
                "role": msg.role.to_string(),
                "content": msg.content,
            });
            if let Some(name) = &msg.name {
                entry["name"] = json!(name);
            }
            api_messages.push(entry);
        }

        let mut payload = json!({
            "model": self.model,
            "messages": api_messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        if !tools.is_empty() {
            payload["tools"] = Value::Array(tools.iter().map(openai_tool_schema).collect());
            payload["tool_choice"] = json!("auto");
        }

        payload
    }
}

#[async_trait]
impl ModelProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ProviderResponse> {
        let payload = self.request_payload(messages, tools);
        debug!(
            "OpenAI request: model={}, messages={}, tools={}",
            self.model,
            messages.len(),
            tools.len()
        );

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
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

        let choice = data
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .ok_or_else(|| ProviderError::Parse("No choices in response".to_string()))?;

        let message = choice
            .get("message")
            .ok_or_else(|| ProviderError::Parse("No message in choice".to_string()))?;

        let content = message
            .get("content")
            .and_then(|c| c.as_str())
            .unwrap_or_default()
            .to_string();

        let call = message
            .get("tool_calls")
            .and_then(|calls| calls.as_array())
            .and_then(|calls| calls.first())
            .and_then(|call| call.get("function"))
            .and_then(|function| {
                let name = function.get("name")?.as_str()?;
                let arguments = function.get("arguments")?.as_str()?;
                Some(FunctionCall::new(name, arguments))
            });

        Ok(ProviderResponse {
            content,
            call,
            usage: usage_from_openai(&data),
        })
    }
}
