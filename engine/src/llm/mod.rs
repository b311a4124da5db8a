//! Model provider abstraction
//!
//! A common interface over the chat-completion APIs the agent can drive
//! (Ollama, OpenAI, Anthropic, OpenRouter). The [`ModelProvider`] trait is
//! the contract; [`factory::create_provider`] picks an implementation from
//! configuration.

use async_trait::async_trait;
use sdk::{EngineError, ToolDefinition};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

pub mod anthropic;
pub mod factory;
pub mod ollama;
pub mod openai;
pub mod openrouter;

pub use anthropic::AnthropicProvider;
pub use factory::create_provider;
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;
pub use openrouter::OpenRouterProvider;

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur while talking to a model provider
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout")]
    Timeout,

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<ProviderError> for EngineError {
    fn from(err: ProviderError) -> Self {
        EngineError::Provider(err.to_string())
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    /// Tool result fed back to the model
    Function,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::Function => write!(f, "function"),
        }
    }
}

/// Tool invocation requested by the model
///
/// `arguments` is the raw JSON string exactly as the provider returned it;
/// parsing is deferred to the dispatch site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// Message in a conversation history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: MessageRole,

    pub content: String,

    /// Tool name, set on function result messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Tool call the assistant made, when it made one
    #[serde(rename = "function_call", skip_serializing_if = "Option::is_none")]
    pub call: Option<FunctionCall>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
            name: None,
            call: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            name: None,
            call: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            name: None,
            call: None,
        }
    }

    /// Assistant message that requested a tool invocation
    pub fn assistant_call(content: impl Into<String>, call: FunctionCall) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            name: None,
            call: Some(call),
        }
    }

    /// Tool result message named after the tool that produced it
    pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Function,
            content: content.into(),
            name: Some(name.into()),
            call: None,
        }
    }
}

/// Token accounting reported by a provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// One model turn: text content, an optional tool call, optional usage
///
/// Content and call are not mutually exclusive; some providers emit
/// explanatory text alongside a call and both are preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub content: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub call: Option<FunctionCall>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl ProviderResponse {
    /// Plain text response with no tool call
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            call: None,
            usage: None,
        }
    }

    /// Response requesting a tool invocation
    pub fn tool_call(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            call: Some(FunctionCall::new(name, arguments)),
            usage: None,
        }
    }
}

/// Contract every model provider implements
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g. "ollama", "openai", "anthropic")
    fn name(&self) -> &str;

    /// Produce the next model turn for a conversation
    ///
    /// `tools` carries the definitions the model may call; providers
    /// without native function calling are free to ignore them.
    async fn generate(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ProviderResponse>;
}

/// Maps a reqwest transport failure onto a provider error
pub(crate) fn map_transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if err.is_connect() {
        ProviderError::Unavailable(err.to_string())
    } else {
        ProviderError::Network(err.to_string())
    }
}

/// Maps a non-success HTTP response onto a provider error
pub(crate) async fn error_from_status(response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    if status.as_u16() == 401 || status.as_u16() == 403 {
        ProviderError::AuthenticationFailed(text)
    } else if status.as_u16() == 429 {
        ProviderError::RateLimited
    } else {
        ProviderError::InvalidRequest(format!("{}: {}", status, text))
    }
}

/// OpenAI-style `{"type": "function", "function": {...}}` tool entry
pub(crate) fn openai_tool_schema(tool: &ToolDefinition) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        },
    })
}

/// Usage block in the OpenAI response shape
pub(crate) fn usage_from_openai(data: &Value) -> Option<TokenUsage> {
    let usage = data.get("usage")?;
    Some(TokenUsage {
        prompt_tokens: usage
            .get("prompt_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32,
        completion_tokens: usage
            .get("completion_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32,
        total_tokens: usage
            .get("total_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32,
    })
}
