//! Tool trait and argument/result types
//!
//! Tools are the agent's typed capabilities. An implementation declares a
//! name, a description, and a JSON schema for its named arguments; the
//! engine's registry dispatches invocations to it by name and advertises
//! its definition to model providers.

use crate::errors::EngineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Tool definition advertised to model providers
///
/// `parameters` is a JSON schema object describing the tool's named
/// arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Named arguments for a tool invocation
///
/// Arguments are a JSON object keyed by parameter name. Parsing malformed
/// JSON, or JSON that is not an object, yields the empty argument set;
/// accessors report missing or mistyped values as `None` and leave the
/// failure wording to the tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArgs {
    values: Map<String, Value>,
}

impl ToolArgs {
    /// Creates an empty argument set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses arguments from the raw JSON string a model produced
    pub fn from_json_str(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(value),
            Err(_) => Self::default(),
        }
    }

    /// Wraps an already-parsed JSON value
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(values) => Self { values },
            _ => Self::default(),
        }
    }

    /// Inserts an argument, replacing any existing value under the key
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String argument, `None` when missing or not a string
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Numeric argument, `None` when missing or not a number
    pub fn f64_arg(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(Value::as_f64)
    }

    /// Integer argument, `None` when missing or not an integer
    pub fn i64_arg(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(Value::as_i64)
    }

    /// Boolean argument, `None` when missing or not a boolean
    pub fn bool_arg(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// The arguments as a JSON object value
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }
}

/// Result of a tool execution
///
/// Failures are data: a failed execution still produces a `ToolResult` with
/// `success == false` and the reason in `error`. The engine serializes the
/// whole result back into the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub success: bool,
    pub result: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// Successful result carrying a structured payload
    pub fn success(result: Value) -> Self {
        Self {
            success: true,
            result,
            error: None,
        }
    }

    /// Successful result carrying plain text
    pub fn text(content: impl Into<String>) -> Self {
        Self::success(Value::String(content.into()))
    }

    /// Contained failure with a reason
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: Value::Null,
            error: Some(error.into()),
        }
    }
}

/// A typed capability the agent can invoke by name
///
/// `execute` reports expected failures (bad arguments, unavailable
/// backends) as data in the returned `ToolResult`. Returning `Err` is
/// reserved for internal faults; the registry contains those at the
/// dispatch boundary so they never abort a conversational turn.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name, the registry key
    fn name(&self) -> &str;

    /// What the tool does, shown to the model
    fn description(&self) -> &str;

    /// JSON schema for the named arguments
    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    /// Executes the tool with the given arguments
    async fn execute(&self, args: ToolArgs) -> Result<ToolResult, EngineError>;

    /// Full definition advertised to model providers
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}
