//! In-process note storage

use async_trait::async_trait;
use sdk::{EngineError, Tool, ToolArgs, ToolResult};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Saves and retrieves notes under string keys
///
/// Notes live for the process lifetime only.
#[derive(Default)]
pub struct NoteTool {
    notes: Mutex<HashMap<String, String>>,
}

impl NoteTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn notes(&self) -> MutexGuard<'_, HashMap<String, String>> {
        match self.notes.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl Tool for NoteTool {
    fn name(&self) -> &str {
        "note"
    }

    fn description(&self) -> &str {
        "Saves and retrieves notes"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["save", "get", "list"],
                    "description": "The action to perform"
                },
                "key": {
                    "type": "string",
                    "description": "The note key (required for save and get)"
                },
                "content": {
                    "type": "string",
                    "description": "The note content (required for save)"
                }
            },
            "required": ["action"]
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolResult, EngineError> {
        let key = args.str_arg("key").unwrap_or_default();
        let content = args.str_arg("content").unwrap_or_default();

        let result = match args.str_arg("action").unwrap_or_default() {
            "save" => {
                if key.is_empty() || content.is_empty() {
                    ToolResult::failure("Both key and content are required for save action")
                } else {
                    self.notes().insert(key.to_string(), content.to_string());
                    ToolResult::text(format!("Note saved with key: {}", key))
                }
            }
            "get" => {
                if key.is_empty() {
                    ToolResult::failure("Key is required for get action")
                } else {
                    match self.notes().get(key) {
                        Some(note) => ToolResult::text(note.as_str()),
                        None => {
                            ToolResult::failure(format!("Note not found with key: {}", key))
                        }
                    }
                }
            }
            "list" => {
                let mut keys: Vec<String> = self.notes().keys().cloned().collect();
                keys.sort();
                ToolResult::success(json!(keys))
            }
            action => ToolResult::failure(format!("Unknown action: {}", action)),
        };

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(tool: &NoteTool, args: ToolArgs) -> ToolResult {
        tool.execute(args).await.unwrap()
    }

    fn save_args(key: &str, content: &str) -> ToolArgs {
        ToolArgs::new()
            .with("action", json!("save"))
            .with("key", json!(key))
            .with("content", json!(content))
    }

    #[tokio::test]
    async fn test_save_then_get() {
        let tool = NoteTool::new();

        let saved = run(&tool, save_args("plan", "ship on friday")).await;
        assert!(saved.success);
        assert_eq!(saved.result, json!("Note saved with key: plan"));

        let got = run(
            &tool,
            ToolArgs::new()
                .with("action", json!("get"))
                .with("key", json!("plan")),
        )
        .await;
        assert!(got.success);
        assert_eq!(got.result, json!("ship on friday"));
    }

    #[tokio::test]
    async fn test_get_unknown_key_fails() {
        let tool = NoteTool::new();
        let result = run(
            &tool,
            ToolArgs::new()
                .with("action", json!("get"))
                .with("key", json!("absent")),
        )
        .await;

        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Note not found with key: absent")
        );
    }

    #[tokio::test]
    async fn test_get_without_key_fails() {
        let tool = NoteTool::new();
        let result = run(&tool, ToolArgs::new().with("action", json!("get"))).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Key is required for get action"));
    }

    #[tokio::test]
    async fn test_save_requires_key_and_content() {
        let tool = NoteTool::new();
        let result = run(
            &tool,
            ToolArgs::new()
                .with("action", json!("save"))
                .with("key", json!("only-key")),
        )
        .await;

        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Both key and content are required for save action")
        );
    }

    #[tokio::test]
    async fn test_list_returns_sorted_keys() {
        let tool = NoteTool::new();
        run(&tool, save_args("zulu", "z")).await;
        run(&tool, save_args("alpha", "a")).await;

        let listed = run(&tool, ToolArgs::new().with("action", json!("list"))).await;
        assert_eq!(listed.result, json!(["alpha", "zulu"]));
    }

    #[tokio::test]
    async fn test_unknown_action_fails() {
        let tool = NoteTool::new();
        let result = run(&tool, ToolArgs::new().with("action", json!("purge"))).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Unknown action: purge"));
    }
}
