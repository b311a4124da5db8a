//! Web search with a stub backend

use async_trait::async_trait;
use sdk::{EngineError, Tool, ToolArgs, ToolResult};
use serde_json::{json, Value};

const DEFAULT_RESULTS: i64 = 5;

/// Searches the web for information
///
/// The backend is a deterministic stub; the result shape is the contract a
/// real search integration would fill in.
pub struct WebSearchTool;

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Searches the web for information"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "num_results": {
                    "type": "number",
                    "description": "Number of results to return",
                    "default": DEFAULT_RESULTS
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolResult, EngineError> {
        let query = args.str_arg("query").unwrap_or_default();
        let count = args
            .i64_arg("num_results")
            .unwrap_or(DEFAULT_RESULTS)
            .max(0) as usize;

        let results: Vec<Value> = (1..=count)
            .map(|i| {
                json!({
                    "title": format!("Result {} for \"{}\"", i, query),
                    "url": format!("https://example.com/result{}", i),
                    "snippet": format!(
                        "This is a mock search result for the query \"{}\".",
                        query
                    ),
                })
            })
            .collect();

        Ok(ToolResult::success(json!(results)))
    }
}
