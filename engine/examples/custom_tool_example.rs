//! Example demonstrating a custom tool
//!
//! This example shows how to:
//! - Implement the `Tool` trait from the SDK
//! - Register the tool so the model can call it
//! - Watch the agent use it in a conversation turn
//!
//! Prerequisites:
//! - Ollama must be installed and running (https://ollama.ai)
//! - A model must be pulled (e.g., `ollama pull llama3.1:8b`)
//!
//! Run with: cargo run --example custom_tool_example

use async_trait::async_trait;
use sdk::{EngineError, Tool, ToolArgs, ToolResult};
use serde_json::{json, Value};
use std::sync::Arc;
use steward_engine::agent::Agent;
use steward_engine::config::Config;
use steward_engine::events::EventBus;

/// Reverses whatever text it is given
struct ReverseTool;

#[async_trait]
impl Tool for ReverseTool {
    fn name(&self) -> &str {
        "reverse"
    }

    fn description(&self) -> &str {
        "Reverses the characters of a piece of text"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "The text to reverse"
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolResult, EngineError> {
        let text = match args.str_arg("text") {
            Some(text) => text,
            None => return Ok(ToolResult::failure("text must be a string")),
        };

        Ok(ToolResult::text(text.chars().rev().collect::<String>()))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Custom Tool Example ===\n");

    let mut agent = Agent::from_config(&Config::default(), EventBus::new())?;
    agent.register_tool(Arc::new(ReverseTool));

    println!("✓ Agent ready: {}", agent.name());
    println!("✓ Custom tool registered: reverse\n");

    let question = "Use the reverse tool to reverse the word 'steward'.";
    println!("User: {}\n", question);

    match agent.run(question).await {
        Ok(response) => println!("Assistant: {}", response),
        Err(e) => {
            eprintln!("✗ Turn failed: {}", e);
            eprintln!("\nMake sure Ollama is running:");
            eprintln!("  1. Install Ollama from https://ollama.ai");
            eprintln!("  2. Pull a model: ollama pull llama3.1:8b");
            return Err(e.into());
        }
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
