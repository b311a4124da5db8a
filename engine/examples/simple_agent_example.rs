//! Example demonstrating a single conversational turn
//!
//! This example shows how to:
//! - Build an agent from the default configuration
//! - Run a conversation turn through the think-act loop
//! - Inspect what the agent remembered
//!
//! Prerequisites:
//! - Ollama must be installed and running (https://ollama.ai)
//! - A model must be pulled (e.g., `ollama pull llama3.1:8b`)
//!
//! Run with: cargo run --example simple_agent_example

use steward_engine::agent::Agent;
use steward_engine::config::Config;
use steward_engine::events::EventBus;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Simple Agent Example ===\n");

    // Default configuration: Ollama at localhost with the built-in tools.
    let config = Config::default();
    let mut agent = Agent::from_config(&config, EventBus::new())?;

    println!("✓ Agent ready: {} ({})", agent.name(), agent.id());
    println!("✓ Provider: {}", config.llm.default_provider);
    println!("✓ Model: {}\n", config.llm.ollama.model);

    let question = "What is 15 * 27? Use the calculator tool.";
    println!("User: {}\n", question);

    match agent.run(question).await {
        Ok(response) => {
            println!("Assistant: {}\n", response);
        }
        Err(e) => {
            eprintln!("✗ Turn failed: {}", e);
            eprintln!("\nMake sure Ollama is running:");
            eprintln!("  1. Install Ollama from https://ollama.ai");
            eprintln!("  2. Pull a model: ollama pull llama3.1:8b");
            return Err(e.into());
        }
    }

    println!("=== What the agent remembered ===\n");
    for entry in agent.recent_memories(5) {
        let kind = entry
            .metadata
            .get("kind")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        println!("  [{}] {}", kind, entry.content);
    }

    let copied = agent.consolidate_memories();
    println!("\n✓ {} memories copied into long-term storage", copied);

    println!("\n=== Example Complete ===");
    Ok(())
}
