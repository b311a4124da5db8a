//! Example demonstrating task planning and execution
//!
//! This example shows how to:
//! - Subscribe to the event bus and watch a task move through its steps
//! - Execute a prioritized task end to end
//! - Read the packaged task report
//!
//! Prerequisites:
//! - Ollama must be installed and running (https://ollama.ai)
//! - A model must be pulled (e.g., `ollama pull llama3.1:8b`)
//!
//! Run with: cargo run --example task_execution_example

use steward_engine::agent::Agent;
use steward_engine::config::Config;
use steward_engine::events::{EventBus, EventPayload};
use steward_engine::tasks::{Priority, TaskSpec};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Task Execution Example ===\n");

    let bus = EventBus::new();
    let mut events = bus.subscribe_all();

    // Print the lifecycle events as they happen.
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match &event.payload {
                EventPayload::TaskStarted { task_id } => {
                    println!("  ▶ task started: {}", task_id);
                }
                EventPayload::StepStarted { description, .. } => {
                    println!("  ▶ step: {}", description);
                }
                EventPayload::StepCompleted { .. } => {
                    println!("  ✓ step completed");
                }
                EventPayload::TaskFailed { error, .. } => {
                    println!("  ✗ task failed: {}", error);
                }
                _ => {}
            }
        }
    });

    let mut agent = Agent::from_config(&Config::default(), bus)?;
    println!("✓ Agent ready: {}\n", agent.name());

    let spec = TaskSpec::new("Research the history of the Antikythera mechanism")
        .with_priority(Priority::High);

    println!("─────────────────────────────────────");
    println!("📝 Task: {}", spec.description);
    println!("─────────────────────────────────────\n");

    match agent.execute_task(spec).await {
        Ok(report) => {
            println!("\n─────────────────────────────────────");
            println!("📊 Task Report");
            println!("─────────────────────────────────────\n");
            println!("Success: {}", report.success);
            println!("Duration: {}ms", report.duration_ms);
            println!("Steps ({} total):", report.steps.len());
            for (i, step) in report.steps.iter().enumerate() {
                println!("  {}. [{:?}] {}", i + 1, step.status, step.description);
            }
            if let Some(result) = report.result {
                let preview = if result.len() > 300 {
                    format!("{}...", &result[..300])
                } else {
                    result
                };
                println!("\nResult:\n{}", preview);
            }
            if let Some(error) = report.error {
                println!("\nError: {}", error);
            }
        }
        Err(e) => {
            eprintln!("✗ Engine error: {}", e);
            eprintln!("\nMake sure Ollama is running:");
            eprintln!("  1. Install Ollama from https://ollama.ai");
            eprintln!("  2. Pull a model: ollama pull llama3.1:8b");
            return Err(e.into());
        }
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
