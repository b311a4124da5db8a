// Steward AI Agent Engine
// Main entry point for the steward binary

use anyhow::Context;
use clap::Parser;
use steward_engine::agent::Agent;
use steward_engine::cli::{Cli, Command};
use steward_engine::config::Config;
use steward_engine::events::EventBus;
use steward_engine::tasks::{TaskPlanner, TaskReport, TaskSpec};
use steward_engine::telemetry::{init_telemetry, init_telemetry_with_level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize basic telemetry first (before config is loaded)
    init_telemetry();

    let version = env!("CARGO_PKG_VERSION");
    tracing::info!("Steward Engine v{}", version);

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        Config::load_or_create().context("Failed to load configuration")?
    };

    // Re-initialize telemetry with the CLI or config-driven log level
    // (only takes effect if RUST_LOG env var is not set)
    let log_level = cli.log.as_deref().unwrap_or(&config.telemetry.log_level);
    init_telemetry_with_level(log_level);

    // Handle commands
    match cli.command {
        Command::Run { input } => {
            tracing::info!("Running turn: {}", input);
            let mut agent = build_agent(&config)?;
            let response = agent.run(&input).await?;

            if cli.json {
                println!("{}", serde_json::json!({ "response": response }));
            } else {
                println!("{}", response);
            }
            Ok(())
        }

        Command::Task {
            description,
            priority,
        } => {
            tracing::info!("Executing task: {}", description);
            let mut agent = build_agent(&config)?;
            let spec = TaskSpec::new(description).with_priority(priority);
            let report = agent.execute_task(spec).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(())
        }

        Command::Plan { description } => {
            let planner = TaskPlanner::new();
            let steps = planner.plan(&description);

            println!("Plan for: {}", description);
            for (index, step) in steps.iter().enumerate() {
                println!("  {}. {}", index + 1, step);
            }
            Ok(())
        }

        Command::Memory { limit } => {
            let agent = build_agent(&config)?;
            let memories = agent.recent_memories(limit);

            if memories.is_empty() {
                // Memory lives and dies with the process; a fresh CLI
                // invocation starts empty.
                println!("No memories recorded this session.");
            } else {
                for entry in memories {
                    println!("[{}] {}", entry.created_at.format("%H:%M:%S"), entry.content);
                }
            }
            Ok(())
        }
    }
}

fn build_agent(config: &Config) -> anyhow::Result<Agent> {
    let bus = EventBus::new();

    // Drain every event into the debug log so --log debug shows the full
    // activity stream.
    let mut events = bus.subscribe_all();
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::debug!("Event: {:?}", event);
        }
    });

    let agent = Agent::from_config(config, bus).context("Failed to build agent")?;
    Ok(agent)
}

fn print_report(report: &TaskReport) {
    if report.success {
        println!("Task completed in {} ms", report.duration_ms);
    } else {
        println!(
            "Task failed in {} ms: {}",
            report.duration_ms,
            report.error.as_deref().unwrap_or("unknown error")
        );
    }

    println!();
    println!("Steps:");
    for step in &report.steps {
        println!("  [{}] {}", step.status.as_str(), step.description);
    }

    if let Some(result) = &report.result {
        println!();
        println!("{}", result);
    }
}
