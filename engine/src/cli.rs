//! CLI interface for Steward
//!
//! This module provides the command-line interface using clap's derive API.
//! It defines all commands and global flags for driving an agent from the
//! terminal.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::tasks::Priority;

/// Steward AI Agent Engine
///
/// An LLM-agnostic agent that holds a conversation, plans and executes
/// multi-step tasks, calls typed tools, and remembers what happened.
#[derive(Parser, Debug)]
#[command(name = "steward")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one conversational turn and print the response
    Run {
        /// What to say to the agent
        input: String,
    },

    /// Plan and execute a task, printing the report
    Task {
        /// The task to execute
        description: String,

        /// Task priority (low, medium, high)
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
    },

    /// Show the planned steps for a task without executing it
    Plan {
        /// The task to plan
        description: String,
    },

    /// Show recent short-term memories
    Memory {
        /// Number of entries to show (default: 10)
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        // Test basic command parsing
        let cli = Cli::parse_from(["steward", "run", "hello"]);
        assert!(matches!(cli.command, Command::Run { .. }));
        assert!(!cli.json);
        assert!(cli.log.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_flags() {
        // Test global flags
        let cli = Cli::parse_from(["steward", "--json", "--log", "debug", "run", "hi"]);
        assert!(cli.json);
        assert_eq!(cli.log, Some("debug".to_string()));
    }

    #[test]
    fn test_task_command_with_priority() {
        let cli = Cli::parse_from(["steward", "task", "summarize the report", "--priority", "high"]);
        if let Command::Task {
            description,
            priority,
        } = cli.command
        {
            assert_eq!(description, "summarize the report");
            assert_eq!(priority, Priority::High);
        } else {
            panic!("Expected Task command");
        }
    }

    #[test]
    fn test_task_priority_defaults_to_medium() {
        let cli = Cli::parse_from(["steward", "task", "do something"]);
        if let Command::Task { priority, .. } = cli.command {
            assert_eq!(priority, Priority::Medium);
        } else {
            panic!("Expected Task command");
        }
    }

    #[test]
    fn test_task_rejects_unknown_priority() {
        let parsed = Cli::try_parse_from(["steward", "task", "do something", "--priority", "urgent"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_plan_command() {
        let cli = Cli::parse_from(["steward", "plan", "research rust async runtimes"]);
        if let Command::Plan { description } = cli.command {
            assert_eq!(description, "research rust async runtimes");
        } else {
            panic!("Expected Plan command");
        }
    }

    #[test]
    fn test_memory_command() {
        // Test memory command with limit
        let cli = Cli::parse_from(["steward", "memory", "--limit", "20"]);
        if let Command::Memory { limit } = cli.command {
            assert_eq!(limit, 20);
        } else {
            panic!("Expected Memory command");
        }
    }

    #[test]
    fn test_memory_default_limit() {
        let cli = Cli::parse_from(["steward", "memory"]);
        if let Command::Memory { limit } = cli.command {
            assert_eq!(limit, 10);
        } else {
            panic!("Expected Memory command");
        }
    }
}
