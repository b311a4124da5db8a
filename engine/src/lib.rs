//! Steward Engine Library
//!
//! This library provides the core functionality of the Steward engine.
//! It is used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// Event bus for observing agent activity
pub mod events;

/// LLM provider abstraction layer
pub mod llm;

/// Short-term and long-term memory module
pub mod memory;

/// Task planning and queueing module
pub mod tasks;

/// Built-in native tools
pub mod tools;

/// Agent conversation loop module
pub mod agent;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;
