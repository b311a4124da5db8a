//! Error types and handling
//!
//! This module provides the error types used throughout the steward engine.
//! All errors implement the `StewardErrorExt` trait which provides
//! user-friendly hints and indicates whether errors are recoverable.

use thiserror::Error;

/// Trait for steward error extensions
///
/// This trait provides additional context for errors, including user-friendly
/// hints and recoverability information. All engine errors implement this trait.
pub trait StewardErrorExt {
    /// Returns a user-friendly hint for the error
    ///
    /// The hint is safe to display to end users and does not contain
    /// secrets (API keys, tokens) or internal implementation details.
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors can be retried or worked around. Non-recoverable
    /// errors require a configuration change before the operation can succeed.
    fn is_recoverable(&self) -> bool;
}

/// Main engine error type
///
/// Each variant maps to one failure boundary in the engine. The severity
/// contract is fixed: configuration errors are fatal at agent construction,
/// provider errors abort the current conversational turn, a tool name
/// missing from the registry aborts the turn, and a failing task step fails
/// the task without crashing the process. Tool *execution* failures never
/// appear here; they are contained in the tool's own result.
///
/// # Examples
///
/// ```
/// use sdk::errors::{EngineError, StewardErrorExt};
///
/// let error = EngineError::ToolNotFound("calculator".to_string());
/// println!("Hint: {}", error.user_hint());
/// assert!(error.is_recoverable());
///
/// let fatal = EngineError::Config("agent name must not be empty".to_string());
/// assert!(!fatal.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Model provider errors
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    // Tool errors
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Tool error: {0}")]
    Tool(String),

    // Task errors
    #[error("Task error: {0}")]
    Task(String),

    // Memory errors
    #[error("Memory error: {0}")]
    Memory(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StewardErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Config(_) => "Check your config.toml file for errors",
            Self::Provider(_) => "Model provider unavailable. Check your API keys and network",
            Self::UnknownProvider(_) => {
                "No provider with that name. Check [llm] default_provider"
            }
            Self::ToolNotFound(_) => "The requested tool is not available",
            Self::Tool(_) => "Tool operation failed",
            Self::Task(_) => "Task could not be driven to completion",
            Self::Memory(_) => "Memory operation failed",
            Self::Serialization(_) => "Received data could not be parsed",
            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_) | Self::UnknownProvider(_))
    }
}
