//! Steward SDK
//!
//! Shared library providing the contracts between the steward engine and
//! external code: the error taxonomy and the tool trait with its argument
//! and result types. Tool authors depend on this crate alone.

/// Error types and handling
pub mod errors;

/// Tool trait and argument/result types
pub mod tool;

// Re-export commonly used types
pub use errors::{EngineError, StewardErrorExt};
pub use tool::{Tool, ToolArgs, ToolDefinition, ToolResult};
