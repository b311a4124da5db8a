//! Agent module
//!
//! This module implements the conversation loop that ties providers, tools,
//! memory, and tasks together. The agent maintains conversation history and
//! coordinates with LLM providers through an iterative think-act cycle.

pub mod core;

pub use core::{Agent, AgentSettings, MAX_ITERATIONS_RESPONSE};
