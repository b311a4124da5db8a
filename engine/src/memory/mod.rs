//! Two-tier agent memory
//!
//! A volatile store contract sits at the bottom. Above it, short-term
//! memory keeps a bounded window of recent activity while long-term memory
//! keeps importance-scored entries; a consolidation pass copies the
//! short-term entries worth keeping into the archive.

pub mod long_term;
pub mod short_term;
pub mod store;

pub use long_term::LongTermMemory;
pub use short_term::{ShortTermMemory, DEFAULT_CAPACITY};
pub use store::{InMemoryStore, MemoryEntry, MemoryStore};
