//! Memory storage contract and the in-process store

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// A single stored memory
///
/// Entries are immutable once stored. The id is assigned by the store.
#[derive(Debug, Clone, Serialize)]
pub struct MemoryEntry {
    pub id: String,
    pub content: String,
    pub metadata: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

/// Storage contract behind the memory tiers
///
/// Reads return entries most-recent-first. Recency is insertion order, so
/// entries created within the same instant keep a stable, deterministic
/// ordering.
pub trait MemoryStore: Send {
    /// Stores content with metadata and returns the new entry
    fn add(&mut self, content: String, metadata: Map<String, Value>) -> MemoryEntry;

    /// Looks up an entry by id
    fn get(&self, id: &str) -> Option<&MemoryEntry>;

    /// All entries, most-recent-first
    fn all(&self) -> Vec<MemoryEntry>;

    /// Case-insensitive substring search, most-recent-first, at most `limit` hits
    fn search(&self, query: &str, limit: usize) -> Vec<MemoryEntry>;

    /// Removes an entry; true when something was removed
    fn delete(&mut self, id: &str) -> bool;

    /// Removes every entry, returning how many there were
    fn clear(&mut self) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Volatile store backing both memory tiers
///
/// Entries are kept in insertion order; process exit loses everything.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Vec<MemoryEntry>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryStore for InMemoryStore {
    fn add(&mut self, content: String, metadata: Map<String, Value>) -> MemoryEntry {
        let entry = MemoryEntry {
            id: Uuid::new_v4().to_string(),
            content,
            metadata,
            created_at: Utc::now(),
        };
        self.entries.push(entry.clone());
        entry
    }

    fn get(&self, id: &str) -> Option<&MemoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    fn all(&self) -> Vec<MemoryEntry> {
        self.entries.iter().rev().cloned().collect()
    }

    fn search(&self, query: &str, limit: usize) -> Vec<MemoryEntry> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .rev()
            .filter(|entry| entry.content.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect()
    }

    fn delete(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
