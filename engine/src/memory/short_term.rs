//! Short-term memory: a bounded window of recent activity

use super::store::{InMemoryStore, MemoryEntry, MemoryStore};
use crate::events::{Event, EventBus, EventPayload};
use serde_json::{Map, Value};

/// Default number of entries the window retains
pub const DEFAULT_CAPACITY: usize = 50;

/// Bounded recency buffer over the memory store
///
/// Every add stamps the owning agent's id into the entry metadata, then
/// evicts the oldest entries once the window exceeds its capacity. The
/// retained set after any sequence of adds is exactly the most recently
/// created `capacity` entries.
pub struct ShortTermMemory {
    store: Box<dyn MemoryStore>,
    capacity: usize,
    agent_id: String,
    bus: EventBus,
}

impl ShortTermMemory {
    pub fn new(agent_id: impl Into<String>, capacity: usize, bus: EventBus) -> Self {
        Self::with_store(agent_id, capacity, bus, Box::new(InMemoryStore::new()))
    }

    /// Builds the window over a caller-provided store
    pub fn with_store(
        agent_id: impl Into<String>,
        capacity: usize,
        bus: EventBus,
        store: Box<dyn MemoryStore>,
    ) -> Self {
        Self {
            store,
            capacity,
            agent_id: agent_id.into(),
            bus,
        }
    }

    fn publish(&self, payload: EventPayload) {
        self.bus.publish(Event::new(self.agent_id.as_str(), payload));
    }

    /// Stores content in the window, evicting the oldest entries beyond capacity
    pub fn add(
        &mut self,
        content: impl Into<String>,
        mut metadata: Map<String, Value>,
    ) -> MemoryEntry {
        metadata.insert(
            "agent_id".to_string(),
            Value::String(self.agent_id.clone()),
        );
        let entry = self.store.add(content.into(), metadata);

        self.publish(EventPayload::MemoryAdded {
            memory_id: entry.id.clone(),
            content: entry.content.clone(),
        });

        // Oldest entries are the tail of the most-recent-first listing.
        let overflow: Vec<String> = self
            .store
            .all()
            .into_iter()
            .skip(self.capacity)
            .map(|entry| entry.id)
            .collect();
        for id in overflow {
            self.store.delete(&id);
        }

        entry
    }

    /// Most recently stored entries, newest first
    pub fn recent(&self, limit: usize) -> Vec<MemoryEntry> {
        self.store.all().into_iter().take(limit).collect()
    }

    /// Case-insensitive substring search over the window
    pub fn search(&self, query: &str, limit: usize) -> Vec<MemoryEntry> {
        let hits = self.store.search(query, limit);
        self.publish(EventPayload::MemoryRetrieved {
            query: query.to_string(),
            count: hits.len(),
        });
        hits
    }

    /// Every entry currently in the window, newest first
    pub fn all(&self) -> Vec<MemoryEntry> {
        self.store.all()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Empties the window
    pub fn clear(&mut self) {
        let count = self.store.clear();
        self.publish(EventPayload::MemoryCleared { count });
    }
}
