//! Long-term memory: an importance-scored archive

use super::store::{InMemoryStore, MemoryEntry, MemoryStore};
use crate::events::{Event, EventBus, EventPayload};
use serde_json::{json, Map, Value};

/// Consolidation copies an entry only when its score exceeds this
const CONSOLIDATION_THRESHOLD: f64 = 0.6;

/// Score every entry starts from
const BASE_IMPORTANCE: f64 = 0.5;

/// Importance-scored archive over the memory store
///
/// Unlike the short-term window, nothing is ever evicted; entries carry an
/// importance score in [0, 1] under `metadata.importance` and are retrieved
/// by score.
pub struct LongTermMemory {
    store: Box<dyn MemoryStore>,
    agent_id: String,
    bus: EventBus,
}

impl LongTermMemory {
    pub fn new(agent_id: impl Into<String>, bus: EventBus) -> Self {
        Self::with_store(agent_id, bus, Box::new(InMemoryStore::new()))
    }

    /// Builds the archive over a caller-provided store
    pub fn with_store(
        agent_id: impl Into<String>,
        bus: EventBus,
        store: Box<dyn MemoryStore>,
    ) -> Self {
        Self {
            store,
            agent_id: agent_id.into(),
            bus,
        }
    }

    fn publish(&self, payload: EventPayload) {
        self.bus.publish(Event::new(self.agent_id.as_str(), payload));
    }

    /// Archives content with an importance score, clamped into [0, 1]
    ///
    /// Every stored entry ends up with `metadata.importance` populated.
    pub fn add(
        &mut self,
        content: impl Into<String>,
        mut metadata: Map<String, Value>,
        importance: f64,
    ) -> MemoryEntry {
        let importance = importance.clamp(0.0, 1.0);
        metadata.insert(
            "agent_id".to_string(),
            Value::String(self.agent_id.clone()),
        );
        metadata.insert("importance".to_string(), json!(importance));
        let entry = self.store.add(content.into(), metadata);

        tracing::debug!(memory_id = %entry.id, importance, "long-term memory added");
        self.publish(EventPayload::MemoryAdded {
            memory_id: entry.id.clone(),
            content: entry.content.clone(),
        });

        entry
    }

    /// Entry by id
    pub fn get(&self, id: &str) -> Option<&MemoryEntry> {
        self.store.get(id)
    }

    /// Case-insensitive substring search over the archive
    pub fn search(&self, query: &str, limit: usize) -> Vec<MemoryEntry> {
        let hits = self.store.search(query, limit);
        self.publish(EventPayload::MemoryRetrieved {
            query: query.to_string(),
            count: hits.len(),
        });
        hits
    }

    /// Entries at or above a minimum importance, highest first
    pub fn important(&self, min_importance: f64, limit: usize) -> Vec<MemoryEntry> {
        let mut entries: Vec<MemoryEntry> = self
            .store
            .all()
            .into_iter()
            .filter(|entry| importance_of(entry) >= min_importance)
            .collect();
        entries.sort_by(|a, b| {
            importance_of(b)
                .partial_cmp(&importance_of(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        entries.truncate(limit);
        entries
    }

    /// Copies the entries worth keeping into the archive
    ///
    /// Each candidate is scored from fixed signals and copied only when the
    /// score strictly exceeds the threshold; the originals stay where they
    /// are. Returns the number of entries copied.
    pub fn consolidate(&mut self, entries: &[MemoryEntry]) -> usize {
        let mut copied = 0;
        for entry in entries {
            let importance = calculate_importance(entry);
            if importance > CONSOLIDATION_THRESHOLD {
                self.add(entry.content.clone(), entry.metadata.clone(), importance);
                copied += 1;
            }
        }

        tracing::debug!(
            candidates = entries.len(),
            copied,
            "consolidated short-term memories"
        );
        copied
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Empties the archive
    pub fn clear(&mut self) {
        let count = self.store.clear();
        self.publish(EventPayload::MemoryCleared { count });
    }
}

fn importance_of(entry: &MemoryEntry) -> f64 {
    entry
        .metadata
        .get("importance")
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

/// Fixed scoring heuristic for consolidation
///
/// Base 0.5, +0.1 for content longer than 200 bytes, +0.2 when the entry
/// records a successful task, +0.1 when a tool was used, capped at 1.0.
fn calculate_importance(entry: &MemoryEntry) -> f64 {
    let mut importance = BASE_IMPORTANCE;

    if entry.content.len() > 200 {
        importance += 0.1;
    }

    if entry.metadata.get("task_success").and_then(Value::as_bool) == Some(true) {
        importance += 0.2;
    }

    if entry.metadata.contains_key("tool_used") {
        importance += 0.1;
    }

    importance.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn archive() -> LongTermMemory {
        LongTermMemory::new("agent-test", EventBus::new())
    }

    fn entry_with(content: &str, metadata: Map<String, Value>) -> MemoryEntry {
        MemoryEntry {
            id: "candidate".to_string(),
            content: content.to_string(),
            metadata,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_add_populates_importance() {
        let mut memory = archive();
        let entry = memory.add("a fact", Map::new(), 0.8);

        assert_eq!(
            entry.metadata.get("importance").and_then(Value::as_f64),
            Some(0.8)
        );
        assert_eq!(
            entry.metadata.get("agent_id").and_then(Value::as_str),
            Some("agent-test")
        );
    }

    #[test]
    fn test_add_clamps_importance() {
        let mut memory = archive();
        let too_high = memory.add("a", Map::new(), 1.5);
        let too_low = memory.add("b", Map::new(), -0.2);

        assert_eq!(importance_of(&too_high), 1.0);
        assert_eq!(importance_of(&too_low), 0.0);
    }

    #[test]
    fn test_important_filters_sorts_and_limits() {
        let mut memory = archive();
        memory.add("low", Map::new(), 0.3);
        memory.add("mid", Map::new(), 0.7);
        memory.add("high", Map::new(), 0.9);
        memory.add("top", Map::new(), 1.0);

        let important = memory.important(0.7, 2);
        assert_eq!(important.len(), 2);
        assert_eq!(important[0].content, "top");
        assert_eq!(important[1].content, "high");
    }

    #[test]
    fn test_consolidate_copies_entries_above_threshold() {
        let mut memory = archive();

        let mut metadata = Map::new();
        metadata.insert("task_success".to_string(), json!(true));
        metadata.insert("tool_used".to_string(), json!("calculator"));
        let strong = entry_with(&"x".repeat(201), metadata);

        let copied = memory.consolidate(&[strong]);

        assert_eq!(copied, 1);
        assert_eq!(memory.len(), 1);
        let stored = &memory.important(0.0, 10)[0];
        assert!((importance_of(stored) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_consolidate_skips_score_of_exactly_threshold() {
        let mut memory = archive();

        // Long content alone scores 0.5 + 0.1 = 0.6, not strictly above.
        let borderline = entry_with(&"x".repeat(201), Map::new());

        assert_eq!(memory.consolidate(&[borderline]), 0);
        assert!(memory.is_empty());
    }

    #[test]
    fn test_consolidate_skips_unremarkable_entries() {
        let mut memory = archive();
        let plain = entry_with("short note", Map::new());

        assert_eq!(memory.consolidate(&[plain]), 0);
        assert!(memory.is_empty());
    }

    #[test]
    fn test_consolidate_mixed_batch() {
        let mut memory = archive();

        let mut tool_meta = Map::new();
        tool_meta.insert("tool_used".to_string(), json!("web_search"));

        let candidates = vec![
            entry_with("plain", Map::new()),
            entry_with(&"y".repeat(250), tool_meta),
        ];

        // 0.5 vs 0.5 + 0.1 + 0.1 = 0.7: only the second survives.
        assert_eq!(memory.consolidate(&candidates), 1);
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_consolidation_score_is_capped() {
        let mut metadata = Map::new();
        metadata.insert("task_success".to_string(), json!(true));
        metadata.insert("tool_used".to_string(), json!("notes"));
        metadata.insert("importance".to_string(), json!(0.95));
        let entry = entry_with(&"z".repeat(500), metadata);

        assert!(calculate_importance(&entry) <= 1.0);
    }
}
