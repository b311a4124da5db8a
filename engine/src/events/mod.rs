//! Event bus for agent observability
//!
//! The EventBus provides a pub/sub pattern over everything observable an
//! agent does: conversational turns, model calls, tool executions, task
//! lifecycle changes and memory writes. It uses bounded channels to prevent
//! unbounded memory growth and supports both specific event subscriptions
//! and global "All" subscriptions.
//!
//! The bus is an explicitly constructed value. Components that publish hold
//! a cloned handle; nothing in the engine reaches for a global instance.
//! Publishing never blocks and never fails the publisher: a subscriber
//! whose buffer is full simply misses that delivery.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Channel buffer size for bounded subscriber channels
const CHANNEL_BUFFER_SIZE: usize = 100;

/// Receiver half of a subscription
pub type EventStream = mpsc::Receiver<Event>;

/// Event kinds that can be subscribed to on the bus
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
pub enum EventKind {
    /// An agent was constructed
    AgentCreated,
    /// A conversational turn began
    TurnStarted,
    /// The model was invoked
    ModelRequest,
    /// The model responded
    ModelResponse,
    /// A conversational turn finished with a response
    TurnCompleted,
    /// A conversational turn aborted with an error
    TurnFailed,
    /// A tool execution began
    ToolStarted,
    /// A tool execution finished
    ToolCompleted,
    /// A tool execution failed
    ToolFailed,
    /// A task was created
    TaskCreated,
    /// A task began executing
    TaskStarted,
    /// A task step began
    StepStarted,
    /// A task step finished
    StepCompleted,
    /// A task completed successfully
    TaskCompleted,
    /// A task failed
    TaskFailed,
    /// A memory entry was stored
    MemoryAdded,
    /// Memory was searched
    MemoryRetrieved,
    /// A memory tier was cleared
    MemoryCleared,
    /// Subscribe to all event kinds
    All,
}

/// Payload carried by an event, one variant per observable occurrence
#[derive(Debug, Clone, Serialize)]
pub enum EventPayload {
    AgentCreated {
        name: String,
    },
    TurnStarted {
        input: String,
    },
    ModelRequest {
        iteration: usize,
    },
    ModelResponse {
        iteration: usize,
        tool_call: Option<String>,
        total_tokens: Option<u32>,
    },
    TurnCompleted {
        response: String,
        iterations: usize,
    },
    TurnFailed {
        error: String,
    },
    ToolStarted {
        tool: String,
        args: serde_json::Value,
    },
    ToolCompleted {
        tool: String,
        result: serde_json::Value,
    },
    ToolFailed {
        tool: String,
        error: String,
    },
    TaskCreated {
        task_id: String,
        description: String,
    },
    TaskStarted {
        task_id: String,
    },
    StepStarted {
        task_id: String,
        step_id: String,
        description: String,
    },
    StepCompleted {
        task_id: String,
        step_id: String,
    },
    TaskCompleted {
        task_id: String,
        result: String,
    },
    TaskFailed {
        task_id: String,
        error: String,
    },
    MemoryAdded {
        memory_id: String,
        content: String,
    },
    MemoryRetrieved {
        query: String,
        count: usize,
    },
    MemoryCleared {
        count: usize,
    },
}

impl EventPayload {
    /// Get the event kind for this payload
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::AgentCreated { .. } => EventKind::AgentCreated,
            EventPayload::TurnStarted { .. } => EventKind::TurnStarted,
            EventPayload::ModelRequest { .. } => EventKind::ModelRequest,
            EventPayload::ModelResponse { .. } => EventKind::ModelResponse,
            EventPayload::TurnCompleted { .. } => EventKind::TurnCompleted,
            EventPayload::TurnFailed { .. } => EventKind::TurnFailed,
            EventPayload::ToolStarted { .. } => EventKind::ToolStarted,
            EventPayload::ToolCompleted { .. } => EventKind::ToolCompleted,
            EventPayload::ToolFailed { .. } => EventKind::ToolFailed,
            EventPayload::TaskCreated { .. } => EventKind::TaskCreated,
            EventPayload::TaskStarted { .. } => EventKind::TaskStarted,
            EventPayload::StepStarted { .. } => EventKind::StepStarted,
            EventPayload::StepCompleted { .. } => EventKind::StepCompleted,
            EventPayload::TaskCompleted { .. } => EventKind::TaskCompleted,
            EventPayload::TaskFailed { .. } => EventKind::TaskFailed,
            EventPayload::MemoryAdded { .. } => EventKind::MemoryAdded,
            EventPayload::MemoryRetrieved { .. } => EventKind::MemoryRetrieved,
            EventPayload::MemoryCleared { .. } => EventKind::MemoryCleared,
        }
    }
}

/// An event published on the bus
///
/// Every event records which agent produced it and when. The payload
/// carries the occurrence-specific data.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub agent_id: String,
    pub at: DateTime<Utc>,
    pub payload: EventPayload,
}

impl Event {
    /// Create an event stamped with the current time
    pub fn new(agent_id: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            agent_id: agent_id.into(),
            at: Utc::now(),
            payload,
        }
    }

    /// Get the event kind for this event
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

/// Event bus for pub/sub communication
///
/// The EventBus allows observers to subscribe to specific event kinds or
/// all events, and publishers to fan events out to every subscriber. It
/// uses bounded channels to prevent unbounded memory growth. Handles are
/// cheap to clone; all clones share the same subscriber table.
#[derive(Clone)]
pub struct EventBus {
    /// Map of event kinds to lists of subscribers
    /// Each subscriber gets a bounded channel with CHANNEL_BUFFER_SIZE capacity
    channels: Arc<Mutex<HashMap<EventKind, Vec<mpsc::Sender<Event>>>>>,
}

impl EventBus {
    /// Create a new EventBus
    pub fn new() -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    // A poisoned lock only means a panic happened while a publisher held
    // it; the subscriber table itself is still usable.
    fn channels(&self) -> MutexGuard<'_, HashMap<EventKind, Vec<mpsc::Sender<Event>>>> {
        match self.channels.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Subscribe to a specific event kind
    ///
    /// Returns a receiver that will receive events of the specified kind.
    /// The channel is bounded with CHANNEL_BUFFER_SIZE capacity; a
    /// subscriber that stops draining misses deliveries rather than
    /// stalling publishers.
    pub fn subscribe(&self, kind: EventKind) -> EventStream {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        self.channels().entry(kind).or_default().push(tx);
        rx
    }

    /// Subscribe to every event published on the bus
    pub fn subscribe_all(&self) -> EventStream {
        self.subscribe(EventKind::All)
    }

    /// Publish an event to all subscribers
    ///
    /// The event is sent to all subscribers of the specific event kind, as
    /// well as all subscribers of EventKind::All. Publishing never blocks:
    /// a full subscriber buffer drops that delivery, and subscribers whose
    /// receivers were dropped are pruned from the table.
    pub fn publish(&self, event: Event) {
        let mut channels = self.channels();
        let kind = event.kind();

        for key in [kind, EventKind::All] {
            if let Some(subscribers) = channels.get_mut(&key) {
                subscribers.retain(|tx| match tx.try_send(event.clone()) {
                    Ok(()) => true,
                    Err(TrySendError::Full(_)) => {
                        tracing::debug!(kind = ?kind, "subscriber buffer full, dropping event");
                        true
                    }
                    Err(TrySendError::Closed(_)) => false,
                });
            }
        }
    }

    /// Number of live subscribers for an event kind
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.channels().get(&kind).map_or(0, Vec::len)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
