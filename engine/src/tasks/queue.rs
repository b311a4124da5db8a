//! Priority and dependency aware task queue

use super::task::{Task, TaskSpec, TaskStatus};
use crate::events::{Event, EventBus, EventPayload};
use std::collections::{HashMap, HashSet};

/// Holds tasks until a driver picks them up
///
/// A task is ready when it is pending and every dependency id is in the
/// completed set. Among ready tasks the highest priority wins; ties go to
/// the task enqueued first. Completion of a dependency only counts once the
/// caller marks it via [`TaskQueue::mark_completed`], which refuses tasks
/// that are not actually completed.
pub struct TaskQueue {
    tasks: HashMap<String, Task>,
    completed: HashSet<String>,
    next_sequence: u64,
    bus: EventBus,
    agent_id: String,
}

impl TaskQueue {
    pub fn new(agent_id: impl Into<String>, bus: EventBus) -> Self {
        Self {
            tasks: HashMap::new(),
            completed: HashSet::new(),
            next_sequence: 0,
            bus,
            agent_id: agent_id.into(),
        }
    }

    /// Enqueues a task built from `spec` and publishes `TaskCreated`
    pub fn add(&mut self, spec: TaskSpec) -> &Task {
        let mut task = Task::new(spec);
        task.sequence = self.next_sequence;
        self.next_sequence += 1;

        self.bus.publish(Event::new(
            self.agent_id.as_str(),
            EventPayload::TaskCreated {
                task_id: task.id.clone(),
                description: task.description.clone(),
            },
        ));

        let id = task.id.clone();
        self.tasks.insert(id.clone(), task);
        &self.tasks[&id]
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    /// All tasks in insertion order
    pub fn all(&self) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.values().collect();
        tasks.sort_by_key(|task| task.sequence);
        tasks
    }

    /// Tasks with the given status, in insertion order
    pub fn by_status(&self, status: TaskStatus) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .values()
            .filter(|task| task.status == status)
            .collect();
        tasks.sort_by_key(|task| task.sequence);
        tasks
    }

    pub fn pending(&self) -> Vec<&Task> {
        self.by_status(TaskStatus::Pending)
    }

    pub fn in_progress(&self) -> Vec<&Task> {
        self.by_status(TaskStatus::InProgress)
    }

    pub fn completed(&self) -> Vec<&Task> {
        self.by_status(TaskStatus::Completed)
    }

    pub fn failed(&self) -> Vec<&Task> {
        self.by_status(TaskStatus::Failed)
    }

    /// The ready task that should run next, if any
    pub fn next_ready(&self) -> Option<&Task> {
        self.tasks
            .values()
            .filter(|task| task.status == TaskStatus::Pending && task.is_ready(&self.completed))
            .max_by(|a, b| {
                a.priority
                    .cmp(&b.priority)
                    .then(b.sequence.cmp(&a.sequence))
            })
    }

    pub fn has_ready_tasks(&self) -> bool {
        self.next_ready().is_some()
    }

    /// Records a completed task so its dependents become eligible
    ///
    /// A no-op unless the task exists and its status is completed; marking
    /// a pending or failed task would unblock dependents prematurely.
    pub fn mark_completed(&mut self, id: &str) {
        if let Some(task) = self.tasks.get(id) {
            if task.status == TaskStatus::Completed {
                self.completed.insert(id.to_string());
            }
        }
    }

    /// Removes a task and forgets its completion record
    pub fn remove(&mut self, id: &str) -> bool {
        self.completed.remove(id);
        self.tasks.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
        self.completed.clear();
    }
}
