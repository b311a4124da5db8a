//! Task entity and lifecycle

use chrono::{DateTime, Utc};
use sdk::EngineError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::str::FromStr;
use uuid::Uuid;

/// Task priority, ordered lowest to highest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(EngineError::Task(format!("unknown priority: {}", other))),
        }
    }
}

/// Where a task or step is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// One unit of work inside a task, executed strictly in order
#[derive(Debug, Clone, Serialize)]
pub struct TaskStep {
    pub id: String,
    pub description: String,
    pub status: TaskStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result: Option<String>,
    pub error: Option<String>,
}

impl TaskStep {
    fn new(index: usize, description: impl Into<String>) -> Self {
        Self {
            id: format!("step-{}", index),
            description: description.into(),
            status: TaskStatus::Pending,
            started_at: None,
            completed_at: None,
            result: None,
            error: None,
        }
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Default)]
pub struct TaskSpec {
    /// Pre-assigned id; generated at task creation when absent
    pub id: Option<String>,
    pub description: String,
    pub priority: Priority,
    pub deadline: Option<DateTime<Utc>>,
    pub dependencies: Vec<String>,
    pub metadata: Map<String, Value>,
}

impl TaskSpec {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Outcome packaged when a task reaches a terminal state
#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub success: bool,
    pub result: Option<String>,
    pub error: Option<String>,
    pub steps: Vec<TaskStep>,
    pub duration_ms: i64,
}

/// A unit of work with priority, dependencies and ordered steps
///
/// The lifecycle is pending, in_progress, then exactly one of completed or
/// failed. Terminal states are terminal; attempting to leave one is an
/// error, not a silent overwrite.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub deadline: Option<DateTime<Utc>>,
    pub dependencies: Vec<String>,
    pub metadata: Map<String, Value>,
    pub steps: Vec<TaskStep>,
    pub result: Option<TaskReport>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Queue insertion sequence, the FIFO tie-break within a priority band
    #[serde(skip)]
    pub(crate) sequence: u64,
}

impl Task {
    pub fn new(spec: TaskSpec) -> Self {
        Self {
            id: spec.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            description: spec.description,
            priority: spec.priority,
            status: TaskStatus::Pending,
            deadline: spec.deadline,
            dependencies: spec.dependencies,
            metadata: spec.metadata,
            steps: Vec::new(),
            result: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            sequence: 0,
        }
    }

    fn transition_error(&self, to: TaskStatus) -> EngineError {
        EngineError::Task(format!(
            "invalid transition from {} to {} for task {}",
            self.status.as_str(),
            to.as_str(),
            self.id
        ))
    }

    fn duration_ms(&self, end: DateTime<Utc>) -> i64 {
        (end - self.started_at.unwrap_or(self.created_at)).num_milliseconds()
    }

    /// Moves the task from pending to in_progress
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.status != TaskStatus::Pending {
            return Err(self.transition_error(TaskStatus::InProgress));
        }
        self.status = TaskStatus::InProgress;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// Completes the task, packaging its report into `result`
    ///
    /// Duration runs from `started_at`, or from `created_at` for a task
    /// completed without ever starting.
    pub fn complete(&mut self, result: impl Into<String>) -> Result<(), EngineError> {
        if self.status.is_terminal() {
            return Err(self.transition_error(TaskStatus::Completed));
        }
        let completed_at = Utc::now();
        self.status = TaskStatus::Completed;
        self.result = Some(TaskReport {
            success: true,
            result: Some(result.into()),
            error: None,
            steps: self.steps.clone(),
            duration_ms: self.duration_ms(completed_at),
        });
        self.completed_at = Some(completed_at);
        Ok(())
    }

    /// Fails the task, packaging its report into `result`
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), EngineError> {
        if self.status.is_terminal() {
            return Err(self.transition_error(TaskStatus::Failed));
        }
        let completed_at = Utc::now();
        self.status = TaskStatus::Failed;
        self.result = Some(TaskReport {
            success: false,
            result: None,
            error: Some(error.into()),
            steps: self.steps.clone(),
            duration_ms: self.duration_ms(completed_at),
        });
        self.completed_at = Some(completed_at);
        Ok(())
    }

    /// Appends a pending step
    pub fn add_step(&mut self, description: impl Into<String>) -> &TaskStep {
        let index = self.steps.len();
        self.steps.push(TaskStep::new(index, description));
        &self.steps[index]
    }

    /// Updates a step in place, stamping timestamps from the new status
    pub fn update_step(
        &mut self,
        index: usize,
        status: TaskStatus,
        result: Option<String>,
        error: Option<String>,
    ) -> Result<(), EngineError> {
        let id = self.id.clone();
        let step = self.steps.get_mut(index).ok_or_else(|| {
            EngineError::Task(format!("no step at index {} in task {}", index, id))
        })?;

        match status {
            TaskStatus::InProgress => step.started_at = Some(Utc::now()),
            TaskStatus::Completed | TaskStatus::Failed => {
                step.completed_at = Some(Utc::now())
            }
            TaskStatus::Pending => {}
        }
        step.status = status;
        if result.is_some() {
            step.result = result;
        }
        if error.is_some() {
            step.error = error;
        }
        Ok(())
    }

    /// True when every dependency id is in the completed set
    pub fn is_ready(&self, completed: &HashSet<String>) -> bool {
        self.dependencies
            .iter()
            .all(|dependency| completed.contains(dependency))
    }
}
