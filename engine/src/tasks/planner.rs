//! Deterministic keyword planning

use super::task::{Task, TaskSpec};
use serde_json::{json, Map};
use uuid::Uuid;

/// Coarse complexity label for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// Splits task descriptions into ordered steps by keyword
///
/// Planning is deterministic: the same description always yields the same
/// steps, so task runs stay reproducible under test.
#[derive(Debug, Default)]
pub struct TaskPlanner;

impl TaskPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Ordered step descriptions for a task description
    pub fn plan(&self, description: &str) -> Vec<String> {
        let lowered = description.to_lowercase();

        let steps: &[&str] = if lowered.contains("research") {
            &[
                "Identify key topics and questions",
                "Search for relevant information",
                "Analyze and synthesize findings",
                "Summarize results",
            ]
        } else if lowered.contains("write") {
            &[
                "Outline the content structure",
                "Draft the main content",
                "Review and edit",
                "Finalize the document",
            ]
        } else if lowered.contains("analyze") {
            &[
                "Collect data",
                "Process and clean data",
                "Perform analysis",
                "Generate report",
            ]
        } else {
            &[
                "Understand the requirements",
                "Execute the task",
                "Verify the results",
            ]
        };

        steps.iter().map(|step| step.to_string()).collect()
    }

    /// Splits a description into a chain of dependent sub-task specs
    ///
    /// Sub-task ids are generated here so each spec can depend on the id of
    /// its predecessor before any of them is enqueued.
    pub fn decompose(&self, description: &str) -> Vec<TaskSpec> {
        let steps = self.plan(description);
        let ids: Vec<String> = steps
            .iter()
            .map(|_| Uuid::new_v4().to_string())
            .collect();

        steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| {
                let mut metadata = Map::new();
                metadata.insert("parent_task".to_string(), json!(description));
                metadata.insert("step_index".to_string(), json!(index));

                let dependencies = if index == 0 {
                    Vec::new()
                } else {
                    vec![ids[index - 1].clone()]
                };

                TaskSpec::new(step)
                    .with_id(ids[index].clone())
                    .with_dependencies(dependencies)
                    .with_metadata(metadata)
            })
            .collect()
    }

    /// Coarse complexity estimate from description length and dependencies
    pub fn estimate_complexity(&self, task: &Task) -> Complexity {
        let words = task.description.split_whitespace().count();
        let dependencies = task.dependencies.len();

        if words > 20 || dependencies > 2 {
            Complexity::High
        } else if words > 10 || dependencies > 0 {
            Complexity::Medium
        } else {
            Complexity::Low
        }
    }
}
