//! Integration tests for task planning and execution
//!
//! Covers the full path from a task description to a packaged report: the
//! planner's step templates, the per-step conversation turns, failure as
//! data, and dependency-chained sub-tasks moving through the queue.

use async_trait::async_trait;
use sdk::ToolDefinition;
use std::collections::VecDeque;
use std::sync::Mutex;

use steward_engine::agent::{Agent, AgentSettings};
use steward_engine::events::{EventBus, EventKind, EventPayload};
use steward_engine::llm::{Message, ModelProvider, ProviderError, ProviderResponse};
use steward_engine::tasks::{TaskPlanner, TaskQueue, TaskSpec, TaskStatus};

type ScriptEntry = Result<ProviderResponse, ProviderError>;

struct ScriptedProvider {
    script: Mutex<VecDeque<ScriptEntry>>,
}

impl ScriptedProvider {
    fn new(script: Vec<ScriptEntry>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        _messages: &[Message],
        _tools: &[ToolDefinition],
    ) -> Result<ProviderResponse, ProviderError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ProviderResponse::text("script exhausted")))
    }
}

fn scripted_agent(script: Vec<&str>, bus: EventBus) -> Agent {
    let entries = script
        .into_iter()
        .map(|text| Ok(ProviderResponse::text(text)))
        .collect();
    failing_agent(entries, bus)
}

fn failing_agent(script: Vec<ScriptEntry>, bus: EventBus) -> Agent {
    Agent::new(
        AgentSettings {
            name: "worker".to_string(),
            description: "a task-driving agent under test".to_string(),
            ..AgentSettings::default()
        },
        Box::new(ScriptedProvider::new(script)),
        bus,
    )
}

#[tokio::test]
async fn test_task_runs_every_planned_step() {
    let bus = EventBus::new();
    let mut created = bus.subscribe(EventKind::TaskCreated);
    let mut step_completions = bus.subscribe(EventKind::StepCompleted);
    let mut completed = bus.subscribe(EventKind::TaskCompleted);

    let mut agent = scripted_agent(
        vec![
            "requirements understood",
            "task executed",
            "results verified",
        ],
        bus,
    );

    let report = agent
        .execute_task(TaskSpec::new("tidy the workshop"))
        .await
        .unwrap();

    assert!(report.success);
    assert!(report.error.is_none());
    assert!(report.duration_ms >= 0);

    // The default plan has three steps; each one ran one turn and kept
    // its answer.
    assert_eq!(report.steps.len(), 3);
    assert!(report
        .steps
        .iter()
        .all(|step| step.status == TaskStatus::Completed));
    assert_eq!(
        report.result.as_deref(),
        Some("requirements understood\n\ntask executed\n\nresults verified")
    );

    match created.try_recv().unwrap().payload {
        EventPayload::TaskCreated { description, .. } => {
            assert_eq!(description, "tidy the workshop");
        }
        other => panic!("unexpected payload: {:?}", other),
    }

    let mut completions = 0;
    while step_completions.try_recv().is_ok() {
        completions += 1;
    }
    assert_eq!(completions, 3);

    match completed.try_recv().unwrap().payload {
        EventPayload::TaskCompleted { result, .. } => {
            assert_eq!(Some(result), report.result);
        }
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[tokio::test]
async fn test_research_tasks_get_the_research_plan() {
    let mut agent = scripted_agent(
        vec!["topics", "sources", "synthesis", "summary"],
        EventBus::new(),
    );

    let report = agent
        .execute_task(TaskSpec::new("research crab migration"))
        .await
        .unwrap();

    assert_eq!(report.steps.len(), 4);
    assert_eq!(report.steps[0].description, "Identify key topics and questions");
    assert_eq!(report.steps[3].description, "Summarize results");
    assert_eq!(
        report.result.as_deref(),
        Some("topics\n\nsources\n\nsynthesis\n\nsummary")
    );
}

#[tokio::test]
async fn test_step_failure_fails_the_task_as_data() {
    let bus = EventBus::new();
    let mut failures = bus.subscribe(EventKind::TaskFailed);

    let mut agent = failing_agent(
        vec![
            Ok(ProviderResponse::text("step one done")),
            Err(ProviderError::Unavailable("model host down".to_string())),
        ],
        bus,
    );

    // The engine call itself succeeds; the failure is in the report.
    let report = agent
        .execute_task(TaskSpec::new("replace the catalytic converter"))
        .await
        .unwrap();

    assert!(!report.success);
    assert!(report.error.clone().unwrap().contains("model host down"));

    assert_eq!(report.steps[0].status, TaskStatus::Completed);
    assert_eq!(report.steps[1].status, TaskStatus::Failed);
    assert!(report.steps[1].error.clone().unwrap().contains("model host down"));
    // The failing step ended the task before later steps started.
    assert_eq!(report.steps[2].status, TaskStatus::Pending);

    match failures.try_recv().unwrap().payload {
        EventPayload::TaskFailed { error, .. } => {
            assert!(error.contains("model host down"));
        }
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[test]
fn test_decomposed_chain_moves_through_the_queue_in_order() {
    let planner = TaskPlanner::new();
    let specs = planner.decompose("research the rust ecosystem");
    let expected: Vec<String> = specs.iter().map(|spec| spec.description.clone()).collect();

    let mut queue = TaskQueue::new("agent-x", EventBus::new());
    for spec in specs {
        queue.add(spec);
    }

    // Only the head of the chain is ready; completing each task unlocks
    // exactly the next one.
    let mut executed = Vec::new();
    while let Some(task) = queue.next_ready() {
        let id = task.id.clone();
        executed.push(task.description.clone());

        let task = queue.get_mut(&id).unwrap();
        task.start().unwrap();
        task.complete("ok".to_string()).unwrap();
        queue.mark_completed(&id);
    }

    assert_eq!(executed, expected);
    assert!(!queue.has_ready_tasks());
}
