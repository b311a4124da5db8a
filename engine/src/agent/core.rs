//! Agent core
//!
//! Implements the conversation loop that orchestrates everything else:
//!
//! 1. Seed the history with the system prompt on first contact
//! 2. Call the model provider with history and tool definitions
//! 3. If the model requested a tool: dispatch it, feed the result back,
//!    and go around again
//! 4. If the model answered in text: record it and return
//!
//! The loop is bounded by `max_iterations`; exhausting the budget yields a
//! fixed apology that is returned to the caller but never recorded in the
//! conversation history or memory.

use sdk::{EngineError, Tool, ToolArgs};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::events::{Event, EventBus, EventPayload};
use crate::llm::{create_provider, Message, ModelProvider};
use crate::memory::{LongTermMemory, MemoryEntry, ShortTermMemory, DEFAULT_CAPACITY};
use crate::tasks::{Task, TaskPlanner, TaskQueue, TaskReport, TaskSpec, TaskStatus};
use crate::tools::{CalculatorTool, NoteTool, ToolRegistry, WebSearchTool};

/// Returned when a turn exhausts its iteration budget without an answer
pub const MAX_ITERATIONS_RESPONSE: &str =
    "I apologize, but I reached the maximum number of iterations without completing the task.";

/// Identity and loop settings for constructing an agent
#[derive(Debug, Clone)]
pub struct AgentSettings {
    /// Agent name, used in prompts and event envelopes
    pub name: String,

    /// One-line description woven into the default system prompt
    pub description: String,

    /// Custom system prompt; composed from name and description when absent
    pub system_prompt: Option<String>,

    /// Upper bound on model calls per conversation turn
    pub max_iterations: u32,

    /// Entries kept in short-term memory before eviction
    pub short_term_capacity: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            name: "assistant".to_string(),
            description: String::new(),
            system_prompt: None,
            max_iterations: 10,
            short_term_capacity: DEFAULT_CAPACITY,
        }
    }
}

fn default_system_prompt(name: &str, description: &str) -> String {
    format!(
        "You are {}, {}.\n\
         You are a helpful and intelligent agent that can use tools to accomplish tasks.\n\
         When you need to use a tool, respond with a function call.\n\
         Always think step by step and explain your reasoning.",
        name, description
    )
}

fn tagged(kind: &str) -> Map<String, Value> {
    let mut metadata = Map::new();
    metadata.insert("kind".to_string(), json!(kind));
    metadata
}

/// An agent: one model provider, one tool set, one conversation
pub struct Agent {
    id: String,
    name: String,
    description: String,
    system_prompt: String,
    max_iterations: u32,
    provider: Box<dyn ModelProvider>,
    tools: ToolRegistry,
    short_term: ShortTermMemory,
    long_term: LongTermMemory,
    queue: TaskQueue,
    planner: TaskPlanner,
    bus: EventBus,
    history: Vec<Message>,
}

impl Agent {
    pub fn new(settings: AgentSettings, provider: Box<dyn ModelProvider>, bus: EventBus) -> Self {
        let id = Uuid::new_v4().to_string();

        let system_prompt = settings
            .system_prompt
            .unwrap_or_else(|| default_system_prompt(&settings.name, &settings.description));

        let agent = Self {
            id: id.clone(),
            name: settings.name,
            description: settings.description,
            system_prompt,
            max_iterations: settings.max_iterations,
            provider,
            tools: ToolRegistry::new(bus.clone()),
            short_term: ShortTermMemory::new(
                id.clone(),
                settings.short_term_capacity,
                bus.clone(),
            ),
            long_term: LongTermMemory::new(id.clone(), bus.clone()),
            queue: TaskQueue::new(id, bus.clone()),
            planner: TaskPlanner::new(),
            bus,
            history: Vec::new(),
        };

        info!("Agent created: {} ({})", agent.name, agent.id);
        agent.publish(EventPayload::AgentCreated {
            name: agent.name.clone(),
        });

        agent
    }

    /// Builds an agent from configuration, wiring up the configured
    /// provider and the enabled built-in tools
    pub fn from_config(config: &Config, bus: EventBus) -> Result<Self, EngineError> {
        config.validate()?;

        let provider = create_provider(&config.llm)?;
        let settings = AgentSettings {
            name: config.agent.name.clone(),
            description: config.agent.description.clone(),
            system_prompt: config.agent.system_prompt.clone(),
            max_iterations: config.agent.max_iterations,
            short_term_capacity: config.memory.short_term_capacity,
        };

        let mut agent = Self::new(settings, provider, bus);

        if config.tools.calculator {
            agent.register_tool(Arc::new(CalculatorTool));
        }
        if config.tools.notes {
            agent.register_tool(Arc::new(NoteTool::new()));
        }
        if config.tools.web_search {
            agent.register_tool(Arc::new(WebSearchTool));
        }

        Ok(agent)
    }

    fn publish(&self, payload: EventPayload) {
        self.bus.publish(Event::new(self.id.as_str(), payload));
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The registry backing this agent's tool dispatch
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Makes a tool available to the model
    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) {
        self.tools.register(tool);
    }

    /// The conversation as sent to the provider
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Drops the conversation; the next run reseeds the system prompt
    pub fn clear_conversation(&mut self) {
        self.history.clear();
        debug!("Conversation cleared for agent '{}'", self.name);
    }

    /// Most recent short-term memories, newest first
    pub fn recent_memories(&self, limit: usize) -> Vec<MemoryEntry> {
        self.short_term.recent(limit)
    }

    /// Copies important short-term entries into long-term storage
    pub fn consolidate_memories(&mut self) -> usize {
        let entries = self.short_term.all();
        let copied = self.long_term.consolidate(&entries);
        info!(
            "Memories consolidated for agent '{}': {} copied",
            self.name, copied
        );
        copied
    }

    /// Runs one conversation turn through the think-act loop
    pub async fn run(&mut self, input: &str) -> Result<String, EngineError> {
        match self.run_turn(input).await {
            Ok(response) => Ok(response),
            Err(error) => {
                error!("Agent '{}' turn failed: {}", self.name, error);
                self.publish(EventPayload::TurnFailed {
                    error: error.to_string(),
                });
                Err(error)
            }
        }
    }

    async fn run_turn(&mut self, input: &str) -> Result<String, EngineError> {
        self.publish(EventPayload::TurnStarted {
            input: input.to_string(),
        });

        if self.history.is_empty() {
            self.history.push(Message::system(self.system_prompt.clone()));
        }
        self.history.push(Message::user(input));
        self.short_term.add(input, tagged("user_input"));

        let mut iterations = 0;
        let mut final_response = None;

        while iterations < self.max_iterations as usize {
            iterations += 1;
            self.publish(EventPayload::ModelRequest {
                iteration: iterations,
            });

            let definitions = self.tools.definitions();
            let response = self.provider.generate(&self.history, &definitions).await?;

            self.publish(EventPayload::ModelResponse {
                iteration: iterations,
                tool_call: response.call.as_ref().map(|call| call.name.clone()),
                total_tokens: response.usage.map(|usage| usage.total_tokens),
            });

            if let Some(call) = response.call {
                let args = ToolArgs::from_json_str(&call.arguments);
                debug!("Executing tool: {}", call.name);

                // Dispatch happens before the exchange is recorded; an
                // unknown tool aborts the turn with the history unchanged.
                let result = self.tools.execute(&call.name, args, Some(&self.id)).await?;
                let result_json = serde_json::to_string(&result)?;

                self.history
                    .push(Message::assistant_call(response.content, call.clone()));
                self.history
                    .push(Message::function(call.name.clone(), result_json.clone()));

                let mut metadata = tagged("tool_execution");
                metadata.insert("tool_used".to_string(), json!(call.name));
                self.short_term.add(
                    format!("Used tool {}: {}", call.name, result_json),
                    metadata,
                );

                continue;
            }

            self.history.push(Message::assistant(response.content.clone()));
            self.short_term
                .add(response.content.clone(), tagged("agent_response"));
            final_response = Some(response.content);
            break;
        }

        let final_response = match final_response {
            Some(response) => response,
            None => {
                warn!("Agent '{}' reached max iterations", self.name);
                MAX_ITERATIONS_RESPONSE.to_string()
            }
        };

        self.publish(EventPayload::TurnCompleted {
            response: final_response.clone(),
            iterations,
        });

        Ok(final_response)
    }

    /// Plans a task, drives every step through the conversation loop, and
    /// returns the packaged report
    ///
    /// A step failure fails the whole task; the failure comes back as data
    /// in the report rather than as an error, so callers can distinguish
    /// "the task did not work out" from "the engine broke".
    pub async fn execute_task(&mut self, spec: TaskSpec) -> Result<TaskReport, EngineError> {
        let task_id = self.queue.add(spec).id.clone();
        self.drive_task(&task_id).await
    }

    async fn drive_task(&mut self, task_id: &str) -> Result<TaskReport, EngineError> {
        let description = self
            .queue
            .get(task_id)
            .map(|task| task.description.clone())
            .ok_or_else(|| EngineError::Task(format!("unknown task: {}", task_id)))?;

        let steps = self.planner.plan(&description);
        let step_count = steps.len();

        {
            let task = self.task_mut(task_id)?;
            task.start()?;
            for step in steps {
                task.add_step(step);
            }
        }
        self.publish(EventPayload::TaskStarted {
            task_id: task_id.to_string(),
        });

        for index in 0..step_count {
            let (step_id, step_description) = {
                let task = self.task_mut(task_id)?;
                task.update_step(index, TaskStatus::InProgress, None, None)?;
                let step = &task.steps[index];
                (step.id.clone(), step.description.clone())
            };

            self.publish(EventPayload::StepStarted {
                task_id: task_id.to_string(),
                step_id: step_id.clone(),
                description: step_description.clone(),
            });

            match self.run(&step_description).await {
                Ok(step_result) => {
                    let task = self.task_mut(task_id)?;
                    task.update_step(index, TaskStatus::Completed, Some(step_result), None)?;

                    self.publish(EventPayload::StepCompleted {
                        task_id: task_id.to_string(),
                        step_id,
                    });
                }
                Err(step_error) => {
                    let message = step_error.to_string();
                    {
                        let task = self.task_mut(task_id)?;
                        task.update_step(index, TaskStatus::Failed, None, Some(message.clone()))?;
                        task.fail(message.clone())?;
                    }

                    self.publish(EventPayload::TaskFailed {
                        task_id: task_id.to_string(),
                        error: message,
                    });
                    error!("Task {} failed at step {}", task_id, index);

                    return self.task_report(task_id);
                }
            }
        }

        let final_result = {
            let task = self.task_mut(task_id)?;
            let combined = task
                .steps
                .iter()
                .filter_map(|step| step.result.clone())
                .collect::<Vec<_>>()
                .join("\n\n");
            task.complete(combined.clone())?;
            combined
        };
        self.queue.mark_completed(task_id);

        self.publish(EventPayload::TaskCompleted {
            task_id: task_id.to_string(),
            result: final_result,
        });
        info!("Task completed: {}", task_id);

        self.task_report(task_id)
    }

    fn task_mut(&mut self, id: &str) -> Result<&mut Task, EngineError> {
        self.queue
            .get_mut(id)
            .ok_or_else(|| EngineError::Task(format!("unknown task: {}", id)))
    }

    fn task_report(&self, id: &str) -> Result<TaskReport, EngineError> {
        self.queue
            .get(id)
            .and_then(|task| task.result.clone())
            .ok_or_else(|| EngineError::Task(format!("no report for task: {}", id)))
    }
}
