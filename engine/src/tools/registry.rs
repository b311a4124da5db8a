//! Name-keyed tool table and dispatch

use crate::events::{Event, EventBus, EventPayload};
use sdk::{EngineError, Tool, ToolArgs, ToolDefinition, ToolResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Registry of the tools an agent can dispatch by name
///
/// Dispatch separates two failure classes on purpose: a name with no
/// registered tool is an error the caller must handle, while a tool that
/// runs and fails reports the failure inside its own result and the
/// conversation carries on.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    bus: EventBus,
}

impl ToolRegistry {
    /// Create an empty registry publishing on the given bus
    pub fn new(bus: EventBus) -> Self {
        Self {
            tools: HashMap::new(),
            bus,
        }
    }

    /// Registers a tool under its own name, silently replacing any
    /// previous holder of that name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        debug!("Registering tool '{}'", tool.name());
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Removes a tool; true when one was registered under the name
    pub fn unregister(&mut self, name: &str) -> bool {
        self.tools.remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).map(Arc::clone)
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names, sorted for stable output
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Definitions advertised to model providers, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> =
            self.tools.values().map(|tool| tool.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatches a call by name
    ///
    /// Unknown names return `EngineError::ToolNotFound`. Anything the tool
    /// itself raises is downgraded to a failed result at this boundary, so
    /// an `Ok` with `success == false` is the only way executions fail.
    /// When `agent_id` is given, execution is published on the bus.
    pub async fn execute(
        &self,
        name: &str,
        args: ToolArgs,
        agent_id: Option<&str>,
    ) -> Result<ToolResult, EngineError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| EngineError::ToolNotFound(name.to_string()))?;

        debug!("Executing tool '{}'", name);
        if let Some(agent_id) = agent_id {
            self.bus.publish(Event::new(
                agent_id,
                EventPayload::ToolStarted {
                    tool: name.to_string(),
                    args: args.to_value(),
                },
            ));
        }

        let result = match tool.execute(args).await {
            Ok(result) => result,
            Err(error) => {
                warn!("Tool '{}' raised an internal error: {}", name, error);
                ToolResult::failure(error.to_string())
            }
        };

        if let Some(agent_id) = agent_id {
            let payload = if result.success {
                EventPayload::ToolCompleted {
                    tool: name.to_string(),
                    result: result.result.clone(),
                }
            } else {
                EventPayload::ToolFailed {
                    tool: name.to_string(),
                    error: result.error.clone().unwrap_or_default(),
                }
            };
            self.bus.publish(Event::new(agent_id, payload));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes its message argument"
        }

        async fn execute(&self, args: ToolArgs) -> Result<ToolResult, EngineError> {
            Ok(ToolResult::text(
                args.str_arg("message").unwrap_or_default(),
            ))
        }
    }

    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn name(&self) -> &str {
            "broken"
        }

        fn description(&self) -> &str {
            "Always raises"
        }

        async fn execute(&self, _args: ToolArgs) -> Result<ToolResult, EngineError> {
            Err(EngineError::Tool("backend went away".to_string()))
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::new(EventBus::new())
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = registry();
        registry.register(Arc::new(EchoTool));

        assert!(registry.has("echo"));
        assert!(registry.get("echo").is_some());
        assert_eq!(registry.names(), vec!["echo"]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reregistering_replaces_silently() {
        let mut registry = registry();
        registry.register(Arc::new(EchoTool));
        registry.register(Arc::new(EchoTool));

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister() {
        let mut registry = registry();
        registry.register(Arc::new(EchoTool));

        assert!(registry.unregister("echo"));
        assert!(!registry.unregister("echo"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_definitions_are_sorted() {
        let mut registry = registry();
        registry.register(Arc::new(EchoTool));
        registry.register(Arc::new(BrokenTool));

        let names: Vec<_> = registry
            .definitions()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["broken", "echo"]);
    }

    #[tokio::test]
    async fn test_execute_unknown_tool_is_an_error() {
        let registry = registry();
        let result = registry.execute("missing", ToolArgs::new(), None).await;

        assert!(matches!(result, Err(EngineError::ToolNotFound(name)) if name == "missing"));
    }

    #[tokio::test]
    async fn test_execute_contains_tool_faults() {
        let mut registry = registry();
        registry.register(Arc::new(BrokenTool));

        let result = registry
            .execute("broken", ToolArgs::new(), None)
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.error.unwrap().contains("backend went away"));
    }

    #[tokio::test]
    async fn test_execute_publishes_events_with_agent_id() {
        let bus = EventBus::new();
        let mut started = bus.subscribe(EventKind::ToolStarted);
        let mut completed = bus.subscribe(EventKind::ToolCompleted);

        let mut registry = ToolRegistry::new(bus);
        registry.register(Arc::new(EchoTool));

        let args = ToolArgs::new().with("message", json!("hi"));
        registry
            .execute("echo", args, Some("agent-1"))
            .await
            .unwrap();

        assert_eq!(started.recv().await.unwrap().agent_id, "agent-1");
        match completed.recv().await.unwrap().payload {
            EventPayload::ToolCompleted { tool, result } => {
                assert_eq!(tool, "echo");
                assert_eq!(result, json!("hi"));
            }
            _ => panic!("Wrong event kind"),
        }
    }

    #[tokio::test]
    async fn test_execute_without_agent_id_stays_silent() {
        let bus = EventBus::new();
        let mut all = bus.subscribe_all();

        let mut registry = ToolRegistry::new(bus);
        registry.register(Arc::new(EchoTool));
        registry.execute("echo", ToolArgs::new(), None).await.unwrap();

        assert!(all.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failed_execution_publishes_tool_failed() {
        let bus = EventBus::new();
        let mut failed = bus.subscribe(EventKind::ToolFailed);

        let mut registry = ToolRegistry::new(bus);
        registry.register(Arc::new(BrokenTool));
        registry
            .execute("broken", ToolArgs::new(), Some("agent-1"))
            .await
            .unwrap();

        match failed.recv().await.unwrap().payload {
            EventPayload::ToolFailed { tool, error } => {
                assert_eq!(tool, "broken");
                assert!(error.contains("backend went away"));
            }
            _ => panic!("Wrong event kind"),
        }
    }
}
