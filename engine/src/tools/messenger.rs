//! Outbound messaging through an injected transport

use async_trait::async_trait;
use chrono::Utc;
use sdk::{EngineError, Tool, ToolArgs, ToolResult};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// How long a send may take before it is abandoned
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound transport the messenger tool delegates to
///
/// The engine ships no implementation. Front-ends supply one for whatever
/// platform they bridge, along with its session handling.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, recipient: &str, message: &str) -> Result<(), EngineError>;
}

/// Sends a message to a recipient through the configured transport
pub struct MessengerTool {
    sender: Arc<dyn MessageSender>,
}

impl MessengerTool {
    pub fn new(sender: Arc<dyn MessageSender>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl Tool for MessengerTool {
    fn name(&self) -> &str {
        "send_message"
    }

    fn description(&self) -> &str {
        "Sends a message to a recipient on the connected messaging platform"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "recipient": {
                    "type": "string",
                    "description": "Platform identifier of the recipient"
                },
                "message": {
                    "type": "string",
                    "description": "The message text to send"
                }
            },
            "required": ["recipient", "message"]
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolResult, EngineError> {
        let recipient = args.str_arg("recipient").unwrap_or_default();
        let message = args.str_arg("message").unwrap_or_default();

        if recipient.is_empty() || message.is_empty() {
            return Ok(ToolResult::failure(
                "Both recipient and message are required",
            ));
        }

        match tokio::time::timeout(SEND_TIMEOUT, self.sender.send(recipient, message)).await {
            Ok(Ok(())) => Ok(ToolResult::success(json!({
                "recipient": recipient,
                "message": message,
                "sent_at": Utc::now().to_rfc3339(),
            }))),
            Ok(Err(error)) => {
                warn!("Message to '{}' failed: {}", recipient, error);
                Ok(ToolResult::failure(format!(
                    "Message could not be delivered: {}",
                    error
                )))
            }
            Err(_) => Ok(ToolResult::failure("Message send timed out")),
        }
    }
}
