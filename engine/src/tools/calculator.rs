//! Arithmetic over two operands

use async_trait::async_trait;
use sdk::{EngineError, Tool, ToolArgs, ToolResult};
use serde_json::{json, Value};

/// Basic arithmetic: add, subtract, multiply, divide
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Performs basic arithmetic operations"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "enum": ["add", "subtract", "multiply", "divide"],
                    "description": "The arithmetic operation to perform"
                },
                "a": {
                    "type": "number",
                    "description": "The first number"
                },
                "b": {
                    "type": "number",
                    "description": "The second number"
                }
            },
            "required": ["operation", "a", "b"]
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolResult, EngineError> {
        let (a, b) = match (args.f64_arg("a"), args.f64_arg("b")) {
            (Some(a), Some(b)) => (a, b),
            _ => return Ok(ToolResult::failure("Both a and b must be numbers")),
        };

        let result = match args.str_arg("operation").unwrap_or_default() {
            "add" => a + b,
            "subtract" => a - b,
            "multiply" => a * b,
            "divide" => {
                if b == 0.0 {
                    return Ok(ToolResult::failure("Cannot divide by zero"));
                }
                a / b
            }
            operation => {
                return Ok(ToolResult::failure(format!(
                    "Unknown operation: {}",
                    operation
                )))
            }
        };

        Ok(ToolResult::success(json!(result)))
    }
}
