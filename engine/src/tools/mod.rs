//! Tool registry and built-in tools
//!
//! The registry is a name-keyed table of `sdk::Tool` trait objects. The
//! built-ins cover arithmetic, note keeping, a stubbed web search and
//! outbound messaging over an injected transport; front-ends register
//! their own tools alongside them.

pub mod calculator;
pub mod messenger;
pub mod notes;
pub mod registry;
pub mod web_search;

pub use calculator::CalculatorTool;
pub use messenger::{MessageSender, MessengerTool};
pub use notes::NoteTool;
pub use registry::ToolRegistry;
pub use web_search::WebSearchTool;
