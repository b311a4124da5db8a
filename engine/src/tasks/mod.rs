//! Task planning, queueing and lifecycle

pub mod planner;
pub mod queue;
pub mod task;

pub use planner::{Complexity, TaskPlanner};
pub use queue::TaskQueue;
pub use task::{Priority, Task, TaskReport, TaskSpec, TaskStatus, TaskStep};
