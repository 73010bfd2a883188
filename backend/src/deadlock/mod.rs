//! Deadlock detection over a resource-allocation graph
//!
//! - `graph`: wait/hold relations and the cycle search
//! - `detector`: session-facing operations and reports

pub mod detector;
pub mod graph;

pub use detector::{CycleDetection, DeadlockDetector, DeadlockReport, DEADLOCK_SUGGESTION};
pub use graph::{Node, ResourceGraph};
