//! Process model
//!
//! Processes are owned by the embedding system. The core only references
//! them by id and reads their display name when building reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque process identifier assigned by the embedding system
pub type ProcessId = u64;

/// Scheduling state of a simulated process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    #[default]
    Ready,
    Running,
    Waiting,
    Blocked,
    Terminated,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessState::Ready => "ready",
            ProcessState::Running => "running",
            ProcessState::Waiting => "waiting",
            ProcessState::Blocked => "blocked",
            ProcessState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// A simulated process as seen by the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub id: ProcessId,
    pub name: String,
    #[serde(default)]
    pub state: ProcessState,
    #[serde(default)]
    pub priority: i64,
}

impl ProcessInfo {
    /// Create a process in the `Ready` state with priority 0
    pub fn new(id: ProcessId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            state: ProcessState::Ready,
            priority: 0,
        }
    }
}
