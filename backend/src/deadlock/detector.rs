//! Deadlock Detector
//!
//! Wraps a [`ResourceGraph`] with the operations the session drives:
//! edge edits, rebuild from channel topology, cycle detection, and a
//! name-resolved report.
//!
//! # Channel model
//!
//! When rebuilt from a topology, every channel becomes a resource: the
//! sender waits on it (blocked until the receiver consumes) and the receiver
//! holds it. Two processes sending to each other therefore deadlock.
//!
//! # Example
//!
//! ```rust
//! use ipc_debugger_core_rs::{DeadlockDetector, ProcessInfo};
//!
//! let mut detector = DeadlockDetector::new();
//! detector.add_wait(1, 100);
//! detector.add_hold(2, 100);
//! detector.add_wait(2, 200);
//! detector.add_hold(1, 200);
//!
//! let processes = vec![ProcessInfo::new(1, "A"), ProcessInfo::new(2, "B")];
//! let report = detector.analyze_deadlock(&processes);
//! assert!(report.found);
//! assert_eq!(report.process_ids, vec![1, 2]);
//! assert_eq!(report.process_names, vec!["A", "B"]);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::graph::{Node, ResourceGraph};
use crate::models::{Channel, ChannelId, ProcessId, ProcessInfo};

/// Remediation attached to every positive report
pub const DEADLOCK_SUGGESTION: &str =
    "Break the circular wait by releasing resources or using timeouts";

/// Raw cycle search result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleDetection {
    pub found: bool,
    /// Process nodes on the discovered cycle
    pub process_ids: BTreeSet<ProcessId>,
    /// The cycle itself, alternating process and resource nodes
    pub path: Vec<Node>,
}

/// Deadlock analysis for the embedding system to persist/broadcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadlockReport {
    pub found: bool,
    /// Deadlocked process ids, ascending
    pub process_ids: Vec<ProcessId>,
    /// Names of deadlocked processes, in the caller's process-list order
    pub process_names: Vec<String>,
    pub cycle: Vec<Node>,
    pub suggestion: Option<String>,
}

impl DeadlockReport {
    pub fn none() -> Self {
        Self {
            found: false,
            process_ids: Vec::new(),
            process_names: Vec::new(),
            cycle: Vec::new(),
            suggestion: None,
        }
    }
}

/// Cycle-based deadlock detector for one simulation
#[derive(Debug, Clone, Default)]
pub struct DeadlockDetector {
    graph: ResourceGraph,
}

impl DeadlockDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    pub fn add_wait(&mut self, process_id: ProcessId, resource_id: ChannelId) {
        tracing::trace!(process_id, resource_id, "wait edge");
        self.graph.add_wait(process_id, resource_id);
    }

    pub fn add_hold(&mut self, process_id: ProcessId, resource_id: ChannelId) {
        tracing::trace!(process_id, resource_id, "hold edge");
        self.graph.add_hold(process_id, resource_id);
    }

    /// Remove the hold and the process's wait edge (no-op if absent)
    pub fn release_resource(&mut self, process_id: ProcessId, resource_id: ChannelId) {
        self.graph.release(process_id, resource_id);
    }

    pub fn reset(&mut self) {
        self.graph.clear();
    }

    /// Replace the graph with one derived from the current channels
    ///
    /// Each channel: sender waits on it, receiver holds it. Since a process
    /// waits on one resource at a time, a sender with several outgoing
    /// channels keeps the wait edge of the last one listed.
    pub fn rebuild_from_channels(&mut self, channels: &[Channel]) {
        self.reset();
        for channel in channels {
            self.add_wait(channel.sender_id, channel.id);
            self.add_hold(channel.receiver_id, channel.id);
        }
        tracing::debug!(
            channels = channels.len(),
            edges = self.graph.edge_count(),
            "resource graph rebuilt"
        );
    }

    /// Search for a cycle; the first one found wins
    pub fn detect_cycle(&self) -> CycleDetection {
        match self.graph.find_cycle() {
            Some(path) => CycleDetection {
                found: true,
                process_ids: path.iter().filter_map(Node::as_process).collect(),
                path,
            },
            None => CycleDetection::default(),
        }
    }

    /// Run detection and resolve process names from the caller's list
    ///
    /// Ids missing from `processes` still appear in `process_ids` but
    /// contribute no name.
    pub fn analyze_deadlock(&self, processes: &[ProcessInfo]) -> DeadlockReport {
        let detection = self.detect_cycle();
        if !detection.found {
            return DeadlockReport::none();
        }

        let process_names = processes
            .iter()
            .filter(|p| detection.process_ids.contains(&p.id))
            .map(|p| p.name.clone())
            .collect();

        DeadlockReport {
            found: true,
            process_ids: detection.process_ids.into_iter().collect(),
            process_names,
            cycle: detection.path,
            suggestion: Some(DEADLOCK_SUGGESTION.to_string()),
        }
    }
}
