//! Resource-Allocation Graph
//!
//! Bipartite graph of process nodes and resource (channel) nodes:
//! - **wait** edge `P → R`: process P is blocked waiting for resource R
//! - **hold** edge `R → P`: resource R is currently held by process P
//!
//! A process waits for at most one resource at a time; a resource may be
//! held by several processes at once (shared access). The graph does not
//! check ids against any topology, it is purely relational.
//!
//! # Determinism
//!
//! All relations live in `BTreeMap`/`BTreeSet`, and the search visits start
//! nodes and neighbors in sorted order (processes before resources, then by
//! id). The first cycle found is therefore stable for a given edge set.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{ChannelId, ProcessId};

/// Vertex of the resource-allocation graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "node", content = "id", rename_all = "snake_case")]
pub enum Node {
    Process(ProcessId),
    Resource(ChannelId),
}

impl Node {
    pub fn as_process(&self) -> Option<ProcessId> {
        match self {
            Node::Process(id) => Some(*id),
            Node::Resource(_) => None,
        }
    }
}

/// Wait/hold relations for one simulation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceGraph {
    /// process → the single resource it is waiting for
    waiting_for: BTreeMap<ProcessId, ChannelId>,

    /// resource → processes holding it (no duplicates, never empty)
    held_by: BTreeMap<ChannelId, BTreeSet<ProcessId>>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the process's outstanding wait edge, replacing any previous one
    pub fn add_wait(&mut self, process_id: ProcessId, resource_id: ChannelId) {
        self.waiting_for.insert(process_id, resource_id);
    }

    /// Add the process to the resource's holder set (idempotent)
    pub fn add_hold(&mut self, process_id: ProcessId, resource_id: ChannelId) {
        self.held_by
            .entry(resource_id)
            .or_default()
            .insert(process_id);
    }

    /// Drop the hold edge and the process's wait edge; missing edges are ignored
    pub fn release(&mut self, process_id: ProcessId, resource_id: ChannelId) {
        if let Some(holders) = self.held_by.get_mut(&resource_id) {
            holders.remove(&process_id);
            if holders.is_empty() {
                self.held_by.remove(&resource_id);
            }
        }
        self.waiting_for.remove(&process_id);
    }

    pub fn clear(&mut self) {
        self.waiting_for.clear();
        self.held_by.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.waiting_for.is_empty() && self.held_by.is_empty()
    }

    /// Resource the process is waiting for, if any
    pub fn waiting_for(&self, process_id: ProcessId) -> Option<ChannelId> {
        self.waiting_for.get(&process_id).copied()
    }

    /// Processes holding the resource (sorted)
    pub fn holders(&self, resource_id: ChannelId) -> Vec<ProcessId> {
        self.held_by
            .get(&resource_id)
            .map(|holders| holders.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of wait plus hold edges
    pub fn edge_count(&self) -> usize {
        self.waiting_for.len() + self.held_by.values().map(BTreeSet::len).sum::<usize>()
    }

    /// Directed adjacency snapshot: `P → R` for waits, `R → P` for holds
    ///
    /// Only nodes with at least one outgoing edge appear as keys.
    pub fn adjacency(&self) -> BTreeMap<Node, Vec<Node>> {
        let mut adj: BTreeMap<Node, Vec<Node>> = BTreeMap::new();

        for (&process_id, &resource_id) in &self.waiting_for {
            adj.entry(Node::Process(process_id))
                .or_default()
                .push(Node::Resource(resource_id));
        }

        for (&resource_id, holders) in &self.held_by {
            adj.entry(Node::Resource(resource_id))
                .or_default()
                .extend(holders.iter().map(|&p| Node::Process(p)));
        }

        adj
    }

    /// Find the first cycle reachable by depth-first search
    ///
    /// Returns the cycle as the path slice from the node first revisited on
    /// the current DFS path through the last node explored, e.g.
    /// `[P1, R1, P2, R2]` for `P1 → R1 → P2 → R2 → P1`. Search stops at the
    /// first cycle; other cycles are not enumerated.
    ///
    /// The search keeps its own explicit stack, so depth is bounded by the
    /// node count rather than the call stack.
    pub fn find_cycle(&self) -> Option<Vec<Node>> {
        let adjacency = self.adjacency();
        let mut visited: BTreeSet<Node> = BTreeSet::new();

        for &start in adjacency.keys() {
            if visited.contains(&start) {
                continue;
            }
            if let Some(cycle) = search_from(start, &adjacency, &mut visited) {
                return Some(cycle);
            }
        }

        None
    }
}

/// Iterative DFS from `start`, sharing `visited` across start nodes
fn search_from(
    start: Node,
    adjacency: &BTreeMap<Node, Vec<Node>>,
    visited: &mut BTreeSet<Node>,
) -> Option<Vec<Node>> {
    // Current DFS path, with each node's position for O(log n) stack lookup
    let mut path: Vec<Node> = vec![start];
    let mut on_path: BTreeMap<Node, usize> = BTreeMap::from([(start, 0)]);
    // Next neighbor index to explore for each path entry
    let mut cursors: Vec<usize> = vec![0];
    visited.insert(start);

    while let Some(&node) = path.last() {
        let depth = path.len() - 1;
        let neighbors = adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[]);

        match neighbors.get(cursors[depth]) {
            Some(&next) => {
                cursors[depth] += 1;

                if let Some(&position) = on_path.get(&next) {
                    return Some(path[position..].to_vec());
                }

                if visited.insert(next) {
                    on_path.insert(next, path.len());
                    path.push(next);
                    cursors.push(0);
                }
            }
            None => {
                on_path.remove(&node);
                path.pop();
                cursors.pop();
            }
        }
    }

    None
}
