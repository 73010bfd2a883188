//! Topology snapshot supplied by the embedding system
//!
//! The authoritative record of processes and channels lives outside the core.
//! Each request hands the current snapshot in; the session reads names and
//! endpoints from it and rebuilds the deadlock graph from its channels.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::channel::{Channel, ChannelId};
use super::process::{ProcessId, ProcessInfo};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub processes: Vec<ProcessInfo>,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

impl Topology {
    pub fn new(processes: Vec<ProcessInfo>, channels: Vec<Channel>) -> Self {
        Self {
            processes,
            channels,
        }
    }

    /// Parse a topology document; channel options are kept verbatim
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn process(&self, id: ProcessId) -> Option<&ProcessInfo> {
        self.processes.iter().find(|p| p.id == id)
    }

    pub fn channel(&self, id: ChannelId) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn process_name(&self, id: ProcessId) -> Option<&str> {
        self.process(id).map(|p| p.name.as_str())
    }

    /// Channels where the process is sender or receiver
    pub fn channels_touching(&self, process_id: ProcessId) -> Vec<&Channel> {
        self.channels
            .iter()
            .filter(|c| c.touches(process_id))
            .collect()
    }

    /// Channel count per kind, keyed by the raw kind string
    pub fn ipc_distribution(&self) -> BTreeMap<String, usize> {
        let mut distribution = BTreeMap::new();
        for channel in &self.channels {
            *distribution.entry(channel.kind.clone()).or_insert(0) += 1;
        }
        distribution
    }
}
