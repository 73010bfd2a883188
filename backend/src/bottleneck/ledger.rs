//! Latency ledger
//!
//! Append-only record of delay samples per process and per channel,
//! accumulated over a simulation's lifetime until explicitly cleared.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{ChannelId, ProcessId};

/// Aggregate over one key's samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyStats {
    pub average: f64,
    pub max: u64,
    pub count: usize,
}

impl LatencyStats {
    /// `None` for an empty sample list
    pub fn from_samples(samples: &[u64]) -> Option<Self> {
        let max = *samples.iter().max()?;
        let total: u128 = samples.iter().map(|&s| s as u128).sum();

        Some(Self {
            average: total as f64 / samples.len() as f64,
            max,
            count: samples.len(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyLedger {
    process_delays: BTreeMap<ProcessId, Vec<u64>>,
    channel_delays: BTreeMap<ChannelId, Vec<u64>>,
}

impl LatencyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sample to both the process's and the channel's list
    pub fn record(&mut self, process_id: ProcessId, channel_id: ChannelId, delay_ms: u64) {
        self.process_delays
            .entry(process_id)
            .or_default()
            .push(delay_ms);
        self.channel_delays
            .entry(channel_id)
            .or_default()
            .push(delay_ms);
    }

    /// Samples in recording order (empty if none)
    pub fn process_samples(&self, process_id: ProcessId) -> &[u64] {
        self.process_delays
            .get(&process_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn channel_samples(&self, channel_id: ChannelId) -> &[u64] {
        self.channel_delays
            .get(&channel_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn process_stats(&self, process_id: ProcessId) -> Option<LatencyStats> {
        LatencyStats::from_samples(self.process_samples(process_id))
    }

    pub fn channel_stats(&self, channel_id: ChannelId) -> Option<LatencyStats> {
        LatencyStats::from_samples(self.channel_samples(channel_id))
    }

    pub fn is_empty(&self) -> bool {
        self.process_delays.is_empty() && self.channel_delays.is_empty()
    }

    pub fn clear(&mut self) {
        self.process_delays.clear();
        self.channel_delays.clear();
    }
}
