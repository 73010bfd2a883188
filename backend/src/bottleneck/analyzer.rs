//! Bottleneck Analyzer
//!
//! Classifies processes and channels whose average recorded latency exceeds
//! a threshold fixed at construction. Results are sorted slowest first;
//! entities without samples are left out entirely.
//!
//! # Example
//!
//! ```rust
//! use ipc_debugger_core_rs::{BottleneckAnalyzer, ProcessInfo};
//!
//! let mut analyzer = BottleneckAnalyzer::new(500.0);
//! for delay in [100, 300, 700] {
//!     analyzer.record_delay(1, 10, delay);
//! }
//!
//! let analysis = analyzer.analyze_processes(&[ProcessInfo::new(1, "render")]);
//! assert_eq!(analysis[0].avg_delay, 366.67);
//! assert_eq!(analysis[0].max_delay, 700);
//! ```

use serde::{Deserialize, Serialize};

use super::ledger::LatencyLedger;
use crate::models::{Channel, ChannelId, ProcessId, ProcessInfo};

pub const DEFAULT_THRESHOLD_MS: f64 = 500.0;

/// Generic remediation list attached to every flagged process
pub const REMEDIATIONS: [&str; 4] = [
    "Consider using shared memory instead of pipes/queues",
    "Reduce message size",
    "Implement asynchronous communication",
    "Check for resource contention",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessAnalysis {
    pub process_id: ProcessId,
    pub process_name: String,
    /// Mean delay rounded to 2 decimals
    pub avg_delay: f64,
    pub max_delay: u64,
    pub sample_count: usize,
    pub is_bottleneck: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelAnalysis {
    pub channel_id: ChannelId,
    pub kind: String,
    pub sender_name: Option<String>,
    pub receiver_name: Option<String>,
    pub avg_delay: f64,
    pub sample_count: usize,
    pub is_slow: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub process_name: String,
    pub issue_description: String,
    pub suggestions: Vec<String>,
}

/// Combined result of one bottleneck analysis request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BottleneckReport {
    pub process_analysis: Vec<ProcessAnalysis>,
    pub channel_analysis: Vec<ChannelAnalysis>,
    pub suggestions: Vec<Suggestion>,
}

impl BottleneckReport {
    pub fn bottlenecks(&self) -> impl Iterator<Item = &ProcessAnalysis> {
        self.process_analysis.iter().filter(|p| p.is_bottleneck)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct BottleneckAnalyzer {
    threshold_ms: f64,
    ledger: LatencyLedger,
}

impl Default for BottleneckAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_MS)
    }
}

impl BottleneckAnalyzer {
    pub fn new(threshold_ms: f64) -> Self {
        Self::with_ledger(threshold_ms, LatencyLedger::new())
    }

    /// Resume from a previously accumulated ledger
    pub fn with_ledger(threshold_ms: f64, ledger: LatencyLedger) -> Self {
        Self {
            threshold_ms,
            ledger,
        }
    }

    pub fn threshold_ms(&self) -> f64 {
        self.threshold_ms
    }

    pub fn ledger(&self) -> &LatencyLedger {
        &self.ledger
    }

    pub fn record_delay(&mut self, process_id: ProcessId, channel_id: ChannelId, delay_ms: u64) {
        self.ledger.record(process_id, channel_id, delay_ms);
    }

    /// Per-process latency, slowest first (stable on ties)
    ///
    /// Classification compares the unrounded mean against the threshold.
    pub fn analyze_processes(&self, processes: &[ProcessInfo]) -> Vec<ProcessAnalysis> {
        let mut results: Vec<ProcessAnalysis> = processes
            .iter()
            .filter_map(|process| {
                let stats = self.ledger.process_stats(process.id)?;
                Some(ProcessAnalysis {
                    process_id: process.id,
                    process_name: process.name.clone(),
                    avg_delay: round2(stats.average),
                    max_delay: stats.max,
                    sample_count: stats.count,
                    is_bottleneck: stats.average > self.threshold_ms,
                })
            })
            .collect();

        results.sort_by(|a, b| b.avg_delay.total_cmp(&a.avg_delay));
        results
    }

    /// Per-channel latency, slowest first; endpoint names resolved from `processes`
    pub fn analyze_channels(
        &self,
        channels: &[Channel],
        processes: &[ProcessInfo],
    ) -> Vec<ChannelAnalysis> {
        let name_of = |id: ProcessId| {
            processes
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.name.clone())
        };

        let mut results: Vec<ChannelAnalysis> = channels
            .iter()
            .filter_map(|channel| {
                let stats = self.ledger.channel_stats(channel.id)?;
                Some(ChannelAnalysis {
                    channel_id: channel.id,
                    kind: channel.kind.clone(),
                    sender_name: name_of(channel.sender_id),
                    receiver_name: name_of(channel.receiver_id),
                    avg_delay: round2(stats.average),
                    sample_count: stats.count,
                    is_slow: stats.average > self.threshold_ms,
                })
            })
            .collect();

        results.sort_by(|a, b| b.avg_delay.total_cmp(&a.avg_delay));
        results
    }

    /// One entry per flagged process; entries not flagged are skipped
    pub fn get_suggestions(&self, bottlenecks: &[ProcessAnalysis]) -> Vec<Suggestion> {
        bottlenecks
            .iter()
            .filter(|b| b.is_bottleneck)
            .map(|b| Suggestion {
                process_name: b.process_name.clone(),
                issue_description: format!("High average delay: {:?}ms", b.avg_delay),
                suggestions: REMEDIATIONS.iter().map(|s| s.to_string()).collect(),
            })
            .collect()
    }

    /// Process + channel analysis with suggestions for the flagged processes
    pub fn analyze(&self, processes: &[ProcessInfo], channels: &[Channel]) -> BottleneckReport {
        let process_analysis = self.analyze_processes(processes);
        let channel_analysis = self.analyze_channels(channels, processes);
        let suggestions = self.get_suggestions(&process_analysis);

        BottleneckReport {
            process_analysis,
            channel_analysis,
            suggestions,
        }
    }

    pub fn reset(&mut self) {
        self.ledger.clear();
    }
}
