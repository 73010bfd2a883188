//! Bottleneck analysis from accumulated latency samples
//!
//! - `ledger`: append-only per-process/per-channel samples
//! - `analyzer`: threshold classification and remediation hints

pub mod analyzer;
pub mod ledger;

pub use analyzer::{
    BottleneckAnalyzer, BottleneckReport, ChannelAnalysis, ProcessAnalysis, Suggestion,
    DEFAULT_THRESHOLD_MS, REMEDIATIONS,
};
pub use ledger::{LatencyLedger, LatencyStats};
