//! IPC Debugger Core - Rust Engine
//!
//! Simulation core for an inter-process communication debugger: latency
//! model for pipes, message queues and shared memory, wait-for cycle
//! detection, and latency-based bottleneck analysis.
//!
//! # Architecture
//!
//! - **transfer**: Per-mechanism latency simulation
//! - **deadlock**: Resource graph and cycle detection
//! - **bottleneck**: Latency ledger and threshold analysis
//! - **session**: Per-simulation coordinator, registry, checkpoints
//! - **models**: Domain types (Process, Channel, Topology, Event)
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (seeded RNG, fixed draw order)
//! 2. The core performs no I/O; persistence and broadcast belong to the caller
//! 3. FFI boundary is minimal and safe

pub mod bottleneck;
pub mod config;
pub mod deadlock;
pub mod models;
pub mod rng;
pub mod session;
pub mod transfer;

// Re-exports for convenience
pub use bottleneck::{
    BottleneckAnalyzer, BottleneckReport, ChannelAnalysis, LatencyLedger, LatencyStats,
    ProcessAnalysis, Suggestion,
};
pub use config::{ConfigError, DelayRange, SimulatorConfig};
pub use deadlock::{CycleDetection, DeadlockDetector, DeadlockReport, Node, ResourceGraph};
pub use models::{
    Channel, ChannelConfig, ChannelId, Event, EventLog, ProcessId, ProcessInfo, ProcessState,
    Severity, Topology,
};
pub use rng::RngManager;
pub use session::{
    MessageDelivery, SessionError, SessionRegistry, SessionSnapshot, SessionStatistics,
    SimulationId, SimulationSession, SimulationStatus,
};
pub use transfer::{IpcKind, TransferError, TransferOutcome, TransferSimulator};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn ipc_debugger_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::session::PySimulationSession>()?;
    Ok(())
}
