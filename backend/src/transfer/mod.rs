//! Transfer Simulator
//!
//! Computes the outcome of sending one message through an IPC channel:
//! success flag, simulated latency, and a diagnostic line.
//!
//! Each mechanism has its own latency model:
//! - **pipe**: bounded buffer; oversized writes are rejected outright
//! - **queue**: never rejects; higher priority discounts the latency
//! - **shmem**: never rejects; an optional mutex adds lock overhead
//!
//! # Determinism
//!
//! The simulator holds no random state of its own. Callers pass the
//! [`RngManager`] explicitly, so the same seed and call sequence always
//! produce the same delays.
//!
//! # Example
//!
//! ```rust
//! use ipc_debugger_core_rs::{ChannelConfig, RngManager, SimulatorConfig, TransferSimulator};
//!
//! let simulator = TransferSimulator::from_config(&SimulatorConfig::default());
//! let mut rng = RngManager::new(42);
//!
//! let config = ChannelConfig::new().with("buffer_size", 4);
//! let outcome = simulator.transfer("pipe", "hello", &config, &mut rng);
//! assert!(!outcome.success);
//! assert_eq!(outcome.delay_ms, 0);
//! assert_eq!(outcome.info, "Message size (5) exceeds buffer size (4)");
//! ```

mod pipe;
mod queue;
mod shmem;

pub use queue::{discounted_delay, priority_factor};
pub use shmem::MUTEX_OVERHEAD_RANGE;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{DelayRange, SimulatorConfig};
use crate::models::ChannelConfig;
use crate::rng::RngManager;

/// Reasons a transfer can be rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Message size ({size}) exceeds buffer size ({buffer_size})")]
    MessageTooLarge { size: usize, buffer_size: usize },

    #[error("Unknown IPC type: {0}")]
    UnknownIpcKind(String),
}

/// Supported IPC mechanisms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpcKind {
    Pipe,
    Queue,
    Shmem,
}

impl IpcKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IpcKind::Pipe => "pipe",
            IpcKind::Queue => "queue",
            IpcKind::Shmem => "shmem",
        }
    }
}

impl fmt::Display for IpcKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IpcKind {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pipe" => Ok(IpcKind::Pipe),
            "queue" => Ok(IpcKind::Queue),
            "shmem" => Ok(IpcKind::Shmem),
            other => Err(TransferError::UnknownIpcKind(other.to_string())),
        }
    }
}

/// Result of simulating one message send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub success: bool,
    pub delay_ms: u64,
    pub info: String,
}

impl TransferOutcome {
    pub fn delivered(delay_ms: u64, info: impl Into<String>) -> Self {
        Self {
            success: true,
            delay_ms,
            info: info.into(),
        }
    }

    /// Failed outcome: zero delay, error text as diagnostic
    pub fn rejected(error: &TransferError) -> Self {
        Self {
            success: false,
            delay_ms: 0,
            info: error.to_string(),
        }
    }
}

/// Latency model for the three IPC mechanisms
#[derive(Debug, Clone, PartialEq)]
pub struct TransferSimulator {
    pipe_delay_range: DelayRange,
    queue_delay_range: DelayRange,
    shmem_delay_range: DelayRange,
}

impl TransferSimulator {
    /// Create a simulator with explicit base-latency ranges
    ///
    /// # Panics
    /// Panics if any range has `min > max`. Use [`SimulatorConfig::validate`]
    /// to check untrusted input first.
    pub fn new(pipe: DelayRange, queue: DelayRange, shmem: DelayRange) -> Self {
        for range in [pipe, queue, shmem] {
            assert!(
                range.min_ms() <= range.max_ms(),
                "delay range min must not exceed max"
            );
        }

        Self {
            pipe_delay_range: pipe,
            queue_delay_range: queue,
            shmem_delay_range: shmem,
        }
    }

    pub fn from_config(config: &SimulatorConfig) -> Self {
        Self::new(
            config.pipe_delay_range,
            config.queue_delay_range,
            config.shmem_delay_range,
        )
    }

    pub fn delay_range(&self, kind: IpcKind) -> DelayRange {
        match kind {
            IpcKind::Pipe => self.pipe_delay_range,
            IpcKind::Queue => self.queue_delay_range,
            IpcKind::Shmem => self.shmem_delay_range,
        }
    }

    /// Simulate a transfer, returning the typed rejection reason on failure
    ///
    /// Rejections consume no randomness.
    pub fn try_transfer(
        &self,
        kind: &str,
        message: &str,
        config: &ChannelConfig,
        rng: &mut RngManager,
    ) -> Result<TransferOutcome, TransferError> {
        let kind: IpcKind = kind.parse()?;
        let range = self.delay_range(kind);

        match kind {
            IpcKind::Pipe => pipe::simulate(message, config, range, rng),
            IpcKind::Queue => Ok(queue::simulate(config, range, rng)),
            IpcKind::Shmem => Ok(shmem::simulate(config, range, rng)),
        }
    }

    /// Simulate a transfer; rejections become failed outcomes
    pub fn transfer(
        &self,
        kind: &str,
        message: &str,
        config: &ChannelConfig,
        rng: &mut RngManager,
    ) -> TransferOutcome {
        match self.try_transfer(kind, message, config, rng) {
            Ok(outcome) => {
                tracing::debug!(kind, delay_ms = outcome.delay_ms, "transfer simulated");
                outcome
            }
            Err(error) => {
                tracing::debug!(kind, %error, "transfer rejected");
                TransferOutcome::rejected(&error)
            }
        }
    }
}

impl Default for TransferSimulator {
    fn default() -> Self {
        Self::from_config(&SimulatorConfig::default())
    }
}
