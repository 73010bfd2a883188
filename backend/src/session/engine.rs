//! Simulation Session
//!
//! One session per running simulation. It owns the three engines (transfer
//! simulator, deadlock detector, bottleneck analyzer) plus the seeded RNG and
//! the event log, and turns requests from the embedding system into
//! structured reports.
//!
//! ```text
//! send_message     → TransferSimulator → BottleneckAnalyzer (sender + receiver)
//! detect_deadlock  → rebuild ResourceGraph from channels → DeadlockDetector
//! analyze_bottlenecks → BottleneckAnalyzer over the current topology
//! ```
//!
//! The session never performs I/O: the topology is passed in with every
//! request, and persistence/broadcast of the returned reports and of the
//! event log is the caller's job.
//!
//! # Concurrency
//!
//! All operations are synchronous and bounded. Mutating calls take
//! `&mut self`; an embedding system serving several threads must put each
//! session behind its own lock (or actor).
//!
//! # Example
//!
//! ```rust
//! use ipc_debugger_core_rs::{Channel, ProcessInfo, SimulationSession, SimulatorConfig, Topology};
//!
//! let topology = Topology::new(
//!     vec![ProcessInfo::new(1, "producer"), ProcessInfo::new(2, "consumer")],
//!     vec![Channel::new(10, "shmem", 1, 2)],
//! );
//!
//! let mut session = SimulationSession::new(1, "demo", SimulatorConfig::default()).unwrap();
//! session.start();
//!
//! let delivery = session.send_message(&topology, 10, "ping").unwrap();
//! assert!(delivery.outcome.success);
//!
//! let report = session.detect_deadlock(&topology);
//! assert!(!report.found);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::bottleneck::{BottleneckAnalyzer, BottleneckReport, LatencyLedger};
use crate::config::{ConfigError, SimulatorConfig};
use crate::deadlock::{DeadlockDetector, DeadlockReport};
use crate::models::{
    Channel, ChannelId, Event, EventLog, ProcessId, ProcessInfo, ProcessState, Topology,
};
use crate::rng::RngManager;
use crate::transfer::{TransferOutcome, TransferSimulator};

/// Opaque simulation identifier assigned by the embedding system
pub type SimulationId = u64;

/// Session error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("Channel not found: {0}")]
    ChannelNotFound(ChannelId),

    #[error("Process not found: {0}")]
    ProcessNotFound(ProcessId),

    #[error("Message size ({size}) exceeds maximum message size ({max})")]
    MessageTooLarge { size: usize, max: usize },

    #[error("Process limit reached: at most {max} processes per simulation")]
    ProcessLimitReached { max: usize },

    #[error("Checkpoint error: {0}")]
    Checkpoint(String),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    #[default]
    Created,
    Running,
    Stopped,
}

/// Running totals that outlive individual requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCounters {
    pub messages_sent: u64,
    pub failed_transfers: u64,
    pub total_latency_ms: u64,
    pub deadlocks_detected: u64,
}

/// Result of a send request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDelivery {
    /// Fresh id for the message record (uuid v4)
    pub message_id: String,
    pub channel_id: ChannelId,
    pub sender_id: ProcessId,
    pub receiver_id: ProcessId,
    pub size_bytes: usize,
    pub outcome: TransferOutcome,
    /// States the caller should apply on success (sender running, receiver waiting)
    pub sender_state: Option<ProcessState>,
    pub receiver_state: Option<ProcessState>,
}

/// Aggregate view for the statistics panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatistics {
    pub total_processes: usize,
    pub total_channels: usize,
    pub total_messages: u64,
    pub failed_transfers: u64,
    /// Mean delay of delivered messages, rounded to 2 decimals
    pub avg_latency_ms: f64,
    pub deadlock_count: u64,
    pub ipc_distribution: BTreeMap<String, usize>,
}

/// Engine triple + RNG + event log for one simulation
#[derive(Debug, Clone)]
pub struct SimulationSession {
    id: SimulationId,
    name: String,
    config: SimulatorConfig,
    status: SimulationStatus,
    rng: RngManager,
    simulator: TransferSimulator,
    detector: DeadlockDetector,
    analyzer: BottleneckAnalyzer,
    event_log: EventLog,
    counters: SessionCounters,
}

impl SimulationSession {
    /// Create a session from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` if the configuration is invalid.
    pub fn new(
        id: SimulationId,
        name: impl Into<String>,
        config: SimulatorConfig,
    ) -> Result<Self, SessionError> {
        let mut session = Self::assemble(
            id,
            name.into(),
            config,
            SimulationStatus::Created,
            None,
            LatencyLedger::new(),
            SessionCounters::default(),
            EventLog::new(),
        )?;

        let name = session.name.clone();
        session.emit(|seq| Event::SimulationCreated {
            seq,
            simulation_id: id,
            name,
        });
        tracing::info!(simulation_id = id, name = %session.name, "simulation created");

        Ok(session)
    }

    /// Build a session from its parts (fresh or restored)
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        id: SimulationId,
        name: String,
        config: SimulatorConfig,
        status: SimulationStatus,
        rng_state: Option<u64>,
        ledger: LatencyLedger,
        counters: SessionCounters,
        event_log: EventLog,
    ) -> Result<Self, SessionError> {
        config.validate()?;

        Ok(Self {
            id,
            name,
            status,
            rng: RngManager::new(rng_state.unwrap_or(config.rng_seed)),
            simulator: TransferSimulator::from_config(&config),
            detector: DeadlockDetector::new(),
            analyzer: BottleneckAnalyzer::with_ledger(config.bottleneck_threshold_ms, ledger),
            event_log,
            counters,
            config,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> SimulationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn rng_state(&self) -> u64 {
        self.rng.get_state()
    }

    pub fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Mutable log access so the caller can drain persisted events
    pub fn event_log_mut(&mut self) -> &mut EventLog {
        &mut self.event_log
    }

    pub fn detector(&self) -> &DeadlockDetector {
        &self.detector
    }

    pub fn analyzer(&self) -> &BottleneckAnalyzer {
        &self.analyzer
    }

    fn emit(&mut self, make: impl FnOnce(usize) -> Event) {
        let event = make(self.event_log.next_seq());
        self.event_log.log(event);
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    pub fn start(&mut self) {
        self.status = SimulationStatus::Running;
        let simulation_id = self.id;
        self.emit(|seq| Event::SimulationStarted { seq, simulation_id });
        tracing::info!(simulation_id, "simulation started");
    }

    pub fn stop(&mut self) {
        self.status = SimulationStatus::Stopped;
        let simulation_id = self.id;
        self.emit(|seq| Event::SimulationStopped { seq, simulation_id });
        tracing::info!(simulation_id, "simulation stopped");
    }

    /// Clear accumulated latency, graph and counters; the event log is kept
    pub fn reset(&mut self) {
        self.detector.reset();
        self.analyzer.reset();
        self.counters = SessionCounters::default();
        tracing::info!(simulation_id = self.id, "simulation state reset");
    }

    // ========================================================================
    // Topology events
    // ========================================================================

    /// Record a new process; `topology` is the record before the insert
    ///
    /// # Errors
    ///
    /// `ProcessLimitReached` if the topology already holds `max_processes`.
    pub fn register_process(
        &mut self,
        process: &ProcessInfo,
        topology: &Topology,
    ) -> Result<(), SessionError> {
        let max = self.config.max_processes;
        let already_known = topology.process(process.id).is_some();
        if !already_known && topology.processes.len() >= max {
            return Err(SessionError::ProcessLimitReached { max });
        }

        let (process_id, name) = (process.id, process.name.clone());
        self.emit(|seq| Event::ProcessCreated {
            seq,
            process_id,
            name,
        });
        Ok(())
    }

    pub fn change_process_state(&mut self, process: &ProcessInfo, new_state: ProcessState) {
        let (process_id, name, old_state) = (process.id, process.name.clone(), process.state);
        self.emit(|seq| Event::ProcessStateChanged {
            seq,
            process_id,
            name,
            old_state,
            new_state,
        });
    }

    /// Record a process removal
    ///
    /// Returns the ids of the channels touching the process, which the caller
    /// must delete along with it. Their graph edges are released here.
    pub fn remove_process(
        &mut self,
        process_id: ProcessId,
        topology: &Topology,
    ) -> Result<Vec<ChannelId>, SessionError> {
        let process = topology
            .process(process_id)
            .ok_or(SessionError::ProcessNotFound(process_id))?;
        let name = process.name.clone();

        let channel_ids: Vec<ChannelId> = topology
            .channels_touching(process_id)
            .iter()
            .map(|c| c.id)
            .collect();
        for &channel_id in &channel_ids {
            self.detector.release_resource(process_id, channel_id);
        }

        let deleted_channels = channel_ids.len();
        self.emit(|seq| Event::ProcessDeleted {
            seq,
            process_id,
            name,
            deleted_channels,
        });
        Ok(channel_ids)
    }

    /// Record a new channel; both endpoints must exist in `topology`
    pub fn register_channel(
        &mut self,
        channel: &Channel,
        topology: &Topology,
    ) -> Result<(), SessionError> {
        let sender_name = topology
            .process_name(channel.sender_id)
            .ok_or(SessionError::ProcessNotFound(channel.sender_id))?
            .to_string();
        let receiver_name = topology
            .process_name(channel.receiver_id)
            .ok_or(SessionError::ProcessNotFound(channel.receiver_id))?
            .to_string();

        let (channel_id, kind) = (channel.id, channel.kind.clone());
        self.emit(|seq| Event::ChannelCreated {
            seq,
            channel_id,
            kind,
            sender_name,
            receiver_name,
        });
        Ok(())
    }

    pub fn remove_channel(&mut self, channel_id: ChannelId) {
        self.emit(|seq| Event::ChannelDeleted { seq, channel_id });
    }

    // ========================================================================
    // Core operations
    // ========================================================================

    /// Simulate sending `content` over a channel
    ///
    /// A rejected transfer is not an `Err`: it comes back as a delivery with
    /// a failed outcome and records no latency.
    ///
    /// # Errors
    ///
    /// - `ChannelNotFound` / `ProcessNotFound` for dangling references
    /// - `MessageTooLarge` if `content` exceeds `max_message_size`
    pub fn send_message(
        &mut self,
        topology: &Topology,
        channel_id: ChannelId,
        content: &str,
    ) -> Result<MessageDelivery, SessionError> {
        let channel = topology
            .channel(channel_id)
            .ok_or(SessionError::ChannelNotFound(channel_id))?;
        let sender = topology
            .process(channel.sender_id)
            .ok_or(SessionError::ProcessNotFound(channel.sender_id))?;
        let receiver = topology
            .process(channel.receiver_id)
            .ok_or(SessionError::ProcessNotFound(channel.receiver_id))?;

        let size_bytes = content.len();
        let max = self.config.max_message_size;
        if size_bytes > max {
            return Err(SessionError::MessageTooLarge {
                size: size_bytes,
                max,
            });
        }

        let outcome = self
            .simulator
            .transfer(&channel.kind, content, &channel.config, &mut self.rng);

        let mut delivery = MessageDelivery {
            message_id: uuid::Uuid::new_v4().to_string(),
            channel_id,
            sender_id: sender.id,
            receiver_id: receiver.id,
            size_bytes,
            outcome,
            sender_state: None,
            receiver_state: None,
        };

        if !delivery.outcome.success {
            self.counters.failed_transfers += 1;
            let (sender_id, reason) = (sender.id, delivery.outcome.info.clone());
            self.emit(|seq| Event::TransferFailed {
                seq,
                channel_id,
                sender_id,
                reason,
            });
            tracing::debug!(channel_id, reason = %delivery.outcome.info, "transfer failed");
            return Ok(delivery);
        }

        let delay_ms = delivery.outcome.delay_ms;
        self.analyzer.record_delay(sender.id, channel_id, delay_ms);
        self.analyzer.record_delay(receiver.id, channel_id, delay_ms);
        self.counters.messages_sent += 1;
        self.counters.total_latency_ms = self.counters.total_latency_ms.saturating_add(delay_ms);

        delivery.sender_state = Some(ProcessState::Running);
        delivery.receiver_state = Some(ProcessState::Waiting);

        let event = Event::MessageSent {
            seq: self.event_log.next_seq(),
            channel_id,
            kind: channel.kind.clone(),
            sender_id: sender.id,
            receiver_id: receiver.id,
            sender_name: sender.name.clone(),
            receiver_name: receiver.name.clone(),
            delay_ms,
        };
        self.event_log.log(event);

        Ok(delivery)
    }

    /// Rebuild the resource graph from current channels and look for a cycle
    pub fn detect_deadlock(&mut self, topology: &Topology) -> DeadlockReport {
        self.detector.rebuild_from_channels(&topology.channels);
        let report = self.detector.analyze_deadlock(&topology.processes);

        if report.found {
            self.counters.deadlocks_detected += 1;
            let (process_ids, process_names) =
                (report.process_ids.clone(), report.process_names.clone());
            tracing::warn!(
                simulation_id = self.id,
                processes = ?report.process_names,
                "deadlock detected"
            );
            self.emit(|seq| Event::DeadlockDetected {
                seq,
                process_ids,
                process_names,
            });
        }

        report
    }

    /// Analyze accumulated latency; logs one event per flagged process
    pub fn analyze_bottlenecks(&mut self, topology: &Topology) -> BottleneckReport {
        let report = self
            .analyzer
            .analyze(&topology.processes, &topology.channels);

        for bottleneck in report.bottlenecks() {
            let (process_id, process_name, avg_delay) = (
                bottleneck.process_id,
                bottleneck.process_name.clone(),
                bottleneck.avg_delay,
            );
            tracing::warn!(process_id, avg_delay, "bottleneck detected");
            self.emit(|seq| Event::BottleneckDetected {
                seq,
                process_id,
                process_name,
                avg_delay,
            });
        }

        report
    }

    pub fn statistics(&self, topology: &Topology) -> SessionStatistics {
        let avg_latency_ms = if self.counters.messages_sent == 0 {
            0.0
        } else {
            let mean = self.counters.total_latency_ms as f64 / self.counters.messages_sent as f64;
            (mean * 100.0).round() / 100.0
        };

        SessionStatistics {
            total_processes: topology.processes.len(),
            total_channels: topology.channels.len(),
            total_messages: self.counters.messages_sent,
            failed_transfers: self.counters.failed_transfers,
            avg_latency_ms,
            deadlock_count: self.counters.deadlocks_detected,
            ipc_distribution: topology.ipc_distribution(),
        }
    }
}
