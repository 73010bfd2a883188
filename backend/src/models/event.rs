//! Event logging for simulation auditing and live updates.
//!
//! Every significant state change in a session is captured as an [`Event`].
//! The embedding system drains the log to persist it and to broadcast live
//! updates; the core itself never performs that I/O.
//!
//! Events carry a per-session sequence number instead of a wall-clock
//! timestamp so that a seeded session always produces the same log.
//!
//! # Example
//!
//! ```rust
//! use ipc_debugger_core_rs::models::{Event, EventLog, Severity};
//!
//! let mut log = EventLog::new();
//! log.log(Event::MessageSent {
//!     seq: log.next_seq(),
//!     channel_id: 4,
//!     kind: "pipe".to_string(),
//!     sender_id: 1,
//!     receiver_id: 2,
//!     sender_name: "producer".to_string(),
//!     receiver_name: "consumer".to_string(),
//!     delay_ms: 120,
//! });
//!
//! let event = &log.events()[0];
//! assert_eq!(event.event_type(), "message_sent");
//! assert_eq!(event.severity(), Severity::Info);
//! assert_eq!(event.message(), "producer → consumer (120ms)");
//! ```

use serde::{Deserialize, Serialize};

use super::channel::ChannelId;
use super::process::{ProcessId, ProcessState};
use crate::session::SimulationId;

/// Event severity, as shown in the debugger's log view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Simulation event capturing a state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum Event {
    SimulationCreated {
        seq: usize,
        simulation_id: SimulationId,
        name: String,
    },

    SimulationStarted {
        seq: usize,
        simulation_id: SimulationId,
    },

    SimulationStopped {
        seq: usize,
        simulation_id: SimulationId,
    },

    ProcessCreated {
        seq: usize,
        process_id: ProcessId,
        name: String,
    },

    ProcessStateChanged {
        seq: usize,
        process_id: ProcessId,
        name: String,
        old_state: ProcessState,
        new_state: ProcessState,
    },

    /// Process removed together with every channel it was an endpoint of
    ProcessDeleted {
        seq: usize,
        process_id: ProcessId,
        name: String,
        deleted_channels: usize,
    },

    ChannelCreated {
        seq: usize,
        channel_id: ChannelId,
        kind: String,
        sender_name: String,
        receiver_name: String,
    },

    ChannelDeleted {
        seq: usize,
        channel_id: ChannelId,
    },

    /// Message delivered through a channel
    MessageSent {
        seq: usize,
        channel_id: ChannelId,
        kind: String,
        sender_id: ProcessId,
        receiver_id: ProcessId,
        sender_name: String,
        receiver_name: String,
        delay_ms: u64,
    },

    /// Transfer rejected by the simulator (oversized pipe write, unknown kind)
    TransferFailed {
        seq: usize,
        channel_id: ChannelId,
        sender_id: ProcessId,
        reason: String,
    },

    DeadlockDetected {
        seq: usize,
        process_ids: Vec<ProcessId>,
        process_names: Vec<String>,
    },

    BottleneckDetected {
        seq: usize,
        process_id: ProcessId,
        process_name: String,
        avg_delay: f64,
    },
}

impl Event {
    /// Sequence number within the session's log
    pub fn seq(&self) -> usize {
        match self {
            Event::SimulationCreated { seq, .. } => *seq,
            Event::SimulationStarted { seq, .. } => *seq,
            Event::SimulationStopped { seq, .. } => *seq,
            Event::ProcessCreated { seq, .. } => *seq,
            Event::ProcessStateChanged { seq, .. } => *seq,
            Event::ProcessDeleted { seq, .. } => *seq,
            Event::ChannelCreated { seq, .. } => *seq,
            Event::ChannelDeleted { seq, .. } => *seq,
            Event::MessageSent { seq, .. } => *seq,
            Event::TransferFailed { seq, .. } => *seq,
            Event::DeadlockDetected { seq, .. } => *seq,
            Event::BottleneckDetected { seq, .. } => *seq,
        }
    }

    /// Snake-case event type name (matches the serialized tag)
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::SimulationCreated { .. } => "simulation_created",
            Event::SimulationStarted { .. } => "simulation_started",
            Event::SimulationStopped { .. } => "simulation_stopped",
            Event::ProcessCreated { .. } => "process_created",
            Event::ProcessStateChanged { .. } => "process_state_changed",
            Event::ProcessDeleted { .. } => "process_deleted",
            Event::ChannelCreated { .. } => "channel_created",
            Event::ChannelDeleted { .. } => "channel_deleted",
            Event::MessageSent { .. } => "message_sent",
            Event::TransferFailed { .. } => "transfer_failed",
            Event::DeadlockDetected { .. } => "deadlock_detected",
            Event::BottleneckDetected { .. } => "bottleneck_detected",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Event::DeadlockDetected { .. } => Severity::Error,
            Event::TransferFailed { .. } | Event::BottleneckDetected { .. } => Severity::Warning,
            _ => Severity::Info,
        }
    }

    /// Get process ID if event relates to a specific process
    pub fn process_id(&self) -> Option<ProcessId> {
        match self {
            Event::ProcessCreated { process_id, .. } => Some(*process_id),
            Event::ProcessStateChanged { process_id, .. } => Some(*process_id),
            Event::ProcessDeleted { process_id, .. } => Some(*process_id),
            Event::MessageSent { sender_id, .. } => Some(*sender_id),
            Event::TransferFailed { sender_id, .. } => Some(*sender_id),
            Event::BottleneckDetected { process_id, .. } => Some(*process_id),
            _ => None,
        }
    }

    /// Human-readable log line
    pub fn message(&self) -> String {
        match self {
            Event::SimulationCreated { name, .. } => format!("Simulation \"{}\" created", name),
            Event::SimulationStarted { .. } => "Simulation started".to_string(),
            Event::SimulationStopped { .. } => "Simulation stopped".to_string(),
            Event::ProcessCreated { name, .. } => format!("Process \"{}\" created", name),
            Event::ProcessStateChanged {
                name,
                old_state,
                new_state,
                ..
            } => format!("Process \"{}\" state: {} → {}", name, old_state, new_state),
            Event::ProcessDeleted {
                name,
                deleted_channels,
                ..
            } => match deleted_channels {
                0 => format!("Process \"{}\" deleted", name),
                1 => format!("Process \"{}\" deleted (and 1 associated channel)", name),
                n => format!("Process \"{}\" deleted (and {} associated channels)", name, n),
            },
            Event::ChannelCreated {
                kind,
                sender_name,
                receiver_name,
                ..
            } => format!(
                "{} channel: {} → {}",
                kind.to_uppercase(),
                sender_name,
                receiver_name
            ),
            Event::ChannelDeleted { .. } => "IPC channel deleted".to_string(),
            Event::MessageSent {
                sender_name,
                receiver_name,
                delay_ms,
                ..
            } => format!("{} → {} ({}ms)", sender_name, receiver_name, delay_ms),
            Event::TransferFailed {
                channel_id, reason, ..
            } => format!("Transfer failed on channel {}: {}", channel_id, reason),
            Event::DeadlockDetected { process_names, .. } => {
                format!("Deadlock detected: {}", process_names.join(", "))
            }
            Event::BottleneckDetected {
                process_name,
                avg_delay,
                ..
            } => format!("Bottleneck: {} ({:?}ms avg)", process_name, avg_delay),
        }
    }
}

/// Event log for storing and querying session events.
///
/// Sequence numbers keep increasing across [`EventLog::clear`] so that
/// entries already shipped to the embedding system are never reused.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
    next_seq: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty log whose numbering continues from an earlier one
    pub fn starting_at(next_seq: usize) -> Self {
        Self {
            events: Vec::new(),
            next_seq,
        }
    }

    /// Sequence number the next logged event should carry
    pub fn next_seq(&self) -> usize {
        self.next_seq
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.next_seq = self.next_seq.max(event.seq() + 1);
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_with_severity(&self, severity: Severity) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.severity() == severity)
            .collect()
    }

    /// Get events for a specific process
    pub fn events_for_process(&self, process_id: ProcessId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.process_id() == Some(process_id))
            .collect()
    }

    /// Newest-first view of at most `limit` events
    pub fn recent(&self, limit: usize) -> Vec<&Event> {
        self.events.iter().rev().take(limit).collect()
    }

    /// Export the log as a JSON array
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.events)
    }

    /// Export the log as CSV: seq, type, severity, message, process id
    ///
    /// Events without a process carry an empty process id cell.
    pub fn to_csv(&self) -> Result<String, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["Seq", "Type", "Severity", "Message", "Process ID"])?;

        for event in &self.events {
            writer.write_record([
                event.seq().to_string(),
                event.event_type().to_string(),
                event.severity().as_str().to_string(),
                event.message(),
                event.process_id().map(|id| id.to_string()).unwrap_or_default(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| {
            csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
