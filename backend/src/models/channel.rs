//! IPC channel model
//!
//! A channel connects one sender process to one receiver process and is the
//! resource node in the deadlock graph. Its kind is kept as the raw string
//! from the topology source so that unrecognized kinds surface as a failed
//! transfer instead of a parse error at load time.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::process::ProcessId;

/// Opaque channel identifier assigned by the embedding system
pub type ChannelId = u64;

pub const DEFAULT_BUFFER_SIZE: usize = 4096;
pub const DEFAULT_MAX_QUEUE_SIZE: u64 = 100;

/// Kind-specific channel options (`buffer_size`, `priority`,
/// `max_queue_size`, `use_mutex`, ...)
///
/// Stored as a free-form map. Typed accessors fall back to the documented
/// default when an option is absent or has the wrong JSON type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelConfig {
    options: BTreeMap<String, Value>,
}

impl ChannelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style option setter
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Pipe buffer capacity in bytes (default 4096)
    pub fn buffer_size(&self) -> usize {
        self.get("buffer_size")
            .and_then(Value::as_u64)
            .map(|v| v as usize)
            .unwrap_or(DEFAULT_BUFFER_SIZE)
    }

    /// Queue priority (default 0); fractional values are allowed
    pub fn priority(&self) -> f64 {
        self.get("priority").and_then(Value::as_f64).unwrap_or(0.0)
    }

    /// Queue capacity (default 100). Informational only.
    pub fn max_queue_size(&self) -> u64 {
        self.get("max_queue_size")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_MAX_QUEUE_SIZE)
    }

    /// Whether shared-memory writes take a mutex (default true)
    pub fn use_mutex(&self) -> bool {
        match self.get("use_mutex") {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
            _ => true,
        }
    }
}

/// An IPC channel between two processes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub kind: String,
    pub sender_id: ProcessId,
    pub receiver_id: ProcessId,
    #[serde(default)]
    pub config: ChannelConfig,
}

impl Channel {
    pub fn new(
        id: ChannelId,
        kind: impl Into<String>,
        sender_id: ProcessId,
        receiver_id: ProcessId,
    ) -> Self {
        Self {
            id,
            kind: kind.into(),
            sender_id,
            receiver_id,
            config: ChannelConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ChannelConfig) -> Self {
        self.config = config;
        self
    }

    /// True if `process_id` is either endpoint
    pub fn touches(&self, process_id: ProcessId) -> bool {
        self.sender_id == process_id || self.receiver_id == process_id
    }
}
