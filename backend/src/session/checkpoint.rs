//! Checkpoint - Save/Load Session State
//!
//! Serializes the mutable part of a session (RNG position, latency samples,
//! counters, status) so a simulation can be paused and resumed.
//!
//! # Invariants
//!
//! - **Determinism**: a restored session draws the same delays the original
//!   would have drawn next
//! - **Config Matching**: a snapshot only loads under the config it was taken
//!   with (SHA256 of canonical JSON)
//!
//! The deadlock graph is not saved: it is rebuilt from the topology on every
//! detection request. Already-emitted events are not saved either; the
//! restored log continues numbering at `event_seq`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::engine::{SessionCounters, SessionError, SimulationId, SimulationSession, SimulationStatus};
use crate::bottleneck::LatencyLedger;
use crate::config::SimulatorConfig;
use crate::models::EventLog;

/// Persisted session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub simulation_id: SimulationId,
    pub name: String,
    pub status: SimulationStatus,

    /// RNG state at snapshot time (not the original seed)
    pub rng_state: u64,

    pub ledger: LatencyLedger,
    pub counters: SessionCounters,

    /// Sequence number the next event will carry
    pub event_seq: usize,

    /// SHA256 hash of the session config
    pub config_hash: String,
}

/// Compute deterministic SHA256 hash of a config
///
/// Object keys are sorted recursively before hashing so field order never
/// affects the result.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SessionError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config)
        .map_err(|e| SessionError::Checkpoint(format!("Config serialization failed: {}", e)))?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| SessionError::Checkpoint(format!("Config serialization failed: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

impl SimulationSession {
    pub fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        Ok(SessionSnapshot {
            simulation_id: self.id(),
            name: self.name().to_string(),
            status: self.status(),
            rng_state: self.rng_state(),
            ledger: self.analyzer().ledger().clone(),
            counters: self.counters().clone(),
            event_seq: self.event_log().next_seq(),
            config_hash: compute_config_hash(self.config())?,
        })
    }

    /// Serialize session state to JSON
    pub fn save_state(&self) -> Result<String, SessionError> {
        let snapshot = self.snapshot()?;
        serde_json::to_string(&snapshot)
            .map_err(|e| SessionError::Checkpoint(format!("Snapshot serialization failed: {}", e)))
    }

    /// Rebuild a session from a snapshot
    ///
    /// # Errors
    ///
    /// `Checkpoint` if the snapshot was taken under a different config.
    pub fn restore(
        snapshot: SessionSnapshot,
        config: SimulatorConfig,
    ) -> Result<Self, SessionError> {
        let expected = compute_config_hash(&config)?;
        if snapshot.config_hash != expected {
            return Err(SessionError::Checkpoint(format!(
                "Config hash mismatch: snapshot {}, current {}",
                snapshot.config_hash, expected
            )));
        }

        let session = Self::assemble(
            snapshot.simulation_id,
            snapshot.name,
            config,
            snapshot.status,
            Some(snapshot.rng_state),
            snapshot.ledger,
            snapshot.counters,
            EventLog::starting_at(snapshot.event_seq),
        )?;

        tracing::info!(
            simulation_id = session.id(),
            event_seq = snapshot.event_seq,
            "session restored from checkpoint"
        );
        Ok(session)
    }

    /// Restore from JSON produced by [`SimulationSession::save_state`]
    pub fn load_state(json: &str, config: SimulatorConfig) -> Result<Self, SessionError> {
        let snapshot: SessionSnapshot = serde_json::from_str(json)
            .map_err(|e| SessionError::Checkpoint(format!("Snapshot parse failed: {}", e)))?;
        Self::restore(snapshot, config)
    }
}
