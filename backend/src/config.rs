//! Simulator configuration
//!
//! Supplied once by the embedding system when a session is created and
//! immutable afterwards. Defaults mirror the demo deployment: pipes are
//! mid-latency, queues slowest, shared memory fastest.
//!
//! # Example
//!
//! ```rust
//! use ipc_debugger_core_rs::SimulatorConfig;
//!
//! let config = SimulatorConfig::from_json_str(r#"{"queue_delay_range": [50, 80], "rng_seed": 7}"#).unwrap();
//! assert_eq!(config.queue_delay_range.min_ms(), 50);
//! assert_eq!(config.pipe_delay_range.max_ms(), 300); // default kept
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {kind} delay range: min {min} exceeds max {max}")]
    InvalidDelayRange { kind: String, min: u64, max: u64 },

    #[error("Invalid bottleneck threshold: {0}")]
    InvalidThreshold(f64),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    #[error("Config parse error: {0}")]
    Parse(String),
}

/// Inclusive latency range in milliseconds, serialized as `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange(pub u64, pub u64);

impl DelayRange {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self(min_ms, max_ms)
    }

    pub fn min_ms(&self) -> u64 {
        self.0
    }

    pub fn max_ms(&self) -> u64 {
        self.1
    }

    pub fn contains(&self, delay_ms: u64) -> bool {
        (self.0..=self.1).contains(&delay_ms)
    }

    fn validate(&self, kind: &str) -> Result<(), ConfigError> {
        if self.0 > self.1 {
            return Err(ConfigError::InvalidDelayRange {
                kind: kind.to_string(),
                min: self.0,
                max: self.1,
            });
        }
        Ok(())
    }
}

/// Complete simulator configuration
///
/// # Fields
///
/// * `pipe_delay_range` / `queue_delay_range` / `shmem_delay_range` - Base
///   latency per mechanism (ms, inclusive)
/// * `bottleneck_threshold_ms` - Average latency above which a process or
///   channel is flagged
/// * `max_message_size` - Hard cap on message payload bytes for any channel
/// * `max_processes` - Upper bound on processes per simulation
/// * `deadlock_check_interval_ms` - Polling hint for the embedding scheduler
/// * `rng_seed` - Seed for the session's latency stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub pipe_delay_range: DelayRange,
    pub queue_delay_range: DelayRange,
    pub shmem_delay_range: DelayRange,
    pub bottleneck_threshold_ms: f64,
    pub max_message_size: usize,
    pub max_processes: usize,
    pub deadlock_check_interval_ms: u64,
    pub rng_seed: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            pipe_delay_range: DelayRange(100, 300),
            queue_delay_range: DelayRange(200, 500),
            shmem_delay_range: DelayRange(50, 150),
            bottleneck_threshold_ms: 500.0,
            max_message_size: 10 * 1024,
            max_processes: 10,
            deadlock_check_interval_ms: 500,
            rng_seed: 42,
        }
    }
}

impl SimulatorConfig {
    /// Parse a JSON document and validate it
    ///
    /// Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimulatorConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipe_delay_range.validate("pipe")?;
        self.queue_delay_range.validate("queue")?;
        self.shmem_delay_range.validate("shmem")?;

        if !self.bottleneck_threshold_ms.is_finite() || self.bottleneck_threshold_ms < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.bottleneck_threshold_ms));
        }

        if self.max_message_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_message_size must be > 0".to_string(),
            ));
        }

        if self.max_processes == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_processes must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pipe_delay_range, DelayRange(100, 300));
        assert_eq!(config.bottleneck_threshold_ms, 500.0);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let config = SimulatorConfig {
            shmem_delay_range: DelayRange(90, 10),
            ..Default::default()
        };

        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDelayRange {
                kind: "shmem".to_string(),
                min: 90,
                max: 10
            })
        );
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let config = SimulatorConfig {
            bottleneck_threshold_ms: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_zero_limits_rejected() {
        let config = SimulatorConfig {
            max_processes: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLimit(_))));
    }

    #[test]
    fn test_from_json_partial_overrides() {
        let config = SimulatorConfig::from_json_str(
            r#"{"pipe_delay_range": [1, 2], "bottleneck_threshold_ms": 120.5}"#,
        )
        .unwrap();

        assert_eq!(config.pipe_delay_range, DelayRange(1, 2));
        assert_eq!(config.bottleneck_threshold_ms, 120.5);
        assert_eq!(config.max_message_size, 10 * 1024);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            SimulatorConfig::from_json_str("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_json_validates() {
        assert!(matches!(
            SimulatorConfig::from_json_str(r#"{"queue_delay_range": [9, 3]}"#),
            Err(ConfigError::InvalidDelayRange { .. })
        ));
    }
}
