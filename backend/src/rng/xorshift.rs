//! xorshift64* random number generator
//!
//! Fast, deterministic PRNG used for every latency draw in the simulator.
//!
//! # Determinism
//!
//! Same seed → same sequence of delays. Transfer tests rely on this to pin
//! exact outcomes, and session checkpoints rely on it to resume a simulation
//! with an identical latency stream.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use ipc_debugger_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let delay = rng.range_inclusive(100, 300); // [100, 300]
/// assert!((100..=300).contains(&delay));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (never zero)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is mapped to 1 since xorshift cannot leave the zero state.
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random value in range [min, max]
    ///
    /// Delay ranges are configured as closed intervals, so this is the draw
    /// every IPC mechanism uses. A degenerate range (`min == max`) still
    /// advances the generator so the draw sequence does not depend on the
    /// configured widths.
    ///
    /// # Panics
    /// Panics if min > max
    ///
    /// # Example
    /// ```
    /// use ipc_debugger_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(7);
    /// assert_eq!(rng.range_inclusive(25, 25), 25);
    /// ```
    pub fn range_inclusive(&mut self, min: u64, max: u64) -> u64 {
        assert!(min <= max, "min must not exceed max");

        let value = self.next();
        match (max - min).checked_add(1) {
            Some(span) => min + value % span,
            // Full u64 domain
            None => value,
        }
    }

    /// Get current RNG state (for checkpointing/replay)
    ///
    /// `RngManager::new(rng.get_state())` continues the exact same sequence.
    pub fn get_state(&self) -> u64 {
        self.state
    }
}
