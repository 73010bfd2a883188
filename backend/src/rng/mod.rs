//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm. Every latency draw in the simulator goes
//! through this module so that a seeded session replays identically.

mod xorshift;

pub use xorshift::RngManager;
