//! Simulation sessions - coordinator over the three engines
//!
//! See `engine.rs` for the request handlers, `checkpoint.rs` for
//! save/restore and `registry.rs` for per-simulation lookup.

pub mod checkpoint;
pub mod engine;
pub mod registry;

pub use checkpoint::{compute_config_hash, SessionSnapshot};
pub use engine::{
    MessageDelivery, SessionCounters, SessionError, SessionStatistics, SimulationId,
    SimulationSession, SimulationStatus,
};
pub use registry::SessionRegistry;
