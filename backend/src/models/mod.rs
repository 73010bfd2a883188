//! Domain models for the IPC debugger

pub mod channel;
pub mod event;
pub mod process;
pub mod topology;

// Re-exports
pub use channel::{Channel, ChannelConfig, ChannelId};
pub use event::{Event, EventLog, Severity};
pub use process::{ProcessId, ProcessInfo, ProcessState};
pub use topology::Topology;
