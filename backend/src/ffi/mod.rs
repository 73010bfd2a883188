//! Python bindings (built with the `pyo3` feature)

pub mod session;
pub mod types;
