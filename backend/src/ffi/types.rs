//! Type conversion utilities for FFI boundary
//!
//! Config dicts are read field by field; topology dicts and reports cross
//! the boundary through their serde representation, so the Python side sees
//! the same shapes as the JSON handled by the CLI.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use serde::Serialize;

use crate::config::{DelayRange, SimulatorConfig};
use crate::models::Topology;

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract an optional field; only a failed conversion is an error
fn extract_optional<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<Option<T>>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) if !value.is_none() => Ok(Some(value.extract()?)),
        _ => Ok(None),
    }
}

fn extract_with_default<'py, T>(dict: &Bound<'py, PyDict>, key: &str, default: T) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    Ok(extract_optional(dict, key)?.unwrap_or(default))
}

fn extract_range<'py>(
    dict: &Bound<'py, PyDict>,
    key: &str,
    default: DelayRange,
) -> PyResult<DelayRange> {
    Ok(extract_optional::<(u64, u64)>(dict, key)?
        .map(|(min, max)| DelayRange(min, max))
        .unwrap_or(default))
}

// ========================================================================
// Parsing
// ========================================================================

/// Parse simulator config; missing keys take their defaults
pub fn parse_simulator_config(py_config: &Bound<'_, PyDict>) -> PyResult<SimulatorConfig> {
    let defaults = SimulatorConfig::default();

    let config = SimulatorConfig {
        pipe_delay_range: extract_range(py_config, "pipe_delay_range", defaults.pipe_delay_range)?,
        queue_delay_range: extract_range(
            py_config,
            "queue_delay_range",
            defaults.queue_delay_range,
        )?,
        shmem_delay_range: extract_range(
            py_config,
            "shmem_delay_range",
            defaults.shmem_delay_range,
        )?,
        bottleneck_threshold_ms: extract_with_default(
            py_config,
            "bottleneck_threshold_ms",
            defaults.bottleneck_threshold_ms,
        )?,
        max_message_size: extract_with_default(
            py_config,
            "max_message_size",
            defaults.max_message_size,
        )?,
        max_processes: extract_with_default(py_config, "max_processes", defaults.max_processes)?,
        deadlock_check_interval_ms: extract_with_default(
            py_config,
            "deadlock_check_interval_ms",
            defaults.deadlock_check_interval_ms,
        )?,
        rng_seed: extract_with_default(py_config, "rng_seed", defaults.rng_seed)?,
    };

    config
        .validate()
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(config)
}

/// Parse `{"processes": [...], "channels": [...]}`
///
/// The dict goes through the same serde path as JSON input, so channel
/// options keep every key and mistyped values fall back to defaults.
pub fn parse_topology(py_topology: &Bound<'_, PyDict>) -> PyResult<Topology> {
    let json: String = py_topology
        .py()
        .import_bound("json")?
        .call_method1("dumps", (py_topology,))?
        .extract()?;

    Topology::from_json_str(&json)
        .map_err(|e| PyValueError::new_err(format!("Invalid topology: {}", e)))
}

// ========================================================================
// Conversion back to Python
// ========================================================================

/// Convert any serializable report into native Python objects
pub fn to_py<T: Serialize>(py: Python<'_>, value: &T) -> PyResult<PyObject> {
    let json = serde_json::to_string(value)
        .map_err(|e| PyValueError::new_err(format!("Serialization failed: {}", e)))?;
    let loaded = py.import_bound("json")?.call_method1("loads", (json,))?;
    Ok(loaded.unbind())
}
