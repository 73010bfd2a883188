//! PyO3 wrapper for SimulationSession
//!
//! # Example (from Python)
//!
//! ```python
//! from ipc_debugger_core_rs import SimulationSession
//!
//! session = SimulationSession(1, "demo", {"rng_seed": 7})
//! topology = {
//!     "processes": [{"id": 1, "name": "A"}, {"id": 2, "name": "B"}],
//!     "channels": [{"id": 10, "kind": "pipe", "sender_id": 1, "receiver_id": 2}],
//! }
//! delivery = session.send_message(topology, 10, "hello")
//! print(delivery["outcome"]["delay_ms"])
//! ```

use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{parse_simulator_config, parse_topology, to_py};
use crate::config::SimulatorConfig;
use crate::session::{SessionError, SimulationSession};

fn to_py_err(error: SessionError) -> PyErr {
    match error {
        SessionError::ChannelNotFound(_) | SessionError::ProcessNotFound(_) => {
            PyKeyError::new_err(error.to_string())
        }
        other => PyValueError::new_err(other.to_string()),
    }
}

#[pyclass(name = "SimulationSession")]
pub struct PySimulationSession {
    inner: SimulationSession,
}

#[pymethods]
impl PySimulationSession {
    /// Create a session; `config` may be omitted for defaults
    #[new]
    #[pyo3(signature = (simulation_id, name, config=None))]
    fn new(
        simulation_id: u64,
        name: &str,
        config: Option<&Bound<'_, PyDict>>,
    ) -> PyResult<Self> {
        let config = match config {
            Some(py_config) => parse_simulator_config(py_config)?,
            None => SimulatorConfig::default(),
        };
        let inner = SimulationSession::new(simulation_id, name, config).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Restore a session from `save_state` output
    #[staticmethod]
    #[pyo3(signature = (state_json, config=None))]
    fn load_state(state_json: &str, config: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let config = match config {
            Some(py_config) => parse_simulator_config(py_config)?,
            None => SimulatorConfig::default(),
        };
        let inner = SimulationSession::load_state(state_json, config).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn save_state(&self) -> PyResult<String> {
        self.inner.save_state().map_err(to_py_err)
    }

    #[getter]
    fn simulation_id(&self) -> u64 {
        self.inner.id()
    }

    #[getter]
    fn status(&self) -> String {
        format!("{:?}", self.inner.status()).to_lowercase()
    }

    fn start(&mut self) {
        self.inner.start();
    }

    fn stop(&mut self) {
        self.inner.stop();
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn send_message(
        &mut self,
        py: Python<'_>,
        topology: &Bound<'_, PyDict>,
        channel_id: u64,
        content: &str,
    ) -> PyResult<PyObject> {
        let topology = parse_topology(topology)?;
        let delivery = self
            .inner
            .send_message(&topology, channel_id, content)
            .map_err(to_py_err)?;
        to_py(py, &delivery)
    }

    fn detect_deadlock(
        &mut self,
        py: Python<'_>,
        topology: &Bound<'_, PyDict>,
    ) -> PyResult<PyObject> {
        let topology = parse_topology(topology)?;
        to_py(py, &self.inner.detect_deadlock(&topology))
    }

    fn analyze_bottlenecks(
        &mut self,
        py: Python<'_>,
        topology: &Bound<'_, PyDict>,
    ) -> PyResult<PyObject> {
        let topology = parse_topology(topology)?;
        to_py(py, &self.inner.analyze_bottlenecks(&topology))
    }

    fn statistics(&self, py: Python<'_>, topology: &Bound<'_, PyDict>) -> PyResult<PyObject> {
        let topology = parse_topology(topology)?;
        to_py(py, &self.inner.statistics(&topology))
    }

    /// Hand over and clear the buffered events
    fn drain_events(&mut self, py: Python<'_>) -> PyResult<PyObject> {
        let log = self.inner.event_log_mut();
        let events = to_py(py, &log.events())?;
        log.clear();
        Ok(events)
    }
}
