//! Registry of live sessions keyed by simulation id
//!
//! One session per simulation, created lazily on first use and dropped when
//! the simulation is deleted.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use super::engine::{SessionError, SimulationId, SimulationSession};
use crate::config::SimulatorConfig;

#[derive(Debug, Default)]
pub struct SessionRegistry {
    default_config: SimulatorConfig,
    sessions: BTreeMap<SimulationId, SimulationSession>,
}

impl SessionRegistry {
    /// Registry whose lazily created sessions use `default_config`
    pub fn new(default_config: SimulatorConfig) -> Result<Self, SessionError> {
        default_config.validate()?;
        Ok(Self {
            default_config,
            sessions: BTreeMap::new(),
        })
    }

    /// Fetch the session for `id`, creating it with the default config
    pub fn get_or_create(
        &mut self,
        id: SimulationId,
        name: &str,
    ) -> Result<&mut SimulationSession, SessionError> {
        match self.sessions.entry(id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let session = SimulationSession::new(id, name, self.default_config.clone())?;
                Ok(entry.insert(session))
            }
        }
    }

    /// Insert an already built session (e.g. one restored from a checkpoint)
    pub fn insert(&mut self, session: SimulationSession) -> Option<SimulationSession> {
        self.sessions.insert(session.id(), session)
    }

    pub fn get(&self, id: SimulationId) -> Option<&SimulationSession> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: SimulationId) -> Option<&mut SimulationSession> {
        self.sessions.get_mut(&id)
    }

    pub fn remove(&mut self, id: SimulationId) -> Option<SimulationSession> {
        let removed = self.sessions.remove(&id);
        if removed.is_some() {
            tracing::info!(simulation_id = id, "session dropped");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Simulation ids in ascending order
    pub fn ids(&self) -> Vec<SimulationId> {
        self.sessions.keys().copied().collect()
    }
}
