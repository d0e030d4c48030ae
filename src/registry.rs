//! Per-agent bookkeeping of reported state and command channels.

use std::collections::{HashMap, HashSet};

use crate::types::KinematicState;
use crate::AgentId;

/// Tracks the latest kinematic state of every agent and whether a command
/// channel has been opened for it.
///
/// A slot exists once an agent has been registered or has reported state.
/// Reports overwrite the slot (last write wins); nothing is interpolated.
/// Slots are never evicted implicitly; agents that leave must be removed
/// with [`StateRegistry::retire_agent`].
#[derive(Debug, Default)]
pub struct StateRegistry {
    states: HashMap<AgentId, Option<KinematicState>>,
    channels: HashSet<AgentId>,
}

impl StateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures a command channel and a state slot exist for `id`.
    ///
    /// Returns `true` if the channel was not registered before.
    pub fn register_agent(&mut self, id: &str) -> bool {
        self.states.entry(id.to_string()).or_insert(None);
        self.channels.insert(id.to_string())
    }

    /// Overwrites the stored state of `id`.
    pub fn record_state(&mut self, id: &str, state: KinematicState) {
        self.states.insert(id.to_string(), Some(state));
    }

    /// Latest state reported for `id`, if any.
    pub fn state(&self, id: &str) -> Option<&KinematicState> {
        self.states.get(id).and_then(Option::as_ref)
    }

    pub fn has_channel(&self, id: &str) -> bool {
        self.channels.contains(id)
    }

    /// Ids with at least one recorded state.
    pub fn known_agents(&self) -> HashSet<&str> {
        self.states
            .iter()
            .filter(|(_, state)| state.is_some())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Forgets an agent that has left the scene.
    ///
    /// Returns `true` if anything was removed.
    pub fn retire_agent(&mut self, id: &str) -> bool {
        let had_slot = self.states.remove(id).is_some();
        let had_channel = self.channels.remove(id);
        had_slot || had_channel
    }

    /// Number of agents with a slot.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
