//! Observation assembly for the shared policy.
//!
//! Builds the canonical-frame position, velocity and goal sequences over the
//! controllable agents that have reported state.

use thiserror::Error;

use crate::frame::FrameTransform;
use crate::registry::StateRegistry;
use crate::types::{MissionPlan, Vec2};
use crate::AgentId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObservationError {
    #[error("No goal assigned to agent {0}")]
    MissingGoal(AgentId),
}

/// Canonical-frame observation of the agents with known state.
///
/// All sequences share the same length and index `i` always refers to
/// `agents[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    pub agents: Vec<AgentId>,
    pub positions: Vec<Vec2>,
    pub velocities: Vec<Vec2>,
    pub goals: Vec<Vec2>,
}

impl Observation {
    /// Number of observed agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    fn push(&mut self, agent: &str, position: Vec2, velocity: Vec2, goal: Vec2) {
        self.agents.push(agent.to_string());
        self.positions.push(position);
        self.velocities.push(velocity);
        self.goals.push(goal);
    }
}

/// Builds [`Observation`]s from the registry and the mission plan.
pub struct ObservationBuilder;

impl ObservationBuilder {
    /// Builds the observation for `controllable`, in the given order.
    ///
    /// Agents without a recorded state are skipped entirely, so the result
    /// may be shorter than `controllable`. An agent that has state but no
    /// goal in `plan` is an error.
    pub fn build(
        controllable: &[AgentId],
        registry: &StateRegistry,
        plan: &MissionPlan,
        frame: FrameTransform,
    ) -> Result<Observation, ObservationError> {
        let mut obs = Observation::default();

        for agent in controllable {
            let Some(state) = registry.state(agent) else {
                continue;
            };
            let goal = plan
                .goal(agent)
                .ok_or_else(|| ObservationError::MissingGoal(agent.clone()))?;

            obs.push(
                agent,
                frame.apply(state.position),
                frame.apply(state.velocity),
                frame.apply(goal.position),
            );
        }

        Ok(obs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KinematicState;

    fn ids(names: &[&str]) -> Vec<AgentId> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn plan() -> MissionPlan {
        MissionPlan::new()
            .with("a0", Vec2::new(-1.0, 2.0), Vec2::new(-1.0, -2.0))
            .with("a1", Vec2::new(1.0, 2.0), Vec2::new(1.0, -2.0))
            .with("a2", Vec2::new(0.0, 2.0), Vec2::new(0.0, -2.0))
    }

    #[test]
    fn sequences_are_aligned() {
        let mut reg = StateRegistry::new();
        reg.record_state(
            "a0",
            KinematicState::new(Vec2::new(-1.0, 1.0), Vec2::new(0.1, 0.0)),
        );
        reg.record_state(
            "a1",
            KinematicState::new(Vec2::new(1.0, 1.0), Vec2::new(0.0, -0.2)),
        );

        let obs = ObservationBuilder::build(
            &ids(&["a1", "a0"]),
            &reg,
            &plan(),
            FrameTransform::Identity,
        )
        .unwrap();

        assert_eq!(obs.agents, ids(&["a1", "a0"]));
        assert_eq!(obs.positions, vec![Vec2::new(1.0, 1.0), Vec2::new(-1.0, 1.0)]);
        assert_eq!(obs.velocities, vec![Vec2::new(0.0, -0.2), Vec2::new(0.1, 0.0)]);
        assert_eq!(obs.goals, vec![Vec2::new(1.0, -2.0), Vec2::new(-1.0, -2.0)]);
    }

    #[test]
    fn agents_without_state_are_skipped() {
        let mut reg = StateRegistry::new();
        reg.register_agent("a0");
        reg.record_state("a2", KinematicState::default());

        let obs = ObservationBuilder::build(
            &ids(&["a0", "a1", "a2"]),
            &reg,
            &plan(),
            FrameTransform::Identity,
        )
        .unwrap();

        assert_eq!(obs.len(), 1);
        assert_eq!(obs.positions.len(), 1);
        assert_eq!(obs.velocities.len(), 1);
        assert_eq!(obs.goals.len(), 1);
        assert_eq!(obs.agents, ids(&["a2"]));
    }

    #[test]
    fn half_turn_is_applied_to_every_quantity() {
        let mut reg = StateRegistry::new();
        reg.record_state(
            "a0",
            KinematicState::new(Vec2::new(1.0, 1.0), Vec2::new(0.5, -0.5)),
        );

        let obs =
            ObservationBuilder::build(&ids(&["a0"]), &reg, &plan(), FrameTransform::HalfTurn)
                .unwrap();

        assert_eq!(obs.positions[0], Vec2::new(-1.0, -1.0));
        assert_eq!(obs.velocities[0], Vec2::new(-0.5, 0.5));
        assert_eq!(obs.goals[0], Vec2::new(1.0, 2.0));
    }

    #[test]
    fn missing_goal_is_an_error() {
        let mut reg = StateRegistry::new();
        reg.record_state("stranger", KinematicState::default());

        let err = ObservationBuilder::build(
            &ids(&["stranger"]),
            &reg,
            &plan(),
            FrameTransform::Identity,
        )
        .unwrap_err();
        assert_eq!(err, ObservationError::MissingGoal("stranger".into()));
    }

    #[test]
    fn never_longer_than_known_agents() {
        let mut reg = StateRegistry::new();
        reg.record_state("a0", KinematicState::default());
        reg.record_state("a1", KinematicState::default());

        let obs = ObservationBuilder::build(
            &ids(&["a0"]),
            &reg,
            &plan(),
            FrameTransform::Identity,
        )
        .unwrap();
        assert_eq!(obs.len(), 1);
        assert!(obs.len() <= reg.known_agents().len());
    }
}
