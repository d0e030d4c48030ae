//! Core kinematic types shared by every stage of the control pipeline.
//!
//! All vectors are planar. World-frame and canonical-frame quantities use the
//! same [`Vec2`] type; which frame a value lives in is tracked by the caller.

use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::AgentId;

/// A planar vector (position, velocity or acceleration).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// Creates a new vector.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Zero vector.
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Euclidean length.
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Vec2) -> f64 {
        (*self - *other).norm()
    }

    /// Clamps each component independently to `[-bound, bound]`.
    ///
    /// This is a box clamp, not a magnitude clamp: a diagonal vector may
    /// change direction when only one axis saturates.
    pub fn clamp_abs(self, bound: f64) -> Self {
        Self {
            x: self.x.clamp(-bound, bound),
            y: self.y.clamp(-bound, bound),
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Last reported position and velocity of an agent, in world frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KinematicState {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl KinematicState {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self { position, velocity }
    }

    /// Builds a state from a flat state vector laid out as
    /// `[x, y, z, vx, vy, vz, ...]`.
    ///
    /// Returns `None` if the slice is shorter than five elements.
    pub fn from_state_vector(state: &[f64]) -> Option<Self> {
        if state.len() < 5 {
            return None;
        }
        Some(Self {
            position: Vec2::new(state[0], state[1]),
            velocity: Vec2::new(state[3], state[4]),
        })
    }
}

/// Goal pose of an agent, in world frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GoalState {
    pub position: Vec2,
}

impl GoalState {
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }
}

/// Start and goal assigned to one agent for the current mission.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentTask {
    pub start: Vec2,
    pub goal: GoalState,
}

impl AgentTask {
    pub fn new(start: Vec2, goal: Vec2) -> Self {
        Self {
            start,
            goal: GoalState::new(goal),
        }
    }
}

/// Starts and goals of every agent taking part in a mission, keyed by id.
///
/// Owned by the caller; the controller only reads it.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MissionPlan {
    tasks: HashMap<AgentId, AgentTask>,
}

impl MissionPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns (or replaces) the task of an agent.
    pub fn assign(&mut self, agent: impl Into<AgentId>, task: AgentTask) {
        self.tasks.insert(agent.into(), task);
    }

    /// Builder-style variant of [`MissionPlan::assign`].
    pub fn with(mut self, agent: impl Into<AgentId>, start: Vec2, goal: Vec2) -> Self {
        self.assign(agent, AgentTask::new(start, goal));
        self
    }

    pub fn task(&self, agent: &str) -> Option<&AgentTask> {
        self.tasks.get(agent)
    }

    pub fn start(&self, agent: &str) -> Option<Vec2> {
        self.tasks.get(agent).map(|t| t.start)
    }

    pub fn goal(&self, agent: &str) -> Option<&GoalState> {
        self.tasks.get(agent).map(|t| &t.goal)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Velocity reference sent to one agent.
///
/// `vn`/`ve` are the world-frame velocity along x and y. `yaw` is a fixed
/// heading that is never rotated by the frame transform.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Command {
    pub vn: f64,
    pub ve: f64,
    pub yaw: f64,
}

impl Command {
    pub fn new(velocity: Vec2, yaw: f64) -> Self {
        Self {
            vn: velocity.x,
            ve: velocity.y,
            yaw,
        }
    }

    /// The commanded planar velocity.
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.vn, self.ve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec2_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn clamp_abs_is_per_axis() {
        let v = Vec2::new(3.0, 0.5).clamp_abs(1.0);
        assert_eq!(v, Vec2::new(1.0, 0.5));
        let v = Vec2::new(-3.0, -3.0).clamp_abs(1.0);
        assert_eq!(v, Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn state_vector_layout() {
        let state = KinematicState::from_state_vector(&[1.0, 2.0, 9.0, 0.5, -0.5, 9.0]).unwrap();
        assert_eq!(state.position, Vec2::new(1.0, 2.0));
        assert_eq!(state.velocity, Vec2::new(0.5, -0.5));
        assert!(KinematicState::from_state_vector(&[1.0, 2.0]).is_none());
    }

    #[test]
    fn mission_plan_lookup() {
        let plan = MissionPlan::new().with("a1", Vec2::new(0.0, 1.0), Vec2::new(0.0, -1.0));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.start("a1"), Some(Vec2::new(0.0, 1.0)));
        assert_eq!(plan.goal("a1").unwrap().position, Vec2::new(0.0, -1.0));
        assert!(plan.task("a2").is_none());
    }

    #[test]
    fn command_keeps_heading() {
        let cmd = Command::new(Vec2::new(0.25, -0.1), std::f64::consts::FRAC_PI_2);
        assert_eq!(cmd.velocity(), Vec2::new(0.25, -0.1));
        assert_eq!(cmd.yaw, std::f64::consts::FRAC_PI_2);
    }
}
