//! passage - centralized velocity control for multi-agent passage navigation
//!
//! Each control tick ingests the latest reported kinematic state of every
//! agent, mirrors the scene into a canonical frame, queries a shared Gaussian
//! policy, shapes the sampled velocities to stay dynamically feasible, and
//! publishes one world-frame command per agent.

pub mod config;
pub mod controller;
pub mod dynamics;
pub mod frame;
pub mod observation;
pub mod policy;
pub mod registry;
pub mod sampler;
pub mod sink;
pub mod types;

pub use config::{ConfigError, ControllerConfig};
pub use controller::{ControlError, ControlStep, GoalProgress, TickReport, TickStatus};
pub use dynamics::DynamicsFilter;
pub use frame::{FrameNormalizer, FrameTransform, SideMirror};
pub use observation::{Observation, ObservationBuilder, ObservationError};
pub use policy::{ActionDistributionParams, GoalSeekingPolicy, PolicyAdapter, PolicyError, PolicyModel};
pub use registry::StateRegistry;
pub use sampler::ActionSampler;
pub use sink::{CommandSink, RecordingSink, SinkError};
pub use types::{AgentTask, Command, GoalState, KinematicState, MissionPlan, Vec2};

#[cfg(feature = "torch")]
pub use policy::TorchScriptPolicy;

/// Identifier type used for agents.
pub type AgentId = String;

/// Generates a new unique agent identifier (UUID v4).
pub fn generate_id() -> AgentId {
    uuid::Uuid::new_v4().to_string()
}
