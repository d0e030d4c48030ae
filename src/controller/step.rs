//! The control tick.
//!
//! One call to [`ControlStep::tick`] runs the whole pipeline:
//! open channels → choose frame → observe → infer → sample → filter →
//! rotate back → publish → check goals.

use rand::Rng;
use tracing::{debug, debug_span, info, warn};

use super::error::ControlError;
use crate::config::{ConfigError, ControllerConfig};
use crate::dynamics::DynamicsFilter;
use crate::frame::{FrameNormalizer, FrameTransform, SideMirror};
use crate::observation::{Observation, ObservationBuilder};
use crate::policy::{PolicyAdapter, PolicyModel};
use crate::registry::StateRegistry;
use crate::sampler::ActionSampler;
use crate::sink::CommandSink;
use crate::types::{Command, KinematicState, MissionPlan};
use crate::AgentId;

/// How a tick ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// No agents were requested; nothing ran.
    Idle,
    /// Some requested agents have not reported state yet. The policy was
    /// not invoked and nothing was published.
    AwaitingFullObservation { known: usize, requested: usize },
    /// Commands were computed for every requested agent.
    Published,
}

/// Goal status of one requested agent.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    pub agent: AgentId,
    /// Distance to goal, unknown while the tick awaits observations.
    pub distance: Option<f64>,
    pub done: bool,
}

/// Result of one tick.
///
/// `progress` follows the order of the requested agents. Done flags are
/// recomputed from scratch every tick: an agent that drifts back out of the
/// goal radius is reported not done again.
#[derive(Debug, Clone)]
pub struct TickReport {
    /// Tick counter, starting at 0.
    pub tick: u64,
    pub status: TickStatus,
    pub frame: FrameTransform,
    pub progress: Vec<GoalProgress>,
    /// Commands handed to the sink, in publication order.
    pub commands: Vec<(AgentId, Command)>,
}

impl TickReport {
    /// Done flag of `agent`, if it was requested this tick.
    pub fn is_done(&self, agent: &str) -> Option<bool> {
        self.progress
            .iter()
            .find(|p| p.agent == agent)
            .map(|p| p.done)
    }

    /// `(agent, done)` pairs in request order.
    pub fn done_flags(&self) -> Vec<(&str, bool)> {
        self.progress
            .iter()
            .map(|p| (p.agent.as_str(), p.done))
            .collect()
    }

    /// True when at least one agent was requested and all reached their goal.
    pub fn all_done(&self) -> bool {
        !self.progress.is_empty() && self.progress.iter().all(|p| p.done)
    }

    pub fn command_for(&self, agent: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|(id, _)| id == agent)
            .map(|(_, cmd)| cmd)
    }
}

/// Centralized controller for a team of agents sharing one policy.
///
/// Owns the state registry for its whole lifetime. Ticks run one at a time
/// (`tick` takes `&mut self`); state reports may be recorded between ticks
/// and the last report before a tick is the one it sees.
///
/// # Type Parameters
///
/// * `P` - Policy model queried once per tick
/// * `R` - Random source used to sample actions
pub struct ControlStep<P, R> {
    config: ControllerConfig,
    registry: StateRegistry,
    normalizer: Box<dyn FrameNormalizer>,
    adapter: PolicyAdapter,
    sampler: ActionSampler,
    filter: DynamicsFilter,
    policy: P,
    rng: R,
    ticks: u64,
}

impl<P, R> ControlStep<P, R>
where
    P: PolicyModel,
    R: Rng,
{
    /// Creates a controller.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found in `config`.
    pub fn new(config: ControllerConfig, policy: P, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            policy = policy.name(),
            comm_range = config.comm_range,
            max_velocity = config.max_velocity,
            max_acceleration = config.max_acceleration,
            control_frequency = config.control_frequency,
            "controller ready"
        );
        Ok(Self {
            adapter: PolicyAdapter::from_config(&config),
            sampler: ActionSampler::from_config(&config),
            filter: DynamicsFilter::from_config(&config),
            config,
            registry: StateRegistry::new(),
            normalizer: Box::new(SideMirror),
            policy,
            rng,
            ticks: 0,
        })
    }

    /// Replaces the default [`SideMirror`] frame selection.
    pub fn with_frame_normalizer(mut self, normalizer: impl FrameNormalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    /// Stores a state report; overwrites any previous report for `agent`.
    pub fn record_state(&mut self, agent: &str, state: KinematicState) {
        self.registry.record_state(agent, state);
    }

    /// Forgets an agent that left the scene. Its channel is reopened if it
    /// is requested again later.
    ///
    /// Dropping an agent from the `controllable` list passed to
    /// [`ControlStep::tick`] does not free its slot or channel; only this
    /// call does.
    pub fn retire_agent(&mut self, agent: &str) -> bool {
        self.registry.retire_agent(agent)
    }

    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Number of ticks run so far, failed ones included.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Runs one control tick for `controllable`, in that order.
    ///
    /// The frame is chosen from the start position of the first requested
    /// agent. If any requested agent has not reported state the tick stops
    /// before the policy and reports every agent as not done.
    ///
    /// # Errors
    ///
    /// Policy failures (including non-finite logits), a requested agent with
    /// state but no goal, and publish failures abort the tick. All commands
    /// are computed before the first publish, so a policy failure publishes
    /// nothing. A publish failure stops the tick at the failing agent:
    /// commands already handed to the sink for earlier agents in request
    /// order stay published, later agents get nothing.
    ///
    /// Agents absent from `controllable` keep their registry slot and
    /// channel until [`ControlStep::retire_agent`] is called.
    pub fn tick<S>(
        &mut self,
        controllable: &[AgentId],
        plan: &MissionPlan,
        sink: &mut S,
    ) -> Result<TickReport, ControlError>
    where
        S: CommandSink + ?Sized,
    {
        let tick = self.ticks;
        self.ticks += 1;
        let _span = debug_span!("tick", tick).entered();

        self.open_channels(controllable, sink);

        let frame = controllable
            .first()
            .and_then(|agent| plan.start(agent))
            .map(|start| self.normalizer.compute_frame(start))
            .unwrap_or_default();

        let mut report = TickReport {
            tick,
            status: TickStatus::Idle,
            frame,
            progress: Vec::new(),
            commands: Vec::new(),
        };

        if controllable.is_empty() {
            return Ok(report);
        }

        let obs = ObservationBuilder::build(controllable, &self.registry, plan, frame)?;
        if obs.len() != controllable.len() {
            debug!(
                known = obs.len(),
                requested = controllable.len(),
                "awaiting full observation"
            );
            report.status = TickStatus::AwaitingFullObservation {
                known: obs.len(),
                requested: controllable.len(),
            };
            report.progress = controllable
                .iter()
                .map(|agent| GoalProgress {
                    agent: agent.clone(),
                    distance: None,
                    done: false,
                })
                .collect();
            return Ok(report);
        }

        let commands = self.compute_commands(&obs, frame)?;

        for (agent, command) in commands {
            if !self.registry.has_channel(&agent) {
                debug!(%agent, "no command channel, skipping");
                continue;
            }
            sink.publish(&agent, &command)?;
            report.commands.push((agent, command));
        }

        report.status = TickStatus::Published;
        report.progress = self.goal_progress(&obs, frame);
        debug!(
            published = report.commands.len(),
            done = report.progress.iter().filter(|p| p.done).count(),
            %frame,
            "tick complete"
        );
        Ok(report)
    }

    fn open_channels<S>(&mut self, controllable: &[AgentId], sink: &mut S)
    where
        S: CommandSink + ?Sized,
    {
        for agent in controllable {
            if self.registry.has_channel(agent) {
                continue;
            }
            match sink.open_channel(agent) {
                Ok(()) => {
                    self.registry.register_agent(agent);
                    debug!(%agent, "command channel opened");
                }
                Err(error) => warn!(%agent, %error, "command channel unavailable"),
            }
        }
    }

    /// Policy → sample → filter → world frame, in observation order.
    fn compute_commands(
        &mut self,
        obs: &Observation,
        frame: FrameTransform,
    ) -> Result<Vec<(AgentId, Command)>, ControlError> {
        let params = self.adapter.infer(&mut self.policy, obs)?;
        let raw = self.sampler.sample_all(&params, &mut self.rng);

        Ok(obs
            .agents
            .iter()
            .zip(raw)
            .zip(&obs.velocities)
            .map(|((agent, raw), &velocity)| {
                let feasible = self.filter.filter(raw, velocity);
                let command = Command::new(feasible, self.config.heading);
                (agent.clone(), frame.invert_command(command))
            })
            .collect())
    }

    fn goal_progress(&self, obs: &Observation, frame: FrameTransform) -> Vec<GoalProgress> {
        obs.agents
            .iter()
            .zip(obs.positions.iter().zip(&obs.goals))
            .map(|(agent, (&position, &goal))| {
                let distance = frame.invert(position).distance_to(&frame.invert(goal));
                GoalProgress {
                    agent: agent.clone(),
                    distance: Some(distance),
                    done: distance < self.config.goal_reached_distance,
                }
            })
            .collect()
    }
}
