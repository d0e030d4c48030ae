//! Encoding observations for the policy and decoding its logits.

use tracing::trace;

use super::error::PolicyError;
use super::trait_::PolicyModel;
use crate::config::ControllerConfig;
use crate::observation::Observation;
use crate::types::Vec2;

/// Number of features per agent: `[goal - pos (2), pos (2), pos + vel (2)]`.
pub const FEATURE_DIM: usize = 6;

/// Dimension of the action (planar velocity).
pub const ACTION_DIM: usize = 2;

/// Parameters of the diagonal Gaussian over one agent's velocity command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionDistributionParams {
    pub mean: Vec2,
    pub log_std: Vec2,
}

impl ActionDistributionParams {
    pub fn new(mean: Vec2, log_std: Vec2) -> Self {
        Self { mean, log_std }
    }

    /// Per-axis standard deviation.
    pub fn std(&self) -> Vec2 {
        Vec2::new(self.log_std.x.exp(), self.log_std.y.exp())
    }
}

/// Splits one logit row into its mean and log-std halves.
///
/// # Errors
///
/// [`PolicyError::OddLogitWidth`] if the row cannot be halved,
/// [`PolicyError::ActionDimMismatch`] if a half is not [`ACTION_DIM`] wide, and
/// [`PolicyError::NonFiniteLogits`] if any value is NaN or infinite.
pub fn split_logits(row: &[f64]) -> Result<ActionDistributionParams, PolicyError> {
    if row.iter().any(|v| !v.is_finite()) {
        return Err(PolicyError::NonFiniteLogits(row.to_vec()));
    }
    if row.len() % 2 != 0 {
        return Err(PolicyError::OddLogitWidth(row.len()));
    }
    let (mean, log_std) = row.split_at(row.len() / 2);
    if mean.len() != ACTION_DIM {
        return Err(PolicyError::ActionDimMismatch {
            width: row.len(),
            expected: ACTION_DIM,
        });
    }
    Ok(ActionDistributionParams::new(
        Vec2::new(mean[0], mean[1]),
        Vec2::new(log_std[0], log_std[1]),
    ))
}

/// Bridges an [`Observation`] to a [`PolicyModel`].
#[derive(Debug, Clone, Copy)]
pub struct PolicyAdapter {
    comm_range: f64,
}

impl PolicyAdapter {
    pub fn new(comm_range: f64) -> Self {
        Self { comm_range }
    }

    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.comm_range)
    }

    /// Encodes the per-agent model features.
    ///
    /// `pos + vel` is a one-step extrapolation, not a prediction.
    pub fn features(obs: &Observation) -> Vec<[f64; FEATURE_DIM]> {
        obs.positions
            .iter()
            .zip(&obs.velocities)
            .zip(&obs.goals)
            .map(|((&pos, &vel), &goal)| {
                let rel_goal = goal - pos;
                let next = pos + vel;
                [rel_goal.x, rel_goal.y, pos.x, pos.y, next.x, next.y]
            })
            .collect()
    }

    /// Runs the model on `obs` and decodes one distribution per agent, in
    /// observation order.
    ///
    /// Errors raised by the model are returned unchanged.
    pub fn infer<P>(
        &self,
        model: &mut P,
        obs: &Observation,
    ) -> Result<Vec<ActionDistributionParams>, PolicyError>
    where
        P: PolicyModel + ?Sized,
    {
        let features = Self::features(obs);
        let logits = model.infer(&obs.positions, &features, self.comm_range)?;
        trace!(policy = model.name(), rows = logits.len(), "policy inference done");

        if logits.len() != obs.len() {
            return Err(PolicyError::AgentCountMismatch {
                expected: obs.len(),
                got: logits.len(),
            });
        }

        logits.iter().map(|row| split_logits(row)).collect()
    }
}
