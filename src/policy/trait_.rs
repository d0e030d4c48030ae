//! Opaque policy model interface.

use super::adapter::FEATURE_DIM;
use super::error::PolicyError;
use crate::types::Vec2;

/// A shared policy mapping every agent's observation to action-distribution
/// logits.
///
/// Inputs are agent-indexed and aligned: `positions[i]` and `features[i]`
/// describe the same agent. Row `i` of the returned logits belongs to that
/// agent and holds the distribution means followed by the log standard
/// deviations, so its width must be even.
pub trait PolicyModel {
    /// Runs one forward pass.
    ///
    /// # Arguments
    ///
    /// * `positions` - Canonical-frame agent positions
    /// * `features` - Per-agent `[goal - pos, pos, pos + vel]` features
    /// * `comm_range` - Communication range used to connect neighbouring agents
    fn infer(
        &mut self,
        positions: &[Vec2],
        features: &[[f64; FEATURE_DIM]],
        comm_range: f64,
    ) -> Result<Vec<Vec<f64>>, PolicyError>;

    /// Returns a human-readable name for this policy.
    fn name(&self) -> &str;
}

impl<P> PolicyModel for Box<P>
where
    P: PolicyModel + ?Sized,
{
    fn infer(
        &mut self,
        positions: &[Vec2],
        features: &[[f64; FEATURE_DIM]],
        comm_range: f64,
    ) -> Result<Vec<Vec<f64>>, PolicyError> {
        (**self).infer(positions, features, comm_range)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
