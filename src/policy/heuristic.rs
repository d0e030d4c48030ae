//! Goal-seeking baseline policy.
//!
//! Steers every agent straight at its goal with a proportional gain and a
//! fixed spread. Ignores neighbours entirely, so it does not negotiate the
//! passage; it exists for demos, smoke tests and as a lower-bound baseline.

use super::adapter::FEATURE_DIM;
use super::error::PolicyError;
use super::trait_::PolicyModel;
use crate::types::Vec2;

/// Proportional controller expressed as a Gaussian policy head.
///
/// For each agent the mean is `gain × (goal - pos)`; the log standard
/// deviation is the same constant on both axes.
#[derive(Debug, Clone)]
pub struct GoalSeekingPolicy {
    gain: f64,
    log_std: f64,
}

impl GoalSeekingPolicy {
    /// Creates a new goal-seeking policy.
    ///
    /// # Arguments
    ///
    /// * `gain` - Proportional gain on the goal offset
    /// * `log_std` - Log standard deviation of the sampled velocity
    pub fn new(gain: f64, log_std: f64) -> Self {
        Self { gain, log_std }
    }
}

impl Default for GoalSeekingPolicy {
    fn default() -> Self {
        // exp(-3) ≈ 0.05 m/s of exploration noise
        Self::new(1.0, -3.0)
    }
}

impl PolicyModel for GoalSeekingPolicy {
    fn infer(
        &mut self,
        _positions: &[Vec2],
        features: &[[f64; FEATURE_DIM]],
        _comm_range: f64,
    ) -> Result<Vec<Vec<f64>>, PolicyError> {
        Ok(features
            .iter()
            .map(|f| {
                vec![
                    self.gain * f[0],
                    self.gain * f[1],
                    self.log_std,
                    self.log_std,
                ]
            })
            .collect())
    }

    fn name(&self) -> &str {
        "goal_seeking"
    }
}
