//! Velocity/acceleration feasibility filter.

use crate::config::ControllerConfig;
use crate::types::Vec2;

/// Projects a raw velocity command onto what the agent can reach within one
/// control period.
///
/// Every bound is applied per axis. Clamping a diagonal command this way can
/// change its direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicsFilter {
    max_velocity: f64,
    max_acceleration: f64,
    control_frequency: f64,
}

impl DynamicsFilter {
    pub fn new(max_velocity: f64, max_acceleration: f64, control_frequency: f64) -> Self {
        Self {
            max_velocity,
            max_acceleration,
            control_frequency,
        }
    }

    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(
            config.max_velocity,
            config.max_acceleration,
            config.control_frequency,
        )
    }

    /// Returns the feasible command for `raw` given the current velocity.
    ///
    /// ```text
    /// v_clip = clamp(raw, ±max_v)
    /// a_des  = (v_clip - current) · f
    /// a_poss = clamp(a_des, ±max_a)
    /// out    = clamp(current + a_poss / f, ±max_v)
    /// ```
    pub fn filter(&self, raw: Vec2, current: Vec2) -> Vec2 {
        let f = self.control_frequency;
        let clipped = raw.clamp_abs(self.max_velocity);
        let desired_acc = (clipped - current) * f;
        let possible_acc = desired_acc.clamp_abs(self.max_acceleration);
        let possible = current + possible_acc * (1.0 / f);
        possible.clamp_abs(self.max_velocity)
    }
}
