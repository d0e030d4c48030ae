//! Configuration for the passage controller.

use std::path::PathBuf;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors raised when a [`ControllerConfig`] cannot be used.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("No policy model path configured")]
    MissingModelPath,
}

/// Tuning values for one controller instance.
///
/// Controls the policy communication range, the velocity and acceleration
/// envelope applied to every command, the goal acceptance radius and the
/// control tick rate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControllerConfig {
    /// Communication range handed to the policy as a scalar input.
    pub comm_range: f64,
    /// Per-axis velocity bound (m/s).
    pub max_velocity: f64,
    /// Per-axis acceleration bound (m/s²).
    pub max_acceleration: f64,
    /// An agent whose distance to goal is below this is reported done.
    pub goal_reached_distance: f64,
    /// Control tick rate (Hz). One tick lasts `1 / control_frequency` seconds.
    pub control_frequency: f64,
    /// Heading sent with every command (rad). Not affected by the frame mirror.
    pub heading: f64,
    /// Serialized policy artifact, required by file-backed policies.
    pub model_path: Option<PathBuf>,
}

impl ControllerConfig {
    /// Checks that every numeric value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("comm_range", self.comm_range),
            ("max_velocity", self.max_velocity),
            ("max_acceleration", self.max_acceleration),
            ("goal_reached_distance", self.goal_reached_distance),
            ("control_frequency", self.control_frequency),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if !self.heading.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "heading",
                value: self.heading,
            });
        }
        Ok(())
    }

    /// Returns the configured model path or [`ConfigError::MissingModelPath`].
    pub fn require_model_path(&self) -> Result<&PathBuf, ConfigError> {
        self.model_path.as_ref().ok_or(ConfigError::MissingModelPath)
    }

    /// Duration of one control tick (s).
    pub fn control_period(&self) -> f64 {
        1.0 / self.control_frequency
    }

    /// Largest per-axis velocity change reachable within one tick.
    pub fn max_velocity_step(&self) -> f64 {
        self.max_acceleration / self.control_frequency
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            comm_range: 2.0,
            max_velocity: 1.5,
            max_acceleration: 1.0,
            goal_reached_distance: 0.25,
            control_frequency: 4.0,
            heading: std::f64::consts::FRAC_PI_2,
            model_path: None,
        }
    }
}
