use thiserror::Error;

use crate::config::ConfigError;
use crate::observation::ObservationError;
use crate::policy::PolicyError;
use crate::sink::SinkError;

/// Errors that abort construction of a controller or a whole tick.
///
/// Only [`ControlError::Publish`] can follow earlier publishes in the same
/// tick; every other tick error happens before the first publish.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Policy invocation failed: {0}")]
    Policy(#[from] PolicyError),

    #[error("Cannot build observation: {0}")]
    Observation(#[from] ObservationError),

    #[error("Command delivery failed: {0}")]
    Publish(#[from] SinkError),
}
