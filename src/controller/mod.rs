//! Per-tick orchestration of the control pipeline.

pub mod error;
pub mod step;


pub use error::ControlError;
pub use step::{ControlStep, GoalProgress, TickReport, TickStatus};
