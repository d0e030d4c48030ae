//! Policy boundary: the opaque model, its input encoding and output decoding.

pub mod adapter;
pub mod error;
pub mod heuristic;
#[cfg(feature = "torch")]
pub mod torchscript;
pub mod trait_;

pub use adapter::{split_logits, ActionDistributionParams, PolicyAdapter, ACTION_DIM, FEATURE_DIM};
pub use error::PolicyError;
pub use heuristic::GoalSeekingPolicy;
#[cfg(feature = "torch")]
pub use torchscript::TorchScriptPolicy;
pub use trait_::PolicyModel;
