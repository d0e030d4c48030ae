use thiserror::Error;

use crate::config::ConfigError;

/// Failures at the policy boundary.
///
/// Any of these is fatal to the tick in which it occurs.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Policy inference failed: {0}")]
    Inference(String),

    #[error("Policy returned {got} logit rows for {expected} agents")]
    AgentCountMismatch { expected: usize, got: usize },

    #[error("Logit width {0} cannot be split into mean and log-std halves")]
    OddLogitWidth(usize),

    #[error("Logit width {width} does not encode a {expected}-dimensional action")]
    ActionDimMismatch { width: usize, expected: usize },

    #[error("Policy returned non-finite logits {0:?}")]
    NonFiniteLogits(Vec<f64>),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[cfg(feature = "torch")]
    #[error(transparent)]
    Torch(#[from] tch::TchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_count_mismatch_display() {
        let e = PolicyError::AgentCountMismatch {
            expected: 3,
            got: 2,
        };
        assert_eq!(e.to_string(), "Policy returned 2 logit rows for 3 agents");
    }

    #[test]
    fn non_finite_display() {
        let e = PolicyError::NonFiniteLogits(vec![f64::NAN, 0.0]);
        assert_eq!(e.to_string(), "Policy returned non-finite logits [NaN, 0.0]");
    }

    #[test]
    fn odd_width_display() {
        let e = PolicyError::OddLogitWidth(5);
        assert!(e.to_string().contains("Logit width 5"));
    }
}
