//! Stochastic action sampling from the Gaussian policy head.

use rand::Rng;

use crate::config::ControllerConfig;
use crate::policy::ActionDistributionParams;
use crate::types::Vec2;

/// Draws one velocity command per agent from `Normal(mean, exp(log_std))`,
/// clamped per axis to the velocity bound.
///
/// The random source is passed in by the caller; the sampler keeps no state
/// between agents or ticks.
#[derive(Debug, Clone, Copy)]
pub struct ActionSampler {
    max_velocity: f64,
}

impl ActionSampler {
    pub fn new(max_velocity: f64) -> Self {
        Self { max_velocity }
    }

    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.max_velocity)
    }

    /// Samples one action.
    pub fn sample<R>(&self, params: &ActionDistributionParams, rng: &mut R) -> Vec2
    where
        R: Rng + ?Sized,
    {
        let std = params.std();
        let noise = Vec2::new(standard_normal(rng), standard_normal(rng));
        let action = Vec2::new(
            params.mean.x + std.x * noise.x,
            params.mean.y + std.y * noise.y,
        );
        action.clamp_abs(self.max_velocity)
    }

    /// Samples one action per entry of `params`, in order.
    pub fn sample_all<R>(&self, params: &[ActionDistributionParams], rng: &mut R) -> Vec<Vec2>
    where
        R: Rng + ?Sized,
    {
        params.iter().map(|p| self.sample(p, rng)).collect()
    }
}

/// Standard normal draw via the Box-Muller transform.
fn standard_normal<R>(rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    let u1: f64 = rng.gen::<f64>().max(f64::EPSILON);
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn params(mean: (f64, f64), log_std: f64) -> ActionDistributionParams {
        ActionDistributionParams::new(Vec2::new(mean.0, mean.1), Vec2::new(log_std, log_std))
    }

    #[test]
    fn same_seed_same_samples() {
        let sampler = ActionSampler::new(1.5);
        let p = [params((0.2, -0.1), -1.0), params((0.0, 0.4), 0.0)];

        let a = sampler.sample_all(&p, &mut StdRng::seed_from_u64(7));
        let b = sampler.sample_all(&p, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn vanishing_std_returns_mean() {
        let sampler = ActionSampler::new(1.5);
        let mut rng = StdRng::seed_from_u64(1);
        let action = sampler.sample(&params((0.3, -0.7), f64::NEG_INFINITY), &mut rng);
        assert_eq!(action, Vec2::new(0.3, -0.7));
    }

    #[test]
    fn samples_are_clamped() {
        let sampler = ActionSampler::new(1.5);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let a = sampler.sample(&params((5.0, -5.0), 1.0), &mut rng);
            assert!(a.x.abs() <= 1.5 && a.y.abs() <= 1.5);
        }
        let a = sampler.sample(&params((10.0, -10.0), f64::NEG_INFINITY), &mut rng);
        assert_eq!(a, Vec2::new(1.5, -1.5));
    }

    #[test]
    fn sample_moments_match_distribution() {
        let sampler = ActionSampler::new(100.0);
        let mut rng = StdRng::seed_from_u64(42);
        let p = params((0.5, -0.25), (0.2f64).ln());

        let n = 20_000;
        let draws = sampler.sample_all(&vec![p; n], &mut rng);
        let mean_x = draws.iter().map(|d| d.x).sum::<f64>() / n as f64;
        let var_x = draws.iter().map(|d| (d.x - mean_x).powi(2)).sum::<f64>() / n as f64;
        let mean_y = draws.iter().map(|d| d.y).sum::<f64>() / n as f64;

        assert!((mean_x - 0.5).abs() < 0.01);
        assert!((mean_y + 0.25).abs() < 0.01);
        assert!((var_x.sqrt() - 0.2).abs() < 0.01);
    }
}
