//! TorchScript policy backend using tch-rs (PyTorch bindings).
//!
//! Loads a serialized graph network exported with `torch.jit.save` and runs
//! it for inference. This module is only available with the `torch` feature.
//!
//! The exported module takes `(pos [1, N, 2], x [1, N, 6], comm_range [1])`
//! and returns logits of shape `[1, N, 2 * ACTION_DIM]`.

use std::path::{Path, PathBuf};

use tch::{CModule, Device, Kind, Tensor};
use tracing::info;

use super::adapter::FEATURE_DIM;
use super::error::PolicyError;
use super::trait_::PolicyModel;
use crate::config::ControllerConfig;
use crate::types::Vec2;

/// Policy backed by a TorchScript module.
pub struct TorchScriptPolicy {
    module: CModule,
    device: Device,
    path: PathBuf,
}

impl TorchScriptPolicy {
    /// Loads a TorchScript module onto `device`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded.
    pub fn load(path: impl AsRef<Path>, device: Device) -> Result<Self, PolicyError> {
        let path = path.as_ref().to_path_buf();
        let module = CModule::load_on_device(&path, device)?;
        info!(path = %path.display(), ?device, "loaded policy module");
        Ok(Self {
            module,
            device,
            path,
        })
    }

    /// Loads the module named by [`ControllerConfig::model_path`].
    ///
    /// # Errors
    ///
    /// [`PolicyError::Config`] if no path is configured, otherwise any
    /// loading error.
    pub fn from_config(config: &ControllerConfig, device: Device) -> Result<Self, PolicyError> {
        let path = config.require_model_path()?;
        Self::load(path, device)
    }

    /// Returns the path the module was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tensor(&self, values: &[f32], shape: &[i64]) -> Tensor {
        Tensor::from_slice(values).reshape(shape).to_device(self.device)
    }
}

impl PolicyModel for TorchScriptPolicy {
    fn infer(
        &mut self,
        positions: &[Vec2],
        features: &[[f64; FEATURE_DIM]],
        comm_range: f64,
    ) -> Result<Vec<Vec<f64>>, PolicyError> {
        let n_agents = positions.len() as i64;

        let flat_pos: Vec<f32> = positions
            .iter()
            .flat_map(|p| [p.x as f32, p.y as f32])
            .collect();
        let flat_x: Vec<f32> = features
            .iter()
            .flat_map(|f| f.iter().map(|&v| v as f32))
            .collect();

        let pos = self.tensor(&flat_pos, &[1, n_agents, 2]);
        let x = self.tensor(&flat_x, &[1, n_agents, FEATURE_DIM as i64]);
        let range = self.tensor(&[comm_range as f32], &[1]);

        let logits = tch::no_grad(|| self.module.forward_ts(&[pos, x, range]))?;

        let size = logits.size();
        if size.len() != 3 || size[0] != 1 {
            return Err(PolicyError::Inference(format!(
                "expected logits of shape [1, N, W], got {size:?}"
            )));
        }

        let logits = logits
            .squeeze_dim(0)
            .to_device(Device::Cpu)
            .to_kind(Kind::Double);
        Ok(Vec::<Vec<f64>>::try_from(&logits)?)
    }

    fn name(&self) -> &str {
        "torchscript"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn from_config_requires_model_path() {
        let config = ControllerConfig::default();
        let err = TorchScriptPolicy::from_config(&config, Device::Cpu)
            .err()
            .unwrap();
        assert!(matches!(err, PolicyError::Config(ConfigError::MissingModelPath)));
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(TorchScriptPolicy::load("does/not/exist.pt", Device::Cpu).is_err());
    }
}
