//! Hyperparameters of the pairwise update.

use serde::{Deserialize, Serialize};

use crate::training::Penalty;

/// Parameters for BPR training.
///
/// The latent dimension, bias term and AdaGrad switch are properties of the
/// [`FactorModel`](crate::repr::FactorModel) being trained; these parameters
/// only control how a pairwise update moves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BprParams {
    /// Step size applied to every (possibly AdaGrad-scaled) gradient.
    pub learning_rate: f32,

    /// AdaGrad smoothing constant: gradients are divided by `beta + sqrt(acc)`.
    pub beta: f32,

    /// Regularization coefficient.
    pub lambda: f32,

    /// Regularization norm.
    pub penalty: Penalty,

    /// Negative items drawn per rated item and epoch.
    pub n_negatives: u32,

    /// Maximum rejection-sampling draws per negative.
    pub max_negative_draws: u32,
}

impl Default for BprParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            beta: 1.0,
            lambda: 0.01,
            penalty: Penalty::L2,
            n_negatives: 5,
            max_negative_draws: 1000,
        }
    }
}

impl BprParams {
    /// Validate parameters.
    ///
    /// # Errors
    ///
    /// Returns error if any parameter is out of its domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ConfigError::InvalidLearningRate(self.learning_rate));
        }
        if !(self.beta >= 0.0 && self.beta.is_finite()) {
            return Err(ConfigError::InvalidBeta(self.beta));
        }
        if !(self.lambda >= 0.0 && self.lambda.is_finite()) {
            return Err(ConfigError::InvalidLambda(self.lambda));
        }
        if self.max_negative_draws == 0 {
            return Err(ConfigError::InvalidMaxNegativeDraws);
        }
        Ok(())
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("learning_rate must be finite and > 0, got {0}")]
    InvalidLearningRate(f32),

    #[error("beta must be finite and >= 0, got {0}")]
    InvalidBeta(f32),

    #[error("lambda must be finite and >= 0, got {0}")]
    InvalidLambda(f32),

    #[error("max_negative_draws must be >= 1")]
    InvalidMaxNegativeDraws,

    #[error("n_factors must be >= 1")]
    InvalidNFactors,

    #[error("n_epochs must be >= 1")]
    InvalidNEpochs,

    #[error("init_scale must be finite and >= 0, got {0}")]
    InvalidInitScale(f32),
}
