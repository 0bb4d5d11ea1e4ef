//! High-level BPR configuration with builder pattern.
//!
//! # Example
//!
//! ```
//! use pairank::model::BprConfig;
//! use pairank::training::{LossKind, Penalty, Verbosity};
//!
//! // All defaults
//! let config = BprConfig::builder().build().unwrap();
//! assert_eq!(config.n_factors, 10);
//!
//! let config = BprConfig::builder()
//!     .loss(LossKind::Hinge)
//!     .penalty(Penalty::L1)
//!     .n_factors(32)
//!     .n_epochs(50)
//!     .use_adagrad(false)
//!     .verbosity(Verbosity::Info)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.loss, LossKind::Hinge);
//! ```

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::repr::FactorInit;
use crate::training::{BprParams, ConfigError, LossKind, Penalty, Verbosity};

/// Configuration for [`BprModel`](super::BprModel) training.
///
/// Deserializing fills missing fields with defaults; call
/// [`validate`](Self::validate) (or let `BprModel::train` do it) afterwards.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
#[serde(default)]
pub struct BprConfig {
    // === Objective ===
    /// Pairwise loss. Default: logistic.
    #[builder(default)]
    pub loss: LossKind,

    /// Regularization norm. Default: L2.
    #[builder(default)]
    pub penalty: Penalty,

    // === Update ===
    /// Step size. Default: 0.1.
    #[builder(default = 0.1)]
    pub learning_rate: f32,

    /// AdaGrad smoothing constant. Default: 1.0.
    #[builder(default = 1.0)]
    pub beta: f32,

    /// Regularization coefficient. Default: 0.01.
    #[builder(default = 0.01)]
    pub lambda: f32,

    // === Model shape ===
    /// Latent dimension. Default: 10.
    #[builder(default = 10)]
    pub n_factors: usize,

    /// Learn a per-item bias. Default: true.
    #[builder(default = true)]
    pub use_bias: bool,

    /// Scale updates with AdaGrad. Default: true.
    #[builder(default = true)]
    pub use_adagrad: bool,

    /// Latent entries start uniform in `[-init_scale, init_scale]`. Default: 0.1.
    #[builder(default = 0.1)]
    pub init_scale: f32,

    // === Sampling ===
    /// Negatives drawn per rated item. Default: 5.
    #[builder(default = 5)]
    pub n_negatives: u32,

    /// Rejection-sampling cap per negative. Default: 1000.
    #[builder(default = 1000)]
    pub max_negative_draws: u32,

    // === Schedule ===
    /// Epochs run by `BprModel::train`. Default: 10.
    #[builder(default = 10)]
    pub n_epochs: u32,

    /// Seed for initialization and sampling. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,

    // === Logging ===
    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

impl<S: bpr_config_builder::IsComplete> BprConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any parameter is out of its domain.
    pub fn build(self) -> Result<BprConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl BprConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.to_trainer_params().validate()?;

        if self.n_factors == 0 {
            return Err(ConfigError::InvalidNFactors);
        }
        if self.n_epochs == 0 {
            return Err(ConfigError::InvalidNEpochs);
        }
        if !(self.init_scale >= 0.0 && self.init_scale.is_finite()) {
            return Err(ConfigError::InvalidInitScale(self.init_scale));
        }
        Ok(())
    }

    /// Parameters of the pairwise update.
    pub fn to_trainer_params(&self) -> BprParams {
        BprParams {
            learning_rate: self.learning_rate,
            beta: self.beta,
            lambda: self.lambda,
            penalty: self.penalty,
            n_negatives: self.n_negatives,
            max_negative_draws: self.max_negative_draws,
        }
    }

    /// Shape and initialization of the parameter store.
    pub fn factor_init(&self) -> FactorInit {
        FactorInit {
            n_factors: self.n_factors,
            use_bias: self.use_bias,
            use_adagrad: self.use_adagrad,
            init_scale: self.init_scale,
            seed: self.seed,
        }
    }
}

impl Default for BprConfig {
    fn default() -> Self {
        // Builder defaults are valid.
        Self::builder().__build_internal()
    }
}

// =============================================================================
// Tests
// =============================================================================
