//! BPR model implementation.
//!
//! High-level wrapper around [`FactorModel`] with training and scoring.
//! Access components via [`factors()`](BprModel::factors) and
//! [`config()`](BprModel::config).

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::data::{Interactions, ItemId, UserId};
use crate::repr::FactorModel;
use crate::training::{BprTrainer, EpochStats, Loss, TrainError, TrainingLogger};

use super::BprConfig;

/// Factorization model trained with BPR.
///
/// The model keeps the sampling RNG between calls, so
/// `train(data, config)` with `n_epochs = a + b` produces the same parameters
/// as `train` with `n_epochs = a` followed by `train_epochs(data, b)`.
#[derive(Debug, Clone)]
pub struct BprModel {
    factors: FactorModel,
    config: BprConfig,
    loss: Loss,
    rng: Xoshiro256PlusPlus,
    epochs_trained: usize,
}

impl BprModel {
    /// Train a new model for `config.n_epochs` epochs.
    ///
    /// # Errors
    ///
    /// [`TrainError::InvalidConfig`] for an invalid configuration, otherwise
    /// any error of [`BprTrainer::train_one_iteration`].
    pub fn train(data: &Interactions, config: BprConfig) -> Result<Self, TrainError> {
        let loss = Loss::from(config.loss);
        Self::train_with_loss(data, config, loss)
    }

    /// Like [`train`](Self::train), with an explicit loss (e.g.
    /// [`Loss::custom`]) overriding `config.loss`.
    pub fn train_with_loss(
        data: &Interactions,
        config: BprConfig,
        loss: Loss,
    ) -> Result<Self, TrainError> {
        config.validate()?;

        let factors = FactorModel::new(data, &config.factor_init());
        // Sampling stream is offset from the initialization stream.
        let rng = Xoshiro256PlusPlus::seed_from_u64(config.seed.wrapping_add(1));
        let n_epochs = config.n_epochs as usize;

        let mut model = Self {
            factors,
            config,
            loss,
            rng,
            epochs_trained: 0,
        };
        model.train_epochs(data, n_epochs)?;
        Ok(model)
    }

    /// Continue training for `n_epochs` more epochs.
    ///
    /// Returns per-epoch statistics. On error, epochs completed so far (and
    /// the updates of the failing epoch made before the error) are kept.
    pub fn train_epochs(
        &mut self,
        data: &Interactions,
        n_epochs: usize,
    ) -> Result<Vec<EpochStats>, TrainError> {
        let mut trainer = BprTrainer::new(self.loss.clone(), self.config.to_trainer_params());
        let mut logger = TrainingLogger::new(self.config.verbosity);
        logger.start_training(n_epochs);
        logger.log_config(&self.config);

        let mut history = Vec::with_capacity(n_epochs);
        for _ in 0..n_epochs {
            logger.start_epoch();
            let stats = trainer.train_one_iteration(&mut self.factors, data, &mut self.rng)?;
            logger.log_epoch(self.epochs_trained, &stats);
            self.epochs_trained += 1;
            history.push(stats);
        }

        logger.finish_training();
        Ok(history)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Learned parameters.
    pub fn factors(&self) -> &FactorModel {
        &self.factors
    }

    /// Training configuration.
    pub fn config(&self) -> &BprConfig {
        &self.config
    }

    /// Loss used for training.
    pub fn loss(&self) -> &Loss {
        &self.loss
    }

    /// Total epochs run so far.
    pub fn epochs_trained(&self) -> usize {
        self.epochs_trained
    }

    /// Consume the model, keeping only the parameters.
    pub fn into_factors(self) -> FactorModel {
        self.factors
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Score of `item` for `user`, or `None` if either id is out of range.
    pub fn predict(&self, user: UserId, item: ItemId) -> Option<f32> {
        self.factors.try_predict(user, item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::{LossKind, PairwiseLoss, Verbosity};

    fn toy() -> Interactions {
        Interactions::from_pairs(2, 4, [(0, 0), (0, 1), (1, 2), (1, 3)]).unwrap()
    }

    #[test]
    fn train_runs_configured_epochs() {
        let config = BprConfig::builder().n_epochs(3).build().unwrap();
        let model = BprModel::train(&toy(), config).unwrap();
        assert_eq!(model.epochs_trained(), 3);
        assert_eq!(model.factors().n_users(), 2);
        assert_eq!(model.factors().n_items(), 4);
        assert_eq!(model.factors().n_factors(), 10);
        assert_eq!(model.loss().name(), "log");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = BprConfig {
            learning_rate: -1.0,
            ..Default::default()
        };
        let err = BprModel::train(&toy(), config).unwrap_err();
        assert!(matches!(err, TrainError::InvalidConfig(_)));
    }

    #[test]
    fn resumed_training_matches_single_run() {
        let data = toy();
        let full = BprModel::train(&data, BprConfig::builder().n_epochs(4).build().unwrap())
            .unwrap();

        let mut split =
            BprModel::train(&data, BprConfig::builder().n_epochs(1).build().unwrap()).unwrap();
        let history = split.train_epochs(&data, 3).unwrap();

        assert_eq!(history.len(), 3);
        assert_eq!(split.epochs_trained(), 4);
        assert_eq!(split.factors(), full.factors());
    }

    #[test]
    fn loss_kind_selects_loss() {
        let config = BprConfig::builder()
            .loss(LossKind::Squared)
            .n_epochs(1)
            .build()
            .unwrap();
        let model = BprModel::train(&toy(), config).unwrap();
        assert_eq!(model.loss().name(), "squared");
    }

    #[test]
    fn custom_loss_overrides_config() {
        #[derive(Debug)]
        struct Linear;
        impl PairwiseLoss for Linear {
            fn gradient(&self, _margin: f32, label: f32) -> f32 {
                -label
            }
            fn loss(&self, margin: f32, label: f32) -> f32 {
                -label * margin
            }
            fn name(&self) -> &'static str {
                "linear"
            }
        }

        let config = BprConfig::builder().n_epochs(1).build().unwrap();
        let model = BprModel::train_with_loss(&toy(), config, Loss::custom(Linear)).unwrap();
        assert_eq!(model.loss().name(), "linear");
    }

    #[test]
    fn verbose_training_without_subscriber() {
        let config = BprConfig::builder()
            .n_epochs(2)
            .verbosity(Verbosity::Debug)
            .build()
            .unwrap();
        assert!(BprModel::train(&toy(), config).is_ok());
    }

    #[test]
    fn predict_is_checked() {
        let model =
            BprModel::train(&toy(), BprConfig::builder().n_epochs(1).build().unwrap()).unwrap();
        assert!(model.predict(1, 3).is_some());
        assert_eq!(model.predict(2, 0), None);
        assert_eq!(model.predict(0, 4), None);
    }
}
