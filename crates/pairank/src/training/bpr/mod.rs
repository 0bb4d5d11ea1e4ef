//! BPR (pairwise ranking) training.
//!
//! One epoch visits every user in ascending id order, every rated item of that
//! user, and draws `n_negatives` negatives per positive. Each
//! `(user, positive, negative)` triple gets one stochastic update of the user
//! row, both item rows and (optionally) both item biases.
//!
//! # Key Types
//!
//! - [`BprParams`]: update hyperparameters
//! - [`BprTrainer`]: epoch driver and pairwise update
//! - [`for_each_training_triple`]: the triple sequence an epoch trains on

mod params;
mod trainer;

pub use params::{BprParams, ConfigError};
pub use trainer::{
    for_each_training_triple, BprTrainer, EpochStats, TrainError, POSITIVE_PREFERENCE,
};
