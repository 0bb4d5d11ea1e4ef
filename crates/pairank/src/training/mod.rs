//! Training infrastructure for pairwise ranking.
//!
//! ## Shared Infrastructure
//!
//! - [`PairwiseLoss`], [`Loss`]: losses over the positive/negative margin
//! - [`Penalty`]: L1/L2 regularization gradient
//! - [`NegativeSampler`]: rejection sampling of unrated items
//! - [`adagrad`]: adaptive per-parameter gradient scaling
//! - [`TrainingLogger`], [`Verbosity`]: structured logging
//!
//! ## Model-Specific Training
//!
//! - [`bpr`]: BPR training via stochastic pairwise updates
//!
//! ## Losses
//!
//! - [`LogisticLoss`]: classic BPR objective (`"log"`)
//! - [`HingeLoss`]: margin loss
//! - [`SquaredLoss`]: squared margin error

pub mod adagrad;
pub mod bpr;
mod logger;
mod loss;
mod penalty;
mod sampling;

pub use logger::{TrainingLogger, Verbosity};
pub use loss::{HingeLoss, LogisticLoss, Loss, LossKind, PairwiseLoss, SquaredLoss};
pub use penalty::Penalty;
pub use sampling::{NegativeSampler, SamplingError};

// Re-export bpr trainer and params
pub use bpr::{
    for_each_training_triple, BprParams, BprTrainer, ConfigError, EpochStats, TrainError,
    POSITIVE_PREFERENCE,
};
