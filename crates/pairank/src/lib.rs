//! pairank: pairwise-ranking matrix factorization for implicit feedback.
//!
//! Learns user and item latent factors (plus optional item biases) so that,
//! for every user, items the user interacted with score above items they did
//! not. Training follows Bayesian Personalized Ranking: for each observed
//! `(user, item)` pair a few unobserved items are sampled and each resulting
//! triple gets one stochastic, optionally AdaGrad-scaled, update.
//!
//! # Key Types
//!
//! - [`BprModel`] - High-level model with train/predict
//! - [`BprConfig`] - Configuration builder
//! - [`Interactions`] - Per-user rated-item sets
//! - [`FactorModel`] - Parameter store
//! - [`BprTrainer`] - Epoch driver and pairwise update
//!
//! # Training
//!
//! Use `BprConfig::builder()` to configure, then `BprModel::train()`.
//! See the [`model`] module for details; [`training`] exposes the lower-level
//! trainer for callers that manage the parameter store themselves.

// Re-export approx traits for users who want to compare scores
pub use approx;

pub mod data;
pub mod model;
pub mod repr;
pub mod training;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// High-level model types
pub use model::{BprConfig, BprModel};

// Training types
pub use training::{BprParams, BprTrainer, ConfigError, Loss, PairwiseLoss, TrainError};

// Data types
pub use data::{DatasetError, IdMap, Interactions, ItemId, UserId};

// Parameter store
pub use repr::{FactorInit, FactorModel};
