//! High-level model wrappers.
//!
//! - [`BprModel`]: factorization model trained with pairwise ranking updates
//! - [`BprConfig`]: validated training configuration (builder + serde)
//!
//! # Example
//!
//! ```
//! use pairank::data::Interactions;
//! use pairank::model::{BprConfig, BprModel};
//!
//! let data = Interactions::from_pairs(2, 4, [(0, 0), (0, 1), (1, 2), (1, 3)]).unwrap();
//! let config = BprConfig::builder().n_factors(4).n_epochs(5).build().unwrap();
//!
//! let model = BprModel::train(&data, config).unwrap();
//! assert_eq!(model.epochs_trained(), 5);
//! assert!(model.predict(0, 1).is_some());
//! assert!(model.predict(2, 0).is_none());
//! ```

pub mod bpr;

pub use bpr::{BprConfig, BprModel};
