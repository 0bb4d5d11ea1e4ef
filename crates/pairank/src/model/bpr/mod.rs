//! BPR model and configuration.
//!
//! [`BprConfig`] collects every knob of a run; [`BprModel`] owns the trained
//! [`FactorModel`](crate::repr::FactorModel) together with the RNG stream, so
//! training can be resumed epoch by epoch.

mod config;
mod model;

pub use config::{BprConfig, BprConfigBuilder};
pub use model::BprModel;
