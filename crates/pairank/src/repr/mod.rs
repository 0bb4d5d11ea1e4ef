//! Parameter storage for factorization models.
//!
//! - [`FactorModel`]: user/item latent factors, item biases, `predict`
//! - [`AdaGradState`]: squared-gradient accumulators mirroring the parameters
//! - [`FactorInit`]: shape and initialization settings used by `reset`

mod adagrad;
mod factors;

pub use adagrad::AdaGradState;
pub use factors::{FactorInit, FactorModel};
