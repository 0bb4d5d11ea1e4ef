//! Regularization penalties.

use serde::{Deserialize, Serialize};

/// Norm penalty applied to every parameter touched by an update.
///
/// The trainer adds `penalty.gradient(lambda, w)` to the loss gradient of each
/// parameter `w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Penalty {
    /// `λ·|w|`, gradient `λ·sign(w)` (0 at `w = 0`).
    L1,
    /// `λ·w²`, gradient `2λ·w`.
    #[default]
    L2,
}

impl Penalty {
    /// Gradient of the penalty at `value`.
    #[inline]
    pub fn gradient(self, lambda: f32, value: f32) -> f32 {
        match self {
            Penalty::L1 => {
                if value > 0.0 {
                    lambda
                } else if value < 0.0 {
                    -lambda
                } else {
                    0.0
                }
            }
            Penalty::L2 => 2.0 * lambda * value,
        }
    }

    /// Name of the penalty (for logging).
    pub fn name(self) -> &'static str {
        match self {
            Penalty::L1 => "l1",
            Penalty::L2 => "l2",
        }
    }
}
