//! Pairwise loss functions.
//!
//! A pairwise loss scores the margin `m = predict(u, i) - predict(u, j)`
//! between a positive item `i` and a negative item `j` against a preference
//! label `y` (always `1.0` for implicit feedback).
//!
//! [`PairwiseLoss::gradient`] returns `dL/dm`. It is negative whenever the
//! margin should grow, so the trainer always *subtracts* `learning_rate * grad`.
//!
//! # Available Losses
//!
//! - [`LogisticLoss`]: `ln(1 + exp(-y·m))`, the classic BPR objective
//! - [`HingeLoss`]: `max(0, 1 - y·m)`
//! - [`SquaredLoss`]: `½(m - y)²`

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A loss over the margin between a positive and a negative item.
pub trait PairwiseLoss: Send + Sync {
    /// Derivative of the loss with respect to the margin.
    fn gradient(&self, margin: f32, label: f32) -> f32;

    /// Loss value at the given margin.
    fn loss(&self, margin: f32, label: f32) -> f32;

    /// Short name of the loss (for logging).
    fn name(&self) -> &'static str;
}

#[inline]
fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

// =============================================================================
// Logistic Loss
// =============================================================================

/// Logistic (log) loss on the margin.
///
/// - Loss: `ln(1 + exp(-y·m))`
/// - Gradient: `-y·σ(-y·m)`, which is `-(1 - σ(m))` for `y = 1`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogisticLoss;

impl PairwiseLoss for LogisticLoss {
    #[inline]
    fn gradient(&self, margin: f32, label: f32) -> f32 {
        -label * sigmoid(-label * margin)
    }

    #[inline]
    fn loss(&self, margin: f32, label: f32) -> f32 {
        // softplus(-z), stable for both signs
        let z = label * margin;
        if z > 0.0 {
            (-z).exp().ln_1p()
        } else {
            -z + z.exp().ln_1p()
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

// =============================================================================
// Hinge Loss
// =============================================================================

/// Hinge loss on the margin: `max(0, 1 - y·m)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HingeLoss;

impl PairwiseLoss for HingeLoss {
    #[inline]
    fn gradient(&self, margin: f32, label: f32) -> f32 {
        if label * margin < 1.0 {
            -label
        } else {
            0.0
        }
    }

    #[inline]
    fn loss(&self, margin: f32, label: f32) -> f32 {
        (1.0 - label * margin).max(0.0)
    }

    fn name(&self) -> &'static str {
        "hinge"
    }
}

// =============================================================================
// Squared Loss
// =============================================================================

/// Squared loss pulling the margin towards the label: `½(m - y)²`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredLoss;

impl PairwiseLoss for SquaredLoss {
    #[inline]
    fn gradient(&self, margin: f32, label: f32) -> f32 {
        margin - label
    }

    #[inline]
    fn loss(&self, margin: f32, label: f32) -> f32 {
        let d = margin - label;
        0.5 * d * d
    }

    fn name(&self) -> &'static str {
        "squared"
    }
}

// =============================================================================
// Loss selector + enum
// =============================================================================

/// Serializable selector for the built-in losses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LossKind {
    #[default]
    Logistic,
    Hinge,
    Squared,
}

/// Loss enum for configuration.
///
/// Wraps the built-in losses and user-provided implementations behind a single
/// type that implements [`PairwiseLoss`] by delegation.
///
/// # Example
///
/// ```
/// use pairank::training::{Loss, LossKind, PairwiseLoss};
///
/// let loss = Loss::from(LossKind::Logistic);
/// assert_eq!(loss.name(), "log");
/// assert!(loss.gradient(0.0, 1.0) < 0.0);
/// ```
#[derive(Clone)]
pub enum Loss {
    Logistic(LogisticLoss),
    Hinge(HingeLoss),
    Squared(SquaredLoss),
    /// User-provided loss.
    Custom(Arc<dyn PairwiseLoss>),
}

impl std::fmt::Debug for Loss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logistic(inner) => f.debug_tuple("Logistic").field(inner).finish(),
            Self::Hinge(inner) => f.debug_tuple("Hinge").field(inner).finish(),
            Self::Squared(inner) => f.debug_tuple("Squared").field(inner).finish(),
            Self::Custom(inner) => f.debug_tuple("Custom").field(&inner.name()).finish(),
        }
    }
}

impl Default for Loss {
    fn default() -> Self {
        Self::Logistic(LogisticLoss)
    }
}

impl Loss {
    pub fn logistic() -> Self {
        Self::Logistic(LogisticLoss)
    }

    pub fn hinge() -> Self {
        Self::Hinge(HingeLoss)
    }

    pub fn squared() -> Self {
        Self::Squared(SquaredLoss)
    }

    pub fn custom(loss: impl PairwiseLoss + 'static) -> Self {
        Self::Custom(Arc::new(loss))
    }
}

impl From<LossKind> for Loss {
    fn from(kind: LossKind) -> Self {
        match kind {
            LossKind::Logistic => Self::logistic(),
            LossKind::Hinge => Self::hinge(),
            LossKind::Squared => Self::squared(),
        }
    }
}

impl PairwiseLoss for Loss {
    #[inline]
    fn gradient(&self, margin: f32, label: f32) -> f32 {
        match self {
            Self::Logistic(inner) => inner.gradient(margin, label),
            Self::Hinge(inner) => inner.gradient(margin, label),
            Self::Squared(inner) => inner.gradient(margin, label),
            Self::Custom(inner) => inner.gradient(margin, label),
        }
    }

    #[inline]
    fn loss(&self, margin: f32, label: f32) -> f32 {
        match self {
            Self::Logistic(inner) => inner.loss(margin, label),
            Self::Hinge(inner) => inner.loss(margin, label),
            Self::Squared(inner) => inner.loss(margin, label),
            Self::Custom(inner) => inner.loss(margin, label),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Logistic(inner) => inner.name(),
            Self::Hinge(inner) => inner.name(),
            Self::Squared(inner) => inner.name(),
            Self::Custom(inner) => inner.name(),
        }
    }
}
