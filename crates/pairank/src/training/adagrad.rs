//! Adaptive (AdaGrad) gradient scaling.
//!
//! Each parameter keeps a running sum of its squared gradients. A raw gradient
//! `g` for a parameter with accumulator `a` is turned into
//!
//! ```text
//! a ← a + g²
//! g ← g / (beta + sqrt(a))
//! ```
//!
//! The trainer accumulates for every touched parameter first and scales
//! afterwards, so a row touched twice in one update (an explicit `i == j`
//! pair) is scaled by its fully updated accumulator.

use ndarray::{ArrayView1, ArrayViewMut1, Zip};

/// Add the elementwise square of `grad` to `acc`.
#[inline]
pub fn accumulate(mut acc: ArrayViewMut1<'_, f32>, grad: ArrayView1<'_, f32>) {
    debug_assert_eq!(acc.len(), grad.len());
    Zip::from(&mut acc).and(&grad).for_each(|a, &g| *a += g * g);
}

/// Divide `grad` elementwise by `beta + sqrt(acc)`.
#[inline]
pub fn scale(mut grad: ArrayViewMut1<'_, f32>, acc: ArrayView1<'_, f32>, beta: f32) {
    debug_assert_eq!(acc.len(), grad.len());
    Zip::from(&mut grad)
        .and(&acc)
        .for_each(|g, &a| *g /= beta + a.sqrt());
}

#[inline]
pub fn accumulate_scalar(acc: &mut f32, grad: f32) {
    *acc += grad * grad;
}

#[inline]
pub fn scale_scalar(grad: f32, acc: f32, beta: f32) -> f32 {
    grad / (beta + acc.sqrt())
}
