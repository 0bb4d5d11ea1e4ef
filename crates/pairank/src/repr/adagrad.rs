//! AdaGrad accumulator storage.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut1};

/// Running sums of squared gradients, one entry per model parameter.
///
/// Shapes mirror [`FactorModel`](super::FactorModel):
///
/// ```text
/// user[[u, k]]   ↔ user_factors[[u, k]]
/// item[[i, k]]   ↔ item_factors[[i, k]]
/// item_bias[i]   ↔ item_bias[i]
/// ```
///
/// Every entry starts at zero and only ever grows; the whole state is
/// replaced when the model is reset.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaGradState {
    user: Array2<f32>,
    item: Array2<f32>,
    item_bias: Array1<f32>,
}

impl AdaGradState {
    pub fn zeros(n_users: usize, n_items: usize, n_factors: usize) -> Self {
        Self {
            user: Array2::zeros((n_users, n_factors)),
            item: Array2::zeros((n_items, n_factors)),
            item_bias: Array1::zeros(n_items),
        }
    }

    #[inline]
    pub fn user(&self) -> ArrayView2<'_, f32> {
        self.user.view()
    }

    #[inline]
    pub fn item(&self) -> ArrayView2<'_, f32> {
        self.item.view()
    }

    #[inline]
    pub fn item_bias(&self) -> ArrayView1<'_, f32> {
        self.item_bias.view()
    }

    #[inline]
    pub fn user_row(&self, user: usize) -> ArrayView1<'_, f32> {
        self.user.row(user)
    }

    #[inline]
    pub fn item_row(&self, item: usize) -> ArrayView1<'_, f32> {
        self.item.row(item)
    }

    #[inline]
    pub fn user_row_mut(&mut self, user: usize) -> ArrayViewMut1<'_, f32> {
        self.user.row_mut(user)
    }

    #[inline]
    pub fn item_row_mut(&mut self, item: usize) -> ArrayViewMut1<'_, f32> {
        self.item.row_mut(item)
    }

    #[inline]
    pub fn item_bias_mut(&mut self, item: usize) -> &mut f32 {
        &mut self.item_bias[item]
    }
}
