//! Latent-factor model data structure.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut1};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use super::AdaGradState;
use crate::data::{Interactions, ItemId, UserId};

/// Shape and initialization settings applied by [`FactorModel::reset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorInit {
    /// Latent dimension D shared by every user and item row.
    pub n_factors: usize,
    /// Keep a per-item bias term.
    pub use_bias: bool,
    /// Allocate AdaGrad accumulators.
    pub use_adagrad: bool,
    /// Latent entries are drawn uniformly from `[-init_scale, init_scale]`.
    pub init_scale: f32,
    /// Seed for the initialization RNG.
    pub seed: u64,
}

impl Default for FactorInit {
    fn default() -> Self {
        Self {
            n_factors: 10,
            use_bias: true,
            use_adagrad: true,
            init_scale: 0.1,
            seed: 42,
        }
    }
}

/// Matrix-factorization parameters (arena of fixed-size rows).
///
/// ```text
/// user_factors[[u, k]]  shape [n_users, n_factors]
/// item_factors[[i, k]]  shape [n_items, n_factors]
/// item_bias[i]          shape [n_items]          (only with bias term)
/// ```
///
/// Scores are `predict(u, i) = user_factors[u] · item_factors[i] + item_bias[i]`.
///
/// # Example
///
/// ```
/// use pairank::repr::FactorModel;
///
/// let mut model = FactorModel::zeros(1, 2, 2, true, false);
/// model.user_row_mut(0).assign(&ndarray::arr1(&[1.0, 2.0]));
/// model.item_row_mut(1).assign(&ndarray::arr1(&[0.5, 0.25]));
/// if let Some(b) = model.item_bias_mut(1) {
///     *b = 0.1;
/// }
///
/// assert!((model.predict(0, 1) - 1.1).abs() < 1e-6);
/// assert_eq!(model.predict(0, 0), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FactorModel {
    user_factors: Array2<f32>,
    item_factors: Array2<f32>,
    item_bias: Option<Array1<f32>>,
    adagrad: Option<AdaGradState>,
}

impl FactorModel {
    /// Zero-initialized model.
    pub fn zeros(
        n_users: usize,
        n_items: usize,
        n_factors: usize,
        use_bias: bool,
        use_adagrad: bool,
    ) -> Self {
        Self {
            user_factors: Array2::zeros((n_users, n_factors)),
            item_factors: Array2::zeros((n_items, n_factors)),
            item_bias: use_bias.then(|| Array1::zeros(n_items)),
            adagrad: use_adagrad.then(|| AdaGradState::zeros(n_users, n_items, n_factors)),
        }
    }

    /// Allocate and randomly initialize a model sized for `data`.
    pub fn new(data: &Interactions, init: &FactorInit) -> Self {
        let mut model = Self::zeros(0, 0, init.n_factors, init.use_bias, init.use_adagrad);
        model.reset(data, init);
        model
    }

    /// Replace every row with freshly initialized state sized for `data`.
    ///
    /// Latent rows are drawn from `U[-init_scale, init_scale]`; biases and
    /// accumulators start at zero.
    pub fn reset(&mut self, data: &Interactions, init: &FactorInit) {
        let n_users = data.n_users();
        let n_items = data.n_items();
        let k = init.n_factors;
        let scale = init.init_scale.abs();

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(init.seed);
        self.user_factors = Array2::from_shape_fn((n_users, k), |_| rng.gen_range(-scale..=scale));
        self.item_factors = Array2::from_shape_fn((n_items, k), |_| rng.gen_range(-scale..=scale));
        self.item_bias = init.use_bias.then(|| Array1::zeros(n_items));
        self.adagrad = init
            .use_adagrad
            .then(|| AdaGradState::zeros(n_users, n_items, k));
    }

    #[inline]
    pub fn n_users(&self) -> usize {
        self.user_factors.nrows()
    }

    #[inline]
    pub fn n_items(&self) -> usize {
        self.item_factors.nrows()
    }

    #[inline]
    pub fn n_factors(&self) -> usize {
        self.user_factors.ncols()
    }

    #[inline]
    pub fn has_bias(&self) -> bool {
        self.item_bias.is_some()
    }

    #[inline]
    pub fn has_adagrad(&self) -> bool {
        self.adagrad.is_some()
    }

    /// Predicted preference score of `user` for `item`.
    ///
    /// # Panics
    ///
    /// Panics if `user` or `item` is out of range.
    #[inline]
    pub fn predict(&self, user: UserId, item: ItemId) -> f32 {
        let dot = self.user_row(user as usize).dot(&self.item_row(item as usize));
        dot + self.item_bias(item as usize)
    }

    /// Checked variant of [`predict`](Self::predict).
    pub fn try_predict(&self, user: UserId, item: ItemId) -> Option<f32> {
        ((user as usize) < self.n_users() && (item as usize) < self.n_items())
            .then(|| self.predict(user, item))
    }

    // =========================================================================
    // Row access
    // =========================================================================

    #[inline]
    pub fn user_factors(&self) -> ArrayView2<'_, f32> {
        self.user_factors.view()
    }

    #[inline]
    pub fn item_factors(&self) -> ArrayView2<'_, f32> {
        self.item_factors.view()
    }

    /// Item biases, or `None` when the bias term is disabled.
    #[inline]
    pub fn item_biases(&self) -> Option<ArrayView1<'_, f32>> {
        self.item_bias.as_ref().map(|b| b.view())
    }

    #[inline]
    pub fn user_row(&self, user: usize) -> ArrayView1<'_, f32> {
        self.user_factors.row(user)
    }

    #[inline]
    pub fn item_row(&self, item: usize) -> ArrayView1<'_, f32> {
        self.item_factors.row(item)
    }

    /// Bias of `item` (0.0 when the bias term is disabled).
    #[inline]
    pub fn item_bias(&self, item: usize) -> f32 {
        self.item_bias.as_ref().map_or(0.0, |b| b[item])
    }

    #[inline]
    pub fn user_row_mut(&mut self, user: usize) -> ArrayViewMut1<'_, f32> {
        self.user_factors.row_mut(user)
    }

    #[inline]
    pub fn item_row_mut(&mut self, item: usize) -> ArrayViewMut1<'_, f32> {
        self.item_factors.row_mut(item)
    }

    #[inline]
    pub fn item_bias_mut(&mut self, item: usize) -> Option<&mut f32> {
        self.item_bias.as_mut().map(|b| &mut b[item])
    }

    #[inline]
    pub fn adagrad(&self) -> Option<&AdaGradState> {
        self.adagrad.as_ref()
    }

    #[inline]
    pub fn adagrad_mut(&mut self) -> Option<&mut AdaGradState> {
        self.adagrad.as_mut()
    }
}
