//! Epoch driver and pairwise update for BPR.

use ndarray::{Array1, Zip};
use rand::Rng;

use super::{BprParams, ConfigError};
use crate::data::{Interactions, ItemId, UserId};
use crate::repr::FactorModel;
use crate::training::adagrad::{accumulate, accumulate_scalar, scale, scale_scalar};
use crate::training::{NegativeSampler, PairwiseLoss, SamplingError};

/// Preference label of every implicit-feedback pair: the observed item is
/// preferred over the sampled one.
pub const POSITIVE_PREFERENCE: f32 = 1.0;

// ============================================================================
// Errors and statistics
// ============================================================================

/// Training errors. Each one aborts the run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrainError {
    #[error("user {user} has no recorded interactions")]
    MissingInteractions { user: UserId },

    #[error("user id {user} out of range (n_users = {n_users})")]
    UserOutOfRange { user: UserId, n_users: usize },

    #[error("item id {item} out of range (n_items = {n_items})")]
    ItemOutOfRange { item: ItemId, n_items: usize },

    #[error("dataset has {dataset} {what} but the model has {model}")]
    ShapeMismatch {
        what: &'static str,
        dataset: usize,
        model: usize,
    },

    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

/// Summary of one epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EpochStats {
    /// Number of pairwise updates performed.
    pub n_pairs: usize,
    /// Sum of pairwise losses, each measured before its update.
    pub loss_sum: f64,
}

impl EpochStats {
    /// Mean pre-update pairwise loss (`NaN` for an empty epoch).
    pub fn mean_loss(&self) -> f64 {
        if self.n_pairs == 0 {
            f64::NAN
        } else {
            self.loss_sum / self.n_pairs as f64
        }
    }
}

// ============================================================================
// Triple generation
// ============================================================================

/// Visit the `(user, positive, negative)` triples of one epoch.
///
/// Users are visited in ascending id order, their rated items in ascending
/// order, and `n_negatives` negatives are drawn per rated item. Negatives for
/// one rated item are all drawn before `f` sees the first of them.
///
/// # Errors
///
/// - [`TrainError::MissingInteractions`] for a user without recorded
///   interactions (the user is never skipped)
/// - [`TrainError::Sampling`] when a negative cannot be drawn
/// - any error returned by `f`
pub fn for_each_training_triple<R, F>(
    data: &Interactions,
    sampler: &NegativeSampler,
    n_negatives: u32,
    rng: &mut R,
    mut f: F,
) -> Result<(), TrainError>
where
    R: Rng + ?Sized,
    F: FnMut(UserId, ItemId, ItemId) -> Result<(), TrainError>,
{
    let mut negatives: Vec<ItemId> = Vec::with_capacity(n_negatives as usize);

    for u in 0..data.n_users() {
        let user = u as UserId;
        let rated = data
            .user_items(user)
            .ok_or(TrainError::MissingInteractions { user })?;

        for &positive in rated {
            negatives.clear();
            for _ in 0..n_negatives {
                negatives.push(sampler.sample_negative(rated, rng)?);
            }
            for &negative in &negatives {
                f(user, positive, negative)?;
            }
        }
    }
    Ok(())
}

// ============================================================================
// Gradient scratch
// ============================================================================

/// Reusable per-pair gradient buffers (one row each).
#[derive(Debug, Clone, Default)]
struct PairGradients {
    user: Array1<f32>,
    positive: Array1<f32>,
    negative: Array1<f32>,
}

impl PairGradients {
    fn ensure_len(&mut self, n_factors: usize) {
        if self.user.len() != n_factors {
            self.user = Array1::zeros(n_factors);
            self.positive = Array1::zeros(n_factors);
            self.negative = Array1::zeros(n_factors);
        }
    }
}

// ============================================================================
// BprTrainer
// ============================================================================

/// Pairwise-ranking matrix factorization trainer.
///
/// Operates on a caller-owned [`FactorModel`]; the model decides whether bias
/// terms and AdaGrad accumulators exist, the trainer decides how far each
/// update moves.
///
/// # Example
///
/// ```
/// use pairank::data::Interactions;
/// use pairank::repr::{FactorInit, FactorModel};
/// use pairank::training::{BprParams, BprTrainer, LogisticLoss};
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256PlusPlus;
///
/// let data = Interactions::from_pairs(2, 4, [(0, 0), (0, 1), (1, 2), (1, 3)]).unwrap();
/// let mut model = FactorModel::new(&data, &FactorInit::default());
/// let mut trainer = BprTrainer::new(LogisticLoss, BprParams::default());
/// let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
///
/// let stats = trainer.train_one_iteration(&mut model, &data, &mut rng).unwrap();
/// assert_eq!(stats.n_pairs, 4 * 5);
/// ```
#[derive(Debug, Clone)]
pub struct BprTrainer<L: PairwiseLoss> {
    loss: L,
    params: BprParams,
    grads: PairGradients,
}

impl<L: PairwiseLoss> BprTrainer<L> {
    pub fn new(loss: L, params: BprParams) -> Self {
        Self {
            loss,
            params,
            grads: PairGradients::default(),
        }
    }

    #[inline]
    pub fn params(&self) -> &BprParams {
        &self.params
    }

    #[inline]
    pub fn loss(&self) -> &L {
        &self.loss
    }

    /// Run one epoch over `data`, updating `model` in place.
    ///
    /// # Errors
    ///
    /// Fails on dataset/model shape mismatch, on a user without recorded
    /// interactions, or when negative sampling is exhausted. Updates applied
    /// before the failure are kept.
    pub fn train_one_iteration<R: Rng + ?Sized>(
        &mut self,
        model: &mut FactorModel,
        data: &Interactions,
        rng: &mut R,
    ) -> Result<EpochStats, TrainError> {
        check_shapes(model, data)?;

        let sampler = NegativeSampler::new(data.n_items(), self.params.max_negative_draws);
        let n_negatives = self.params.n_negatives;
        let mut stats = EpochStats::default();

        for_each_training_triple(data, &sampler, n_negatives, rng, |user, pos, neg| {
            let loss = self.train_one_pair(model, user, pos, neg, POSITIVE_PREFERENCE)?;
            stats.n_pairs += 1;
            stats.loss_sum += f64::from(loss);
            Ok(())
        })?;

        Ok(stats)
    }

    /// One stochastic update on the pair (`positive` preferred over `negative`).
    ///
    /// All gradients are computed from the parameters as they are before the
    /// call; AdaGrad accumulators are updated and applied next; parameters are
    /// moved last. Returns the pairwise loss measured before the update.
    ///
    /// # Errors
    ///
    /// Out-of-range ids are rejected before anything is modified.
    pub fn train_one_pair(
        &mut self,
        model: &mut FactorModel,
        user: UserId,
        positive: ItemId,
        negative: ItemId,
        label: f32,
    ) -> Result<f32, TrainError> {
        check_user(model, user)?;
        check_item(model, positive)?;
        check_item(model, negative)?;

        let (u, i, j) = (user as usize, positive as usize, negative as usize);
        let BprParams {
            learning_rate,
            beta,
            lambda,
            penalty,
            ..
        } = self.params;

        let margin = model.predict(user, positive) - model.predict(user, negative);
        let g = self.loss.gradient(margin, label);
        let loss = self.loss.loss(margin, label);

        // Raw gradients from pre-update parameters.
        let use_bias = model.has_bias();
        let (mut pos_bias_grad, mut neg_bias_grad) = if use_bias {
            (
                g + penalty.gradient(lambda, model.item_bias(i)),
                -g + penalty.gradient(lambda, model.item_bias(j)),
            )
        } else {
            (0.0, 0.0)
        };

        self.grads.ensure_len(model.n_factors());
        let PairGradients {
            user: user_grad,
            positive: pos_grad,
            negative: neg_grad,
        } = &mut self.grads;

        Zip::from(&mut *user_grad)
            .and(&mut *pos_grad)
            .and(&mut *neg_grad)
            .and(model.user_row(u))
            .and(model.item_row(i))
            .and(model.item_row(j))
            .for_each(|ug, ig, jg, &wu, &wi, &wj| {
                *ug = g * (wi - wj) + penalty.gradient(lambda, wu);
                *ig = g * wu + penalty.gradient(lambda, wi);
                *jg = -g * wu + penalty.gradient(lambda, wj);
            });

        // AdaGrad: accumulate everything, then scale each gradient by its own entry.
        if let Some(state) = model.adagrad_mut() {
            if use_bias {
                accumulate_scalar(state.item_bias_mut(i), pos_bias_grad);
                accumulate_scalar(state.item_bias_mut(j), neg_bias_grad);
                pos_bias_grad = scale_scalar(pos_bias_grad, state.item_bias()[i], beta);
                neg_bias_grad = scale_scalar(neg_bias_grad, state.item_bias()[j], beta);
            }

            accumulate(state.user_row_mut(u), user_grad.view());
            accumulate(state.item_row_mut(i), pos_grad.view());
            accumulate(state.item_row_mut(j), neg_grad.view());

            scale(user_grad.view_mut(), state.user_row(u), beta);
            scale(pos_grad.view_mut(), state.item_row(i), beta);
            scale(neg_grad.view_mut(), state.item_row(j), beta);
        }

        // Apply.
        if let Some(b) = model.item_bias_mut(i) {
            *b -= learning_rate * pos_bias_grad;
        }
        if let Some(b) = model.item_bias_mut(j) {
            *b -= learning_rate * neg_bias_grad;
        }
        model.user_row_mut(u).scaled_add(-learning_rate, &*user_grad);
        model.item_row_mut(i).scaled_add(-learning_rate, &*pos_grad);
        model.item_row_mut(j).scaled_add(-learning_rate, &*neg_grad);

        Ok(loss)
    }
}

fn check_shapes(model: &FactorModel, data: &Interactions) -> Result<(), TrainError> {
    if data.n_users() != model.n_users() {
        return Err(TrainError::ShapeMismatch {
            what: "users",
            dataset: data.n_users(),
            model: model.n_users(),
        });
    }
    if data.n_items() != model.n_items() {
        return Err(TrainError::ShapeMismatch {
            what: "items",
            dataset: data.n_items(),
            model: model.n_items(),
        });
    }
    Ok(())
}

#[inline]
fn check_user(model: &FactorModel, user: UserId) -> Result<(), TrainError> {
    if (user as usize) < model.n_users() {
        Ok(())
    } else {
        Err(TrainError::UserOutOfRange {
            user,
            n_users: model.n_users(),
        })
    }
}

#[inline]
fn check_item(model: &FactorModel, item: ItemId) -> Result<(), TrainError> {
    if (item as usize) < model.n_items() {
        Ok(())
    } else {
        Err(TrainError::ItemOutOfRange {
            item,
            n_items: model.n_items(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
