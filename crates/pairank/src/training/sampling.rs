//! Negative item sampling.
//!
//! Negatives are drawn uniformly from the whole item universe and redrawn while
//! they hit the user's own rated set (rejection sampling). The expected number
//! of draws is `n_items / (n_items - n_rated)`, so users who rated nearly every
//! item get expensive. Draws are capped at `max_draws`; hitting the cap yields
//! [`SamplingError::Exhausted`] instead of looping forever.
//!
//! # Example
//!
//! ```
//! use pairank::training::NegativeSampler;
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256PlusPlus;
//!
//! let sampler = NegativeSampler::new(10, 1000);
//! let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
//! let rated = [1, 4, 7];
//! let item = sampler.sample_negative(&rated, &mut rng).unwrap();
//! assert!(!rated.contains(&item));
//! ```

use rand::Rng;

use crate::data::ItemId;

/// Negative sampling failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SamplingError {
    #[error(
        "no negative item found after {attempts} draws ({n_rated} of {n_items} items rated)"
    )]
    Exhausted {
        n_rated: usize,
        n_items: usize,
        attempts: u32,
    },
}

/// Uniform rejection sampler over `[0, n_items)`.
///
/// Stateless between calls: each draw depends only on the rated set passed in
/// and the caller's RNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegativeSampler {
    n_items: usize,
    max_draws: u32,
}

impl NegativeSampler {
    /// Create a sampler over `n_items` items trying at most `max_draws` times
    /// per negative (at least once).
    pub fn new(n_items: usize, max_draws: u32) -> Self {
        Self {
            n_items,
            max_draws: max_draws.max(1),
        }
    }

    #[inline]
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    #[inline]
    pub fn max_draws(&self) -> u32 {
        self.max_draws
    }

    /// Draw an item that is not in `rated`.
    ///
    /// `rated` must be sorted ascending, de-duplicated and within
    /// `[0, n_items)`, as rows of [`Interactions`](crate::data::Interactions)
    /// are.
    pub fn sample_negative<R: Rng + ?Sized>(
        &self,
        rated: &[ItemId],
        rng: &mut R,
    ) -> Result<ItemId, SamplingError> {
        debug_assert!(rated.windows(2).all(|w| w[0] < w[1]));

        if rated.len() >= self.n_items {
            return Err(SamplingError::Exhausted {
                n_rated: rated.len(),
                n_items: self.n_items,
                attempts: 0,
            });
        }

        for _ in 0..self.max_draws {
            let item = rng.gen_range(0..self.n_items) as ItemId;
            if rated.binary_search(&item).is_err() {
                return Ok(item);
            }
        }

        Err(SamplingError::Exhausted {
            n_rated: rated.len(),
            n_items: self.n_items,
            attempts: self.max_draws,
        })
    }
}
