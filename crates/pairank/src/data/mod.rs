//! Implicit-feedback interaction data.
//!
//! - [`Interactions`]: per-user rated-item sets over dense user/item ids
//! - [`IdMap`]: external key to dense id mapping
//! - [`DatasetError`]: construction/validation errors

mod ids;
mod interactions;

pub use ids::IdMap;
pub use interactions::{Interactions, KeyedInteractions};

/// Dense user identifier in `[0, n_users)`.
pub type UserId = u32;

/// Dense item identifier in `[0, n_items)`.
pub type ItemId = u32;

/// Dataset construction/validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    #[error("user id {user} out of range (n_users = {n_users})")]
    UserOutOfRange { user: UserId, n_users: usize },

    #[error("item id {item} out of range (n_items = {n_items})")]
    ItemOutOfRange { item: ItemId, n_items: usize },

    #[error("indptr must start at 0 and be non-decreasing (violated at position {position})")]
    InvalidIndptr { position: usize },

    #[error("indptr ends at {last} but there are {n_indices} indices")]
    IndptrLenMismatch { last: usize, n_indices: usize },

    #[error("too many distinct keys for a u32 id space")]
    IdOverflow,
}
