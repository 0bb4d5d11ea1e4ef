//! Per-user rated-item sets (CSR layout).

use std::hash::Hash;

use super::{DatasetError, IdMap, ItemId, UserId};

/// Implicit-feedback interactions.
///
/// Each user's rated items are stored contiguously, sorted ascending and
/// de-duplicated:
///
/// ```text
/// indices[indptr[u]..indptr[u + 1]] → items rated by user u
/// ```
///
/// A user whose row is empty has no recorded interaction set;
/// [`user_items`](Self::user_items) returns `None` for it.
///
/// # Example
///
/// ```
/// use pairank::data::Interactions;
///
/// let data = Interactions::from_pairs(2, 4, [(0, 1), (0, 0), (1, 3), (0, 1)]).unwrap();
///
/// assert_eq!(data.user_items(0), Some(&[0, 1][..]));
/// assert_eq!(data.user_items(1), Some(&[3][..]));
/// assert_eq!(data.n_interactions(), 3);
/// assert!(data.contains(1, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interactions {
    n_items: usize,
    /// Row offsets, length `n_users + 1`.
    indptr: Vec<usize>,
    /// Item ids, sorted within each row.
    indices: Vec<ItemId>,
}

/// Interactions built from external keys, with the id mappings used.
#[derive(Debug, Clone)]
pub struct KeyedInteractions<U, I> {
    pub interactions: Interactions,
    pub users: IdMap<U>,
    pub items: IdMap<I>,
}

impl Interactions {
    /// Build from `(user, item)` pairs over a fixed id universe.
    ///
    /// Duplicate pairs are collapsed. Users without any pair get an empty row.
    pub fn from_pairs<P>(n_users: usize, n_items: usize, pairs: P) -> Result<Self, DatasetError>
    where
        P: IntoIterator<Item = (UserId, ItemId)>,
    {
        let mut rows: Vec<Vec<ItemId>> = vec![Vec::new(); n_users];
        for (user, item) in pairs {
            if user as usize >= n_users {
                return Err(DatasetError::UserOutOfRange { user, n_users });
            }
            if item as usize >= n_items {
                return Err(DatasetError::ItemOutOfRange { item, n_items });
            }
            rows[user as usize].push(item);
        }

        let mut indptr = Vec::with_capacity(n_users + 1);
        let mut indices = Vec::new();
        indptr.push(0);
        for mut row in rows {
            row.sort_unstable();
            row.dedup();
            indices.extend_from_slice(&row);
            indptr.push(indices.len());
        }

        Ok(Self {
            n_items,
            indptr,
            indices,
        })
    }

    /// Build from CSR arrays (`indptr` of length `n_users + 1`).
    ///
    /// Rows need not be sorted; they are sorted and de-duplicated here.
    pub fn from_csr(
        n_items: usize,
        indptr: Vec<usize>,
        indices: Vec<ItemId>,
    ) -> Result<Self, DatasetError> {
        if indptr.first().copied().unwrap_or(1) != 0 {
            return Err(DatasetError::InvalidIndptr { position: 0 });
        }
        if let Some(position) = indptr.windows(2).position(|w| w[1] < w[0]) {
            return Err(DatasetError::InvalidIndptr {
                position: position + 1,
            });
        }
        let last = indptr[indptr.len() - 1];
        if last != indices.len() {
            return Err(DatasetError::IndptrLenMismatch {
                last,
                n_indices: indices.len(),
            });
        }
        if let Some(&item) = indices.iter().find(|&&i| i as usize >= n_items) {
            return Err(DatasetError::ItemOutOfRange { item, n_items });
        }

        let n_users = indptr.len() - 1;
        let pairs = (0..n_users).flat_map(|u| {
            indices[indptr[u]..indptr[u + 1]]
                .iter()
                .map(move |&i| (u as UserId, i))
        });
        Self::from_pairs(n_users, n_items, pairs)
    }

    /// Build from external keys, assigning dense ids in first-seen order.
    pub fn from_keyed<U, I, P>(pairs: P) -> Result<KeyedInteractions<U, I>, DatasetError>
    where
        U: Eq + Hash + Clone,
        I: Eq + Hash + Clone,
        P: IntoIterator<Item = (U, I)>,
    {
        let mut users = IdMap::new();
        let mut items = IdMap::new();
        let mut dense = Vec::new();
        for (user, item) in pairs {
            dense.push((users.get_or_insert(user)?, items.get_or_insert(item)?));
        }

        let interactions = Self::from_pairs(users.len(), items.len(), dense)?;
        Ok(KeyedInteractions {
            interactions,
            users,
            items,
        })
    }

    #[inline]
    pub fn n_users(&self) -> usize {
        self.indptr.len() - 1
    }

    #[inline]
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Total number of distinct (user, item) pairs.
    #[inline]
    pub fn n_interactions(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Sorted items rated by `user`.
    ///
    /// Returns `None` when the user is out of range or has no recorded
    /// interactions.
    #[inline]
    pub fn user_items(&self, user: UserId) -> Option<&[ItemId]> {
        let u = user as usize;
        if u >= self.n_users() {
            return None;
        }
        let row = &self.indices[self.indptr[u]..self.indptr[u + 1]];
        (!row.is_empty()).then_some(row)
    }

    /// Whether `user` rated `item`.
    #[inline]
    pub fn contains(&self, user: UserId, item: ItemId) -> bool {
        self.user_items(user)
            .is_some_and(|row| row.binary_search(&item).is_ok())
    }

    /// Row offsets (`n_users + 1` entries).
    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    /// Concatenated sorted item rows.
    pub fn indices(&self) -> &[ItemId] {
        &self.indices
    }
}
