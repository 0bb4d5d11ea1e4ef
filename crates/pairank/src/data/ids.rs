//! External key to dense id mapping.

use std::collections::HashMap;
use std::hash::Hash;

use super::DatasetError;

/// Assigns dense `u32` ids to external keys in first-seen order.
///
/// # Example
///
/// ```
/// use pairank::data::IdMap;
///
/// let mut users = IdMap::new();
/// assert_eq!(users.get_or_insert("alice").unwrap(), 0);
/// assert_eq!(users.get_or_insert("bob").unwrap(), 1);
/// assert_eq!(users.get_or_insert("alice").unwrap(), 0);
/// assert_eq!(users.key(1), Some(&"bob"));
/// ```
#[derive(Debug, Clone)]
pub struct IdMap<K> {
    index: HashMap<K, u32>,
    keys: Vec<K>,
}

impl<K> Default for IdMap<K> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            keys: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> IdMap<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of `key`, assigning the next free id if it is new.
    pub fn get_or_insert(&mut self, key: K) -> Result<u32, DatasetError> {
        if let Some(&id) = self.index.get(&key) {
            return Ok(id);
        }
        let id = u32::try_from(self.keys.len()).map_err(|_| DatasetError::IdOverflow)?;
        self.index.insert(key.clone(), id);
        self.keys.push(key);
        Ok(id)
    }

    /// Id of an already-mapped key.
    #[inline]
    pub fn get(&self, key: &K) -> Option<u32> {
        self.index.get(key).copied()
    }

    /// External key for a dense id.
    #[inline]
    pub fn key(&self, id: u32) -> Option<&K> {
        self.keys.get(id as usize)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in id order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }
}
