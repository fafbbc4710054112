//! Convenience traits over [`HashTable`]

use crate::HashTable;
use std::{
    borrow::Borrow,
    hash::{BuildHasher, Hash},
};

/// Extension trait providing owned snapshots and a boolean membership test
pub trait TableExtensions<K, V> {
    /// Returns the keys in iteration order as a Vec
    fn keys(&self) -> Vec<K>;

    /// Returns the values in iteration order as a Vec
    fn values(&self) -> Vec<V>;

    /// Returns true if the table contains the given key
    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;
}

impl<K, V, H> TableExtensions<K, V> for HashTable<K, V, H>
where
    K: Eq + Hash + Clone,
    V: Clone,
    H: BuildHasher + Clone,
{
    fn keys(&self) -> Vec<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.includes(key).is_valid()
    }
}
