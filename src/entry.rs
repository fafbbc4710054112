//! Key/value pair stored in a bucket.

use std::fmt;

/// A key together with its associated value.
///
/// Lookups compare keys only; the value never takes part in equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    /// The key of the pair
    pub key: K,
    /// The value associated with the key
    pub value: V,
}

impl<K, V> Entry<K, V> {
    /// Creates an entry from a key and a value
    #[must_use]
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Creates an entry for `key` holding a default-constructed value
    #[must_use]
    pub fn with_key(key: K) -> Self
    where
        V: Default,
    {
        Self { key, value: V::default() }
    }

    /// Splits the entry back into its parts
    #[must_use]
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.value)
    }
}
