//! Sequence container holding the chain of entries for one bucket index.

use std::borrow::Borrow;

use crate::entry::Entry;

/// An ordered chain of entries.
///
/// The chain itself tolerates duplicate keys; uniqueness is maintained by
/// `HashTable`, which always searches before appending.
#[derive(Debug, Clone)]
pub(crate) struct Bucket<K, V> {
    /// Entries in insertion order
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<K, V> Bucket<K, V> {
    /// Number of entries in the chain
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the chain holds no entries
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `slot`, if the slot is before the end of the chain
    pub(crate) fn get(&self, slot: usize) -> Option<&Entry<K, V>> {
        self.entries.get(slot)
    }

    /// Mutable entry at `slot`
    pub(crate) fn get_mut(&mut self, slot: usize) -> Option<&mut Entry<K, V>> {
        self.entries.get_mut(slot)
    }

    /// Iterates the chain front to back
    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Entry<K, V>> {
        self.entries.iter()
    }

    /// Appends an entry and returns its slot
    pub(crate) fn push(&mut self, entry: Entry<K, V>) -> usize {
        let slot = self.entries.len();
        self.entries.push(entry);
        slot
    }

    /// Removes the entry at `slot`, keeping the order of the remaining entries
    pub(crate) fn remove_at(&mut self, slot: usize) -> Option<Entry<K, V>> {
        (slot < self.entries.len()).then(|| self.entries.remove(slot))
    }

    /// Removes and returns the last entry
    pub(crate) fn pop_back(&mut self) -> Option<Entry<K, V>> {
        self.entries.pop()
    }

    /// Value for `key`, appending a default-valued entry first if the key is absent
    #[allow(clippy::indexing_slicing)]
    pub(crate) fn value_or_insert_default(&mut self, key: K) -> &mut V
    where
        K: Eq,
        V: Default,
    {
        let slot = match self.position(&key) {
            Some(slot) => slot,
            None => self.push(Entry::with_key(key)),
        };
        // `slot` is either a found position or the one just pushed
        &mut self.entries[slot].value
    }

    /// Drops every entry
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Linear search by key; the slot of the matching entry
    pub(crate) fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries.iter().position(|entry| entry.key.borrow() == key)
    }
}
