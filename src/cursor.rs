//! Read-only cursor walking every entry of a [`HashTable`].
//!
//! A cursor is `(table, bucket, slot)`. It borrows the table it came from, so
//! the borrow checker rules out the stale-cursor case entirely: no structural
//! mutation can happen while a cursor into the table is alive.
//!
//! Positions past the end of a bucket are invalid. All invalid cursors compare
//! equal, which is what lets the recomputed [`HashTable::end`] and an exhausted
//! [`HashTable::begin`] meet even when they sit in different buckets.

use std::{fmt, iter::FusedIterator, ptr};

use log::warn;

use crate::{HashTable, entry::Entry, error::CursorError};

/// Position inside a [`HashTable`].
pub struct Cursor<'a, K, V, H> {
    /// Owning table; `None` for a detached cursor
    table: Option<&'a HashTable<K, V, H>>,
    /// Bucket index
    bucket: usize,
    /// Position inside the bucket's chain
    slot: usize,
}

impl<'a, K, V, H> Cursor<'a, K, V, H> {
    /// Cursor at `(bucket, slot)` of `table`
    pub(crate) const fn new(table: &'a HashTable<K, V, H>, bucket: usize, slot: usize) -> Self {
        Self { table: Some(table), bucket, slot }
    }

    /// A cursor bound to no table. Always invalid.
    #[must_use]
    pub const fn detached() -> Self {
        Self { table: None, bucket: 0, slot: 0 }
    }

    /// Bucket index of the position
    #[must_use]
    pub const fn bucket(&self) -> usize {
        self.bucket
    }

    /// Slot inside the bucket
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.slot
    }

    /// Entry under the cursor, or `None` if the cursor is invalid
    #[must_use]
    pub fn peek(&self) -> Option<&'a Entry<K, V>> {
        self.table?.chain(self.bucket)?.get(self.slot)
    }

    /// A cursor is valid when it is bound to a table, its bucket is in range and
    /// its slot is before the end of that bucket.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.peek().is_some()
    }

    /// The entry under the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::InvalidDereference`] if the cursor is invalid; a
    /// value is never made up.
    pub fn entry(&self) -> Result<&'a Entry<K, V>, CursorError> {
        self.peek().ok_or_else(|| {
            warn!("cursor: invalid dereference at bucket {} slot {}", self.bucket, self.slot);
            CursorError::InvalidDereference { bucket: self.bucket, slot: self.slot }
        })
    }

    /// Moves to the next entry.
    ///
    /// Within a bucket this steps one slot. At the end of a bucket it scans
    /// forward for the next non-empty bucket; when there is none the cursor stays
    /// at the end of its current bucket and is invalid from then on. Advancing
    /// an invalid cursor does nothing.
    pub fn advance(&mut self) {
        let Some(table) = self.table else {
            return;
        };
        if !self.is_valid() {
            return;
        }

        self.slot = self.slot.saturating_add(1);
        if table.chain(self.bucket).is_some_and(|chain| self.slot < chain.len()) {
            return;
        }

        let next = (self.bucket.saturating_add(1)..table.bucket_count())
            .find(|&bucket| table.chain(bucket).is_some_and(|chain| !chain.is_empty()));
        if let Some(bucket) = next {
            self.bucket = bucket;
            self.slot = 0;
        }
    }
}

impl<K, V, H> Default for Cursor<'_, K, V, H> {
    fn default() -> Self {
        Self::detached()
    }
}

impl<K, V, H> Clone for Cursor<'_, K, V, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, H> Copy for Cursor<'_, K, V, H> {}

impl<K, V, H> fmt::Debug for Cursor<'_, K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("attached", &self.table.is_some())
            .field("bucket", &self.bucket)
            .field("slot", &self.slot)
            .field("valid", &self.is_valid())
            .finish()
    }
}

impl<K, V, H> PartialEq for Cursor<'_, K, V, H> {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_valid(), other.is_valid()) {
            (false, false) => true,
            (true, true) => {
                let same_table = match (self.table, other.table) {
                    (Some(a), Some(b)) => ptr::eq(a, b),
                    _ => false,
                };
                same_table && self.bucket == other.bucket && self.slot == other.slot
            }
            _ => false,
        }
    }
}

impl<K, V, H> Eq for Cursor<'_, K, V, H> {}

impl<'a, K, V, H> Iterator for Cursor<'a, K, V, H> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.peek()?;
        self.advance();
        Some((&entry.key, &entry.value))
    }
}

impl<K, V, H> FusedIterator for Cursor<'_, K, V, H> {}

impl<'a, K, V, H> IntoIterator for &'a HashTable<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Cursor<'a, K, V, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.begin()
    }
}
