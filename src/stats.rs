//! Bucket-distribution summary of a table.

use std::fmt;

use crate::HashTable;

/// Snapshot of how evenly a table spreads its keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketStats {
    /// Number of buckets
    pub bucket_count: usize,
    /// Number of entries
    pub entries: usize,
    /// Buckets holding no entry
    pub empty_buckets: usize,
    /// Length of the longest chain
    pub max_bucket_size: usize,
    /// Entries per bucket
    pub load_factor: f64,
}

impl BucketStats {
    /// Takes the snapshot
    #[must_use]
    pub fn of<K, V, H>(table: &HashTable<K, V, H>) -> Self {
        Self {
            bucket_count: table.bucket_count(),
            entries: table.len(),
            empty_buckets: table.bucket_sizes().filter(|&size| size == 0).count(),
            max_bucket_size: table.max_bucket_size(),
            load_factor: table.load_factor(),
        }
    }

    /// Share of buckets that hold at least one entry, in `[0, 1]`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn occupancy(&self) -> f64 {
        let used = self.bucket_count.saturating_sub(self.empty_buckets);
        used as f64 / self.bucket_count.max(1) as f64
    }
}

impl fmt::Display for BucketStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries in {} buckets ({} empty), longest chain {}, load factor {:.3}",
            self.entries, self.bucket_count, self.empty_buckets, self.max_bucket_size, self.load_factor
        )
    }
}
