use std::{
    borrow::Borrow,
    fmt::Display,
    hash::{BuildHasher, Hash},
    io::{self, Write},
    mem,
};

use log::{debug, trace};

use crate::{
    bucket::Bucket, cursor::Cursor, entry::Entry, hashers::DefaultHashBuilder, primes::prime_below,
};

/// Smallest bucket count a table is ever built with
pub const MIN_BUCKETS: usize = 2;

/// How a requested bucket estimate becomes the actual bucket count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sizing {
    /// Round the estimate down to the nearest prime
    #[default]
    Primed,
    /// Use the estimate as given
    Exact,
}

impl Sizing {
    /// Turns a bucket estimate into a bucket count: clamp to [`MIN_BUCKETS`], then
    /// optionally prime
    #[must_use]
    pub fn bucket_count(self, estimate: usize) -> usize {
        let clamped = estimate.max(MIN_BUCKETS);
        match self {
            Self::Primed => prime_below(clamped),
            Self::Exact => clamped,
        }
    }
}

/// A separate-chaining hash table with table and associative-array access.
///
/// Every key lives in exactly one bucket, `hash(key) mod bucket_count`, and appears
/// at most once in the whole table. The bucket count only changes through
/// [`HashTable::rehash`]; there is no automatic growth.
///
/// The table is not `Clone`. Duplicating one is an explicit
/// [`HashTable::duplicate`]; exchanging state is [`HashTable::swap`].
///
/// Note: This implementation is not thread-safe. Callers serialize access.
#[derive(Debug)]
pub struct HashTable<K, V, H = DefaultHashBuilder> {
    /// Number of buckets, always equal to `buckets.len()` and at least [`MIN_BUCKETS`]
    bucket_count: usize,
    /// The chains, indexed by bucket number
    buckets: Vec<Bucket<K, V>>,
    /// Hash strategy, cloned into every table built by `rehash`
    hasher: H,
}

impl<K, V> HashTable<K, V>
where
    K: Eq + Hash,
{
    /// Creates a table with the default hash strategy and a primed bucket count
    #[must_use]
    pub fn new(bucket_estimate: usize) -> Self {
        Self::with_hasher_and_sizing(bucket_estimate, DefaultHashBuilder::default(), Sizing::Primed)
    }
}

impl<K, V, H> HashTable<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher + Clone + Default,
{
    /// Creates a table with a default-constructed hash strategy
    #[must_use]
    pub fn with_sizing(bucket_estimate: usize, sizing: Sizing) -> Self {
        Self::with_hasher_and_sizing(bucket_estimate, H::default(), sizing)
    }
}

impl<K, V, H> HashTable<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher + Clone,
{
    /// Creates a table using `hasher` and a primed bucket count
    #[must_use]
    pub fn with_hasher(bucket_estimate: usize, hasher: H) -> Self {
        Self::with_hasher_and_sizing(bucket_estimate, hasher, Sizing::Primed)
    }

    /// Creates a table using `hasher`, sizing the bucket array as `sizing` says
    #[must_use]
    pub fn with_hasher_and_sizing(bucket_estimate: usize, hasher: H, sizing: Sizing) -> Self {
        let bucket_count = sizing.bucket_count(bucket_estimate);
        debug!("hash table: {bucket_estimate} buckets requested, {bucket_count} allocated");

        let mut buckets = Vec::with_capacity(bucket_count);
        buckets.resize_with(bucket_count, Bucket::default);

        Self { bucket_count, buckets, hasher }
    }

    /// Bucket index of a key
    fn index<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        let hash = self.hasher.hash_one(key);
        let count = u64::try_from(self.bucket_count).unwrap_or(u64::MAX);
        // The remainder is below `bucket_count`, so it always fits a usize
        usize::try_from(hash.checked_rem(count).unwrap_or(0)).unwrap_or(0)
    }

    /// Upserts and reports where the entry ended up as `(bucket, slot)`
    fn upsert(&mut self, key: K, value: V) -> (usize, usize) {
        let bucket = self.index(&key);
        let slot = match self.buckets.get_mut(bucket) {
            Some(chain) => match chain.position(&key) {
                Some(slot) => {
                    if let Some(entry) = chain.get_mut(slot) {
                        entry.value = value;
                    }
                    slot
                }
                None => chain.push(Entry::new(key, value)),
            },
            None => 0,
        };
        (bucket, slot)
    }

    /// Inserts `key` with `value`, overwriting the value if the key is already
    /// present, and returns a cursor at the entry.
    ///
    /// A duplicate key never creates a second entry.
    pub fn insert(&mut self, key: K, value: V) -> Cursor<'_, K, V, H> {
        let (bucket, slot) = self.upsert(key, value);
        Cursor::new(self, bucket, slot)
    }

    /// Removes the entry for `key`. Returns false if the key was absent.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = self.index(key);
        self.buckets
            .get_mut(bucket)
            .and_then(|chain| chain.position(key).and_then(|slot| chain.remove_at(slot)))
            .is_some()
    }

    /// Copies the value for `key` into `out`.
    ///
    /// Returns false and leaves `out` untouched if the key is absent.
    pub fn retrieve<Q>(&self, key: &Q, out: &mut V) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let bucket = self.index(key);
        let found = self
            .buckets
            .get(bucket)
            .and_then(|chain| chain.position(key).and_then(|slot| chain.get(slot)));
        match found {
            Some(entry) => {
                out.clone_from(&entry.value);
                true
            }
            None => false,
        }
    }

    /// Returns a cursor at the entry for `key`, or [`HashTable::end`] if absent
    #[must_use]
    pub fn includes<Q>(&self, key: &Q) -> Cursor<'_, K, V, H>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = self.index(key);
        match self.buckets.get(bucket).and_then(|chain| chain.position(key)) {
            Some(slot) => Cursor::new(self, bucket, slot),
            None => self.end(),
        }
    }

    /// Returns a mutable reference to the value for `key`.
    ///
    /// This is not a pure read: if `key` is absent it is inserted with
    /// `V::default()` first.
    #[allow(clippy::indexing_slicing)]
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let bucket = self.index(&key);
        // `index` is always below `bucket_count`, which is `buckets.len()`
        self.buckets[bucket].value_or_insert_default(key)
    }

    /// Stores `value` for `key`; the same as assigning through
    /// [`HashTable::get_or_insert_default`]
    pub fn put(&mut self, key: K, value: V)
    where
        V: Default,
    {
        *self.get_or_insert_default(key) = value;
    }

    /// Rebuilds the table with a new bucket count.
    ///
    /// `bucket_estimate == 0` means "use the current number of entries". The new
    /// count is always primed, whatever sizing the table was built with. Entry
    /// count and every key's value are unchanged.
    pub fn rehash(&mut self, bucket_estimate: usize) {
        let estimate = if bucket_estimate == 0 { self.len() } else { bucket_estimate };
        let mut fresh = Self::with_hasher_and_sizing(estimate, self.hasher.clone(), Sizing::Primed);
        debug!(
            "hash table: rehashing {} entries from {} to {} buckets",
            self.len(),
            self.bucket_count,
            fresh.bucket_count
        );

        // Drain as we go so the old chains shrink while the new ones grow
        for chain in &mut self.buckets {
            while let Some(entry) = chain.pop_back() {
                let (key, value) = entry.into_parts();
                fresh.upsert(key, value);
            }
        }

        mem::swap(&mut self.bucket_count, &mut fresh.bucket_count);
        mem::swap(&mut self.buckets, &mut fresh.buckets);
    }

    /// Deep copy: same bucket count, same hash strategy, same chains
    #[must_use]
    pub fn duplicate(&self) -> Self
    where
        K: Clone,
        V: Clone,
    {
        Self {
            bucket_count: self.bucket_count,
            buckets: self.buckets.clone(),
            hasher: self.hasher.clone(),
        }
    }
}

impl<K, V, H> HashTable<K, V, H> {
    /// Empties every bucket. The bucket count is unchanged.
    pub fn clear(&mut self) {
        trace!("hash table: clearing {} buckets", self.bucket_count);
        for chain in &mut self.buckets {
            chain.clear();
        }
    }

    /// Number of entries; walks every bucket
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }

    /// Returns true if every bucket is empty; stops at the first non-empty one
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Bucket::is_empty)
    }

    /// Cursor at the first entry of the first non-empty bucket.
    ///
    /// For an empty table this is the end of bucket 0, an invalid cursor equal
    /// to [`HashTable::end`].
    #[must_use]
    pub fn begin(&self) -> Cursor<'_, K, V, H> {
        match self.buckets.iter().position(|chain| !chain.is_empty()) {
            Some(bucket) => Cursor::new(self, bucket, 0),
            None => Cursor::new(self, 0, 0),
        }
    }

    /// Cursor one past the last entry of the last non-empty bucket.
    ///
    /// Recomputed on every call in O(bucket count): buckets empty out
    /// independently through `remove`, so no sentinel is cached. A loop that
    /// does not mutate the table may hoist the value.
    #[must_use]
    pub fn end(&self) -> Cursor<'_, K, V, H> {
        let bucket = self.buckets.iter().rposition(|chain| !chain.is_empty()).unwrap_or(0);
        let slot = self.buckets.get(bucket).map_or(0, Bucket::len);
        Cursor::new(self, bucket, slot)
    }

    /// Iterates all entries, buckets in index order and each bucket in insertion
    /// order
    #[must_use]
    pub fn iter(&self) -> Cursor<'_, K, V, H> {
        self.begin()
    }

    /// Number of buckets
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// Chain lengths in bucket order
    pub fn bucket_sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(Bucket::len)
    }

    /// Length of the longest chain
    #[must_use]
    pub fn max_bucket_size(&self) -> usize {
        self.bucket_sizes().max().unwrap_or(0)
    }

    /// Entries per bucket
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.bucket_count as f64
    }

    /// Hash strategy of this table
    #[must_use]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Exchanges the complete state of two tables in O(1)
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Writes every bucket, empty ones included, as
    /// `b[i]:` followed by a tab-separated `key:value` per entry.
    ///
    /// `key_width` and `value_width` right-align the fields. Diagnostic output
    /// only; it is not a reload format.
    ///
    /// # Errors
    ///
    /// Propagates write failures of `sink`.
    pub fn dump<W>(&self, sink: &mut W, key_width: usize, value_width: usize) -> io::Result<()>
    where
        W: Write + ?Sized,
        K: Display,
        V: Display,
    {
        self.dump_with(sink, |key, value| format!("{key:>key_width$}:{value:>value_width$}"))
    }

    /// Like [`HashTable::dump`], rendering each entry with `render`.
    ///
    /// # Errors
    ///
    /// Propagates write failures of `sink`.
    pub fn dump_with<W, F>(&self, sink: &mut W, mut render: F) -> io::Result<()>
    where
        W: Write + ?Sized,
        F: FnMut(&K, &V) -> String,
    {
        for (index, chain) in self.buckets.iter().enumerate() {
            write!(sink, "b[{index}]:")?;
            for entry in chain.iter() {
                write!(sink, "\t{}", render(&entry.key, &entry.value))?;
            }
            writeln!(sink)?;
        }
        Ok(())
    }

    /// Chain at `bucket`
    pub(crate) fn chain(&self, bucket: usize) -> Option<&Bucket<K, V>> {
        self.buckets.get(bucket)
    }
}

impl<K, V, H> Extend<(K, V)> for HashTable<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.upsert(key, value);
        }
    }
}

impl<K, V, H> FromIterator<(K, V)> for HashTable<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher + Clone + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut table = Self::with_sizing(iter.size_hint().0, Sizing::Primed);
        table.extend(iter);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashers::Fnv1aBuilder;
    use proptest::prelude::*;
    use std::collections::{BTreeMap, HashMap};
    use std::hash::{BuildHasherDefault, Hasher};

    /// Places integer keys in bucket `key mod bucket_count`.
    #[derive(Default)]
    struct IdentityHasher(u64);

    impl Hasher for IdentityHasher {
        fn finish(&self) -> u64 {
            self.0
        }

        fn write(&mut self, bytes: &[u8]) {
            for &byte in bytes {
                self.0 = (self.0 << 8) | u64::from(byte);
            }
        }

        fn write_u64(&mut self, i: u64) {
            self.0 = i;
        }
    }

    type Identity = BuildHasherDefault<IdentityHasher>;

    /// Sends every key to bucket 0.
    #[derive(Default)]
    struct ConstHasher;

    impl Hasher for ConstHasher {
        fn finish(&self) -> u64 {
            0
        }

        fn write(&mut self, _bytes: &[u8]) {}
    }

    fn string_table(estimate: usize) -> HashTable<String, i32> {
        HashTable::new(estimate)
    }

    #[test]
    fn test_sizing_clamps_and_primes() {
        assert_eq!(Sizing::Primed.bucket_count(0), 2);
        assert_eq!(Sizing::Primed.bucket_count(1), 2);
        assert_eq!(Sizing::Primed.bucket_count(5), 5);
        assert_eq!(Sizing::Primed.bucket_count(100), 97);
        assert_eq!(Sizing::Exact.bucket_count(0), 2);
        assert_eq!(Sizing::Exact.bucket_count(100), 100);

        assert_eq!(string_table(10).bucket_count(), 7);
        let exact: HashTable<String, i32> = HashTable::with_sizing(10, Sizing::Exact);
        assert_eq!(exact.bucket_count(), 10);
        let custom: HashTable<String, i32, Fnv1aBuilder> =
            HashTable::with_hasher_and_sizing(1, Fnv1aBuilder::default(), Sizing::Exact);
        assert_eq!(custom.bucket_count(), 2);
    }

    #[test]
    fn test_fresh_table_is_empty() {
        let table = string_table(11);
        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
        assert!(table.begin() == table.end());
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn test_insert_is_upsert() {
        let mut table = string_table(11);
        table.insert("key1".to_string(), 1);
        assert_eq!(table.len(), 1);

        let cursor = table.insert("key1".to_string(), 10);
        assert_eq!(cursor.entry().map(|e| e.value), Ok(10));
        assert_eq!(table.len(), 1);

        let mut out = 0;
        assert!(table.retrieve("key1", &mut out));
        assert_eq!(out, 10);
    }

    #[test]
    fn test_insert_returns_cursor_at_entry() {
        let mut table = string_table(11);
        table.insert("a".to_string(), 1);
        let cursor = table.insert("b".to_string(), 2);
        let entry = cursor.entry().map(Clone::clone);
        assert_eq!(entry, Ok(Entry::new("b".to_string(), 2)));
        assert!(table.includes("b") == table.includes("b"));
    }

    #[test]
    fn test_remove() {
        let mut table = string_table(11);
        table.insert("key1".to_string(), 1);
        table.insert("key2".to_string(), 2);

        assert!(!table.remove("missing"));
        assert_eq!(table.len(), 2);

        assert!(table.remove("key1"));
        assert!(!table.remove("key1"));
        assert_eq!(table.len(), 1);
        assert!(table.includes("key1") == table.end());
        assert!(table.includes("key2").is_valid());
    }

    #[test]
    fn test_retrieve_leaves_out_untouched_when_absent() {
        let mut table = string_table(11);
        table.insert("present".to_string(), 5);

        let mut out = -1;
        assert!(!table.retrieve("absent", &mut out));
        assert_eq!(out, -1);
        assert!(table.retrieve("present", &mut out));
        assert_eq!(out, 5);
    }

    #[test]
    fn test_get_or_insert_default_vivifies() {
        let mut table = string_table(11);
        assert!(!table.includes("x").is_valid());

        assert_eq!(*table.get_or_insert_default("x".to_string()), 0);
        assert!(table.includes("x").is_valid());
        assert_eq!(table.len(), 1);

        *table.get_or_insert_default("x".to_string()) += 4;
        let mut out = 0;
        assert!(table.retrieve("x", &mut out));
        assert_eq!(out, 4);
    }

    #[test]
    fn test_put_overwrites() {
        let mut table = string_table(11);
        table.put("x".to_string(), 1);
        table.put("x".to_string(), 2);
        assert_eq!(*table.get_or_insert_default("x".to_string()), 2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_clear_keeps_bucket_count() {
        let mut table = string_table(13);
        for i in 0..20 {
            table.insert(i.to_string(), i);
        }
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.bucket_count(), 13);
        assert!(table.begin() == table.end());
    }

    #[test]
    fn test_rehash_preserves_entries() {
        let mut table: HashTable<String, i32> = HashTable::with_sizing(4, Sizing::Exact);
        for i in 0..50 {
            table.insert(format!("key-{i}"), i);
        }
        assert_eq!(table.bucket_count(), 4);

        table.rehash(60);
        assert_eq!(table.bucket_count(), 59);
        assert_eq!(table.len(), 50);
        for i in 0..50 {
            let mut out = -1;
            assert!(table.retrieve(format!("key-{i}").as_str(), &mut out));
            assert_eq!(out, i);
        }
    }

    #[test]
    fn test_rehash_zero_uses_entry_count_and_always_primes() {
        let mut table: HashTable<String, i32> = HashTable::with_sizing(100, Sizing::Exact);
        for i in 0..10 {
            table.insert(i.to_string(), i);
        }
        table.rehash(0);
        assert_eq!(table.bucket_count(), 7);
        assert_eq!(table.len(), 10);

        table.clear();
        table.rehash(0);
        assert_eq!(table.bucket_count(), 2);
    }

    #[test]
    fn test_iteration_order_follows_buckets_then_insertion() {
        let mut table: HashTable<u64, char, Identity> = HashTable::with_sizing(7, Sizing::Exact);
        table.insert(15, 'c');
        table.insert(3, 'd');
        table.insert(1, 'a');
        table.insert(0, 'z');
        table.insert(8, 'b');
        let keys: Vec<u64> = table.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![0, 15, 1, 8, 3]);
    }

    #[test]
    fn test_collisions_in_one_bucket() {
        let mut table: HashTable<String, i32, BuildHasherDefault<ConstHasher>> =
            HashTable::with_sizing(5, Sizing::Primed);
        for (i, key) in ["a", "b", "c", "d"].into_iter().enumerate() {
            table.insert(key.to_string(), i32::try_from(i).unwrap_or_default());
        }
        assert_eq!(table.max_bucket_size(), 4);
        assert_eq!(table.bucket_sizes().collect::<Vec<_>>(), vec![4, 0, 0, 0, 0]);

        assert!(table.remove("b"));
        let keys: Vec<&String> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_dump_groups_keys_by_bucket() {
        let mut table = string_table(5);
        assert_eq!(table.bucket_count(), 5);
        for (i, key) in ["a", "b", "c", "d", "e"].into_iter().enumerate() {
            table.insert(key.to_string(), i32::try_from(i).unwrap_or_default());
        }

        let mut out = Vec::new();
        table.dump(&mut out, 0, 0).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);

        let hasher = DefaultHashBuilder::default();
        for (i, key) in ["a", "b", "c", "d", "e"].into_iter().enumerate() {
            let bucket = (hasher.hash_one(key) % 5) as usize;
            let line = lines[bucket];
            assert!(line.starts_with(&format!("b[{bucket}]:")));
            assert!(line.contains(&format!("\t{key}:{i}")), "{key} missing from {line}");
        }

        assert!(table.remove("c"));
        assert!(table.includes("c") == table.end());
    }

    #[test]
    fn test_dump_widths_and_empty_buckets() {
        let mut table: HashTable<u64, u64, Identity> = HashTable::with_sizing(3, Sizing::Exact);
        table.insert(4, 7);

        let mut out = Vec::new();
        table.dump(&mut out, 3, 2).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "b[0]:\nb[1]:\t  4: 7\nb[2]:\n");

        let mut out = Vec::new();
        table.dump_with(&mut out, |k, v| format!("{k:04X}:{v:04X}")).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "b[0]:\nb[1]:\t0004:0007\nb[2]:\n");
    }

    #[test]
    fn test_swap_and_duplicate() {
        let mut left = string_table(5);
        let mut right = string_table(11);
        left.insert("l".to_string(), 1);
        right.insert("r".to_string(), 2);
        right.insert("s".to_string(), 3);

        left.swap(&mut right);
        assert_eq!(left.bucket_count(), 11);
        assert_eq!(left.len(), 2);
        assert!(right.includes("l").is_valid());

        let copy = left.duplicate();
        left.clear();
        assert_eq!(copy.len(), 2);
        assert!(copy.includes("s").is_valid());
    }

    #[test]
    fn test_from_iter_and_extend() {
        let mut table: HashTable<String, i32> =
            vec![("a".to_string(), 1), ("b".to_string(), 2), ("a".to_string(), 3)].into_iter().collect();
        assert_eq!(table.len(), 2);

        table.extend([("c".to_string(), 4)]);
        let found: BTreeMap<String, i32> = table.iter().map(|(k, v)| (k.clone(), *v)).collect();
        assert_eq!(found.get("a"), Some(&3));
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_load_factor() {
        let mut table: HashTable<String, i32> = HashTable::with_sizing(16, Sizing::Exact);
        for i in 0..12 {
            table.insert(i.to_string(), i);
        }
        assert!((table.load_factor() - 0.75).abs() < 1e-9);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(u8, i32),
        Put(u8, i32),
        Get(u8),
        Remove(u8),
        Clear,
        Rehash(usize),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (any::<u8>(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
            2 => (any::<u8>(), any::<i32>()).prop_map(|(k, v)| Op::Put(k, v)),
            2 => any::<u8>().prop_map(Op::Get),
            3 => any::<u8>().prop_map(Op::Remove),
            1 => Just(Op::Clear),
            1 => (0usize..40).prop_map(Op::Rehash),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

        // Size, lookups and iteration agree with std's HashMap after every step.
        #[test]
        fn prop_matches_std_hash_map(
            estimate in 0usize..20,
            ops in proptest::collection::vec(arb_op(), 1..80),
        ) {
            let mut sut: HashTable<u8, i32> = HashTable::new(estimate);
            let mut model: HashMap<u8, i32> = HashMap::new();

            for op in ops {
                match op {
                    Op::Insert(k, v) => {
                        let cursor = sut.insert(k, v);
                        prop_assert_eq!(cursor.entry().map(|e| (e.key, e.value)), Ok((k, v)));
                        model.insert(k, v);
                    }
                    Op::Put(k, v) => {
                        sut.put(k, v);
                        model.insert(k, v);
                    }
                    Op::Get(k) => {
                        let got = *sut.get_or_insert_default(k);
                        prop_assert_eq!(got, *model.entry(k).or_default());
                    }
                    Op::Remove(k) => {
                        prop_assert_eq!(sut.remove(&k), model.remove(&k).is_some());
                    }
                    Op::Clear => {
                        sut.clear();
                        model.clear();
                    }
                    Op::Rehash(n) => {
                        let expected = Sizing::Primed.bucket_count(if n == 0 { model.len() } else { n });
                        sut.rehash(n);
                        prop_assert_eq!(sut.bucket_count(), expected);
                    }
                }

                prop_assert_eq!(sut.len(), model.len());
                prop_assert_eq!(sut.is_empty(), model.is_empty());
                prop_assert_eq!(sut.begin() == sut.end(), model.is_empty());

                let seen: BTreeMap<u8, i32> = sut.iter().map(|(k, v)| (*k, *v)).collect();
                prop_assert_eq!(sut.iter().count(), sut.len(), "iteration visits every entry once");
                let expected: BTreeMap<u8, i32> = model.iter().map(|(k, v)| (*k, *v)).collect();
                prop_assert_eq!(seen, expected);
            }
        }

        // Every key sits in bucket hash(key) mod bucket_count, also after rehash.
        #[test]
        fn prop_keys_live_in_their_hash_bucket(
            keys in proptest::collection::vec(any::<u64>(), 0..60),
            estimate in 2usize..30,
            rehash_to in 0usize..30,
        ) {
            let mut table: HashTable<u64, (), Identity> = HashTable::with_sizing(estimate, Sizing::Exact);
            for &k in &keys {
                table.insert(k, ());
            }
            table.rehash(rehash_to);

            let count = table.bucket_count() as u64;
            for &k in &keys {
                let cursor = table.includes(&k);
                prop_assert!(cursor.is_valid());
                prop_assert_eq!(cursor.bucket() as u64, k % count);
            }
        }
    }
}
