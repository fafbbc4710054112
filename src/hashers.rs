//! Hash strategies a `HashTable` can be built with.
//!
//! A table stores its own copy of the strategy and clones it into any table it
//! builds during `rehash`. Every strategy here is deterministic: the same key
//! always lands in the same bucket for a given bucket count.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{BuildHasherDefault, Hasher},
};

/// The strategy used when none is supplied: std's SipHash with fixed keys
pub type DefaultHashBuilder = BuildHasherDefault<DefaultHasher>;

/// Builds [`Fnv1aHasher`]s
pub type Fnv1aBuilder = BuildHasherDefault<Fnv1aHasher>;

/// Builds [`ByteSumHasher`]s
pub type ByteSumBuilder = BuildHasherDefault<ByteSumHasher>;

/// Builds [`IntMixHasher`]s
pub type IntMixBuilder = BuildHasherDefault<IntMixHasher>;

/// 64-bit FNV offset basis
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// 64-bit FNV prime
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// FNV-1a over the bytes written to the hasher.
#[derive(Debug, Clone, Copy)]
pub struct Fnv1aHasher {
    /// Running hash
    state: u64,
}

impl Default for Fnv1aHasher {
    fn default() -> Self {
        Self { state: FNV_OFFSET_BASIS }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= u64::from(byte);
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }
}

/// Sum of the written bytes.
///
/// Anagrams collide and small sums cluster; it exists to make the effect of
/// prime bucket counts visible in bucket-distribution analysis.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteSumHasher {
    /// Running sum
    sum: u64,
}

impl Hasher for ByteSumHasher {
    fn finish(&self) -> u64 {
        self.sum
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.sum = self.sum.wrapping_add(u64::from(byte));
        }
    }
}

/// Integer-oriented hasher: folds the written words together and runs the
/// 64-bit finaliser from `MurmurHash3` over the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntMixHasher {
    /// Folded input
    state: u64,
}

impl IntMixHasher {
    /// Folds one word into the state
    fn fold(&mut self, word: u64) {
        self.state = self.state.rotate_left(29) ^ word;
    }
}

/// `MurmurHash3` fmix64
const fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^= k >> 33;
    k
}

impl Hasher for IntMixHasher {
    fn finish(&self) -> u64 {
        fmix64(self.state)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.fold(u64::from(byte));
        }
    }

    fn write_u32(&mut self, i: u32) {
        self.fold(u64::from(i));
    }

    fn write_u64(&mut self, i: u64) {
        self.fold(i);
    }

    fn write_usize(&mut self, i: usize) {
        self.fold(u64::try_from(i).unwrap_or(u64::MAX));
    }
}
