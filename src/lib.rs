//! # Chaintable
//!
//! A separate-chaining hash table with both table-style and associative-array
//! access, and a cursor that walks every entry bucket by bucket.
//!
//! - `HashTable`: the table. Each key lives in bucket `hash(key) mod bucket_count`
//!   and appears at most once. The bucket count is fixed at construction and
//!   only changes through `rehash`.
//! - `Cursor`: a read-only position in a table. `end()` is recomputed from the
//!   table on every call, and all invalid cursors compare equal.
//!
//! Bucket counts are rounded down to a prime unless `Sizing::Exact` is asked for.
//! The hash strategy is any `BuildHasher + Clone`; `hashers` has a few
//! deterministic ones.
//!
//! ## Basic Usage
//!
//! ```rust
//! use chaintable::HashTable;
//!
//! // Ask for about 10 buckets; 7 is the prime actually used
//! let mut table: HashTable<String, i32> = HashTable::new(10);
//! assert_eq!(table.bucket_count(), 7);
//!
//! // Insert overwrites an existing key
//! table.insert("apple".to_string(), 1);
//! table.insert("apple".to_string(), 10);
//! assert_eq!(table.len(), 1);
//!
//! // Retrieve copies the value out and leaves `out` alone on a miss
//! let mut out = 0;
//! assert!(table.retrieve("apple", &mut out));
//! assert_eq!(out, 10);
//!
//! // Associative access creates missing keys with a default value
//! *table.get_or_insert_default("banana".to_string()) += 5;
//! assert_eq!(table.len(), 2);
//!
//! // Remove reports whether the key was there
//! assert!(table.remove("apple"));
//! assert!(!table.remove("apple"));
//! ```
//!
//! ## Cursors
//!
//! ```rust
//! use chaintable::HashTable;
//!
//! let table: HashTable<u32, char> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
//!
//! let end = table.end();
//! let mut cursor = table.begin();
//! let mut seen = 0;
//! while cursor != end {
//!     let entry = cursor.entry().unwrap();
//!     assert!(table.includes(&entry.key).is_valid());
//!     seen += 1;
//!     cursor.advance();
//! }
//! assert_eq!(seen, 3);
//!
//! // A missing key yields the end cursor
//! assert!(table.includes(&42) == table.end());
//! ```

/// Chains of entries, one per bucket
mod bucket;
/// Read-only cursor over a table
mod cursor;
/// Key/value pair stored in a chain
mod entry;
/// Error types
mod error;
/// The separate-chaining table and its sizing policy
mod hash_table;
/// Hash strategies
pub mod hashers;
/// Logger setup for the binaries
mod logger;
/// Prime helpers used for bucket counts
mod primes;
/// Classful IPv4 route table built on the hash table
mod route_table;
/// Bucket-distribution summaries
mod stats;
/// Utility traits for the table
mod utils;

/// Command harnesses used by the binaries
mod driver;

pub use cursor::Cursor;
pub use driver::{RouterDriver, TableDriver, Tokens};
pub use entry::Entry;
pub use error::{AddressError, CursorError, DriverError, RouteError};
pub use hash_table::{HashTable, MIN_BUCKETS, Sizing};
pub use logger::initialize_logger;
pub use primes::{is_prime, prime_below};
pub use route_table::{Classified, IpClass, IpNumber, RouteTable, interpret, parse_dotted};
pub use stats::BucketStats;
pub use utils::TableExtensions;
