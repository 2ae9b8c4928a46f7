//! Hashing for node identities: `ahash` by default, the std hasher with the
//! `std-hash` feature.

use std::hash::{Hash, Hasher};

#[cfg(not(feature = "std-hash"))]
type IdHasher = ahash::AHasher;

#[cfg(feature = "std-hash")]
type IdHasher = std::collections::hash_map::DefaultHasher;

/// Hashes `value` with fixed keys, so equal global keys map to the same
/// [`RenderUnitId`](crate::RenderUnitId) on every pass.
pub fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = IdHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}
