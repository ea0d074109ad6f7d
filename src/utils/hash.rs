//! Content hashing using FxHash.
//!
//! Only used to detect config file changes, so a fast non-cryptographic
//! hash is enough.

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Compute 64-bit hash from byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}
