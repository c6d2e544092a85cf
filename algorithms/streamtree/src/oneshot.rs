//! One-Shot Reference
//!
//! Sequential computation of the block root on the calling thread. This is
//! the wire contract the concurrent hasher must match bit for bit: leaf
//! hashes reduce level by level, left to right, odd tails padded against
//! the empty-hash ladder. It shares the pair-reduction kernel with the
//! streaming engine, and it is the ground truth the test suite compares
//! against.

use crate::codec::LeafCodec;
use crate::digest::{empty_hash, hash_leaf, Digest, MAX_DEPTH};
use crate::engine::combiner::{reduce_pairs, target_depth};
use crate::types::HasherError;

/// Compute the block root of `items` in one shot, without worker offload.
///
/// # Errors
/// [`HasherError::Serialization`] if the codec rejects an item;
/// [`HasherError::TooManyLeaves`] past the 2^24-leaf block capacity.
pub fn block_root<T, C: LeafCodec<T>>(codec: &C, items: &[T]) -> Result<Digest, HasherError> {
    if items.len() as u64 > 1_u64 << MAX_DEPTH {
        return Err(HasherError::TooManyLeaves);
    }
    let mut hashes = Vec::with_capacity(items.len());
    for item in items {
        hashes.push(hash_leaf(&codec.encode(item)?));
    }
    Ok(root_from_hashes(hashes))
}

/// Reduce precomputed leaf hashes to the block root.
///
/// Zero hashes yield the empty-block root, `empty_hash(0)`.
///
/// # Panics
/// May panic past the 2^24-hash block capacity, where padding would step
/// off the empty-hash ladder; [`block_root`] checks the bound instead.
#[must_use]
pub fn root_from_hashes(mut level: Vec<Digest>) -> Digest {
    if level.is_empty() {
        return empty_hash(0);
    }
    let depth = target_depth(level.len() as u64);
    for k in 0..depth {
        level = reduce_pairs(&level, k);
    }
    level.pop().unwrap_or_else(|| empty_hash(0))
}
