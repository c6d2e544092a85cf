//! SHA-384 Digest Primitive
//!
//! The two hash operations every other component is built from, plus the
//! precomputed empty-subtree ladder used to pad odd siblings.

use core::fmt;

use once_cell::sync::Lazy;
use sha2::{Digest as _, Sha384};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Size of a SHA-384 digest in bytes.
pub const DIGEST_LEN: usize = 48;

/// Maximum combiner depth; a single block carries at most 2^24 leaves.
pub const MAX_DEPTH: usize = 24;

// =============================================================================
// DIGEST
// =============================================================================

/// A 48-byte SHA-384 digest.
///
/// Equality is byte equality. Digests are plain values: `Copy`, freely
/// shared across threads, and immutable once produced.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Wrap raw digest bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Borrow the digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex rendering of the digest.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

// =============================================================================
// HASH OPERATIONS
// =============================================================================

/// SHA-384 of a byte slice.
#[must_use]
pub fn hash_leaf(bytes: &[u8]) -> Digest {
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&Sha384::digest(bytes));
    Digest(out)
}

/// SHA-384 of the concatenation `left ∥ right`.
#[must_use]
pub fn hash_pair(left: &Digest, right: &Digest) -> Digest {
    let mut hasher = Sha384::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&hasher.finalize());
    Digest(out)
}

// =============================================================================
// EMPTY-HASH LADDER
// =============================================================================

/// Cached empty-subtree hashes where `EMPTY_LADDER[k]` is the root of a
/// Merkle tree over 2^k empty leaves.
static EMPTY_LADDER: Lazy<[Digest; MAX_DEPTH]> = Lazy::new(|| {
    let mut ladder = [Digest([0u8; DIGEST_LEN]); MAX_DEPTH];
    ladder[0] = hash_leaf(&[]);
    for depth in 1..MAX_DEPTH {
        ladder[depth] = hash_pair(&ladder[depth - 1], &ladder[depth - 1]);
    }
    ladder
});

/// Hash of the empty subtree at `depth`, used to pad a dangling sibling.
///
/// `empty_hash(0)` is the SHA-384 of the empty byte string.
///
/// # Panics
/// Panics if `depth >= MAX_DEPTH`; the combiner never pads deeper than the
/// ladder because level allocation is capacity-checked first.
#[must_use]
pub fn empty_hash(depth: usize) -> Digest {
    EMPTY_LADDER[depth]
}
