//! Shared types used across the streamtree library.

use thiserror::Error;

use crate::codec::CodecError;
use crate::digest::MAX_DEPTH;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by the streaming hasher.
///
/// Producer-side errors (`AlreadyFinalized`) are returned synchronously from
/// [`add_leaf`](crate::Hasher::add_leaf); everything else propagates through
/// the completion chains and resolves the root future with the first failure
/// observed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HasherError {
    /// A leaf arrived after the root was requested. The hasher stays in its
    /// finalizing state; the outstanding root future is unaffected.
    #[error("block already finalized; no further leaves accepted")]
    AlreadyFinalized,

    /// The combiner tried to grow past the deepest supported level, i.e. the
    /// block carries more than 2^24 leaves. Fatal for the block.
    #[error("leaf count exceeds the 2^{max} capacity of a block", max = MAX_DEPTH)]
    TooManyLeaves,

    /// The injected leaf codec rejected an item. Fatal for the block.
    #[error("leaf serialization failed: {0}")]
    Serialization(#[from] CodecError),

    /// A worker's result channel was dropped before it produced a value,
    /// which means the executor was torn down with work still queued.
    #[error("executor dropped pending hash work")]
    ExecutorShutdown,
}
