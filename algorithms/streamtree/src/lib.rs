//! # streamtree
//!
//! Concurrent streaming Merkle-tree hasher for an append-only sequence of
//! serialized block items, producing one SHA-384 root digest per block.
//!
//! Leaves are fed one at a time from a single producer thread; leaf
//! serialization, leaf hashing, and internal-node combination overlap
//! across a pool of worker executors, yet the root is bit-for-bit identical
//! to the sequential reduction in [`oneshot`].
//!
//! # Usage
//! ```rust
//! use std::sync::Arc;
//! use streamtree::{BytesCodec, CallerThread, Hasher};
//!
//! let mut hasher = Hasher::new(Arc::new(CallerThread), BytesCodec);
//! hasher.add_leaf(b"alpha".to_vec())?;
//! hasher.add_leaf(b"beta".to_vec())?;
//!
//! let root = futures::executor::block_on(hasher.root_hash())?;
//! assert_eq!(root.as_bytes().len(), streamtree::DIGEST_LEN);
//! # Ok::<(), streamtree::HasherError>(())
//! ```
//!
//! Swap [`CallerThread`] for a `rayon::ThreadPool` (or [`GlobalPool`]) to
//! spread the hashing over worker threads; the root does not depend on the
//! executor's parallelism.

// =============================================================================
// MODULES
// =============================================================================

mod codec;
mod digest;
mod engine;
pub mod oneshot;
mod streaming;
mod types;

// =============================================================================
// EXPORTS
// =============================================================================

#[cfg(feature = "protobuf")]
pub use codec::ProtoCodec;
pub use codec::{BytesCodec, CodecError, LeafCodec};
pub use digest::{empty_hash, hash_leaf, hash_pair, Digest, DIGEST_LEN, MAX_DEPTH};
pub use engine::combiner::CHUNK_NODES;
#[cfg(feature = "multithread")]
pub use engine::executor::GlobalPool;
pub use engine::executor::{CallerThread, Executor, Job, TaskHandle};
pub use streaming::StreamHasher as Hasher;
pub use streaming::CHUNK_LEAVES;
pub use types::HasherError;
