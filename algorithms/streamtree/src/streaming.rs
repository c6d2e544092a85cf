//! Streaming Hasher
//!
//! Producer-facing intake for one block: leaves arrive one at a time on a
//! single thread, serialization and hashing fan out across the executor,
//! and the root digest comes back through a future once the stream closes.
//!
//! Intake never blocks. Each full leaf chunk is moved into a worker task;
//! the ordered chain of task handles is what turns parallel execution back
//! into leaf-stream order.

use std::collections::VecDeque;
use std::future::Future;
use std::mem;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::codec::LeafCodec;
use crate::digest::{hash_leaf, Digest};
use crate::engine::combiner::{target_depth, CombinerLevel};
use crate::engine::executor::{Executor, TaskHandle};
use crate::types::HasherError;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Leaves batched per serialize-and-hash dispatch.
pub const CHUNK_LEAVES: usize = 16;

/// Output of one leaf-batch worker: the batch's digests in input order.
type LeafHashes = Result<Vec<Digest>, HasherError>;

// =============================================================================
// STREAMING HASHER
// =============================================================================

/// Concurrent streaming Merkle-tree hasher for one block.
///
/// Feed leaves with [`add_leaf`](Self::add_leaf), then request the block
/// root once with [`root_hash`](Self::root_hash). The digest is bit-for-bit
/// identical to the sequential reference in [`crate::oneshot`] regardless
/// of executor parallelism.
///
/// The hasher itself is single-writer: all of its state is owned and
/// mutated by the producer thread, batches move into worker tasks by value,
/// and results re-enter in dispatch order.
pub struct StreamHasher<T, C> {
    /// Externally owned worker pool.
    executor: Arc<dyn Executor>,
    /// Injected leaf-serialization capability, shared with worker tasks.
    codec: Arc<C>,
    /// Leaves accumulating toward the next dispatch.
    open_batch: Vec<T>,
    /// Count of every leaf accepted so far.
    num_leaves: u64,
    /// Top-level completion chain of leaf-batch workers, in dispatch order.
    leaf_chain: VecDeque<TaskHandle<LeafHashes>>,
    /// Level 0 of the combiner tree.
    tree: CombinerLevel,
    /// Set by the first `root_hash` call; leaves are rejected afterwards.
    finalized: bool,
    /// First failure observed while pumping; resolves the root future.
    fatal: Option<HasherError>,
}

impl<T, C> StreamHasher<T, C>
where
    T: Send + 'static,
    C: LeafCodec<T> + 'static,
{
    /// Create a hasher for a fresh block.
    pub fn new(executor: Arc<dyn Executor>, codec: C) -> Self {
        Self {
            executor,
            codec: Arc::new(codec),
            open_batch: Vec::with_capacity(CHUNK_LEAVES),
            num_leaves: 0,
            leaf_chain: VecDeque::new(),
            tree: CombinerLevel::root(),
            finalized: false,
            fatal: None,
        }
    }

    /// Append one leaf to the block.
    ///
    /// Never suspends; a full chunk is handed to the executor and any
    /// already-finished pipeline work is folded in on the way out.
    ///
    /// # Errors
    /// [`HasherError::AlreadyFinalized`] once [`root_hash`](Self::root_hash)
    /// has been called.
    pub fn add_leaf(&mut self, item: T) -> Result<(), HasherError> {
        if self.finalized {
            return Err(HasherError::AlreadyFinalized);
        }
        self.open_batch.push(item);
        self.num_leaves += 1;
        if self.open_batch.len() == CHUNK_LEAVES {
            self.dispatch_leaves();
        }
        self.pump();
        Ok(())
    }

    /// Number of leaves accepted so far.
    #[must_use]
    pub fn num_leaves(&self) -> u64 {
        self.num_leaves
    }

    /// Close the leaf stream and resolve the block root.
    ///
    /// Runs the producer-side finalization synchronously (flag, tail leaf
    /// batch, target depth), then hands back the future that drains the
    /// pipeline and applies the final empty-hash padding. The future is
    /// runtime-agnostic and resolves exactly once; worker-side failures
    /// resolve it with the first error observed. Calling `root_hash` again
    /// yields a future that resolves to
    /// [`HasherError::AlreadyFinalized`].
    pub fn root_hash(
        &mut self,
    ) -> impl Future<Output = Result<Digest, HasherError>> + Send + 'static {
        let already = mem::replace(&mut self.finalized, true);
        if !already && !self.open_batch.is_empty() {
            self.dispatch_leaves();
        }
        let target = target_depth(self.num_leaves);
        debug!(
            num_leaves = self.num_leaves,
            target_depth = target,
            "finalizing block root"
        );
        let finalizer = Finalizer {
            executor: Arc::clone(&self.executor),
            leaf_chain: mem::take(&mut self.leaf_chain),
            tree: mem::replace(&mut self.tree, CombinerLevel::root()),
            target,
            fatal: self.fatal.take(),
            already,
        };
        finalizer.finish()
    }

    fn dispatch_leaves(&mut self) {
        let batch = mem::replace(&mut self.open_batch, Vec::with_capacity(CHUNK_LEAVES));
        let codec = Arc::clone(&self.codec);
        trace!(leaves = batch.len(), "dispatching leaf batch");
        let handle = TaskHandle::spawn(&*self.executor, move || {
            batch
                .iter()
                .map(|item| Ok(hash_leaf(&codec.encode(item)?)))
                .collect::<Result<Vec<_>, _>>()
        });
        self.leaf_chain.push_back(handle);
    }

    /// Fold in whatever the workers have already finished, preserving
    /// dispatch order. Any failure is stashed for the root future.
    fn pump(&mut self) {
        if self.fatal.is_some() {
            return;
        }
        if let Err(err) = self.advance() {
            self.fatal = Some(err);
        }
    }

    fn advance(&mut self) -> Result<(), HasherError> {
        loop {
            let Some(front) = self.leaf_chain.front_mut() else {
                break;
            };
            let Some(hashes) = front.try_take()? else {
                break;
            };
            self.leaf_chain.pop_front();
            for digest in hashes? {
                self.tree.combine(digest, &self.executor)?;
            }
        }
        self.tree.pump(&self.executor)
    }
}

// =============================================================================
// FINALIZER
// =============================================================================

/// Owned snapshot of the pipeline taken by `root_hash`; the hasher itself
/// stays behind, refusing further leaves.
struct Finalizer {
    executor: Arc<dyn Executor>,
    leaf_chain: VecDeque<TaskHandle<LeafHashes>>,
    tree: CombinerLevel,
    target: usize,
    fatal: Option<HasherError>,
    already: bool,
}

impl Finalizer {
    async fn finish(mut self) -> Result<Digest, HasherError> {
        if self.already {
            return Err(HasherError::AlreadyFinalized);
        }
        if let Some(err) = self.fatal {
            return Err(err);
        }
        // Absorb the top chain: leaf hashes enter level 0 in stream order.
        while let Some(handle) = self.leaf_chain.pop_front() {
            for digest in handle.take().await?? {
                self.tree.combine(digest, &self.executor)?;
            }
        }
        // Walk down to the target depth. Flushing the (possibly odd) tail
        // batch is the one place empty-hash padding materializes.
        let mut level = &mut self.tree;
        for _ in 0..self.target {
            level.flush(&self.executor)?;
            level.drain(&self.executor).await?;
            level = level.descend()?;
        }
        Ok(level.take_root())
    }
}
