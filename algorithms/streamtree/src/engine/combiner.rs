//! Hash Combiner Tree
//!
//! A chained sequence of levels, each one batching the digests produced by
//! the level above it. A level pairs adjacent digests, hashes each pair on a
//! worker, and feeds the results to its child level. Levels are allocated
//! lazily, so memory tracks the depth actually reached by the stream.
//!
//! Ordering discipline: every level keeps its submitted batches in a FIFO
//! chain and applies results strictly from the front, so child input order
//! equals dispatch order equals leaf-stream order no matter how the workers
//! interleave.

use std::collections::VecDeque;
use std::mem;
use std::sync::Arc;

use tracing::trace;

use crate::digest::{empty_hash, hash_pair, Digest, MAX_DEPTH};
use crate::engine::executor::{Executor, TaskHandle};
use crate::types::HasherError;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Digests batched per combiner dispatch.
///
/// A full batch pairs down to 16 outputs, always an even count, so padding
/// against the empty-hash ladder can only happen in the final partial batch
/// of each level.
pub const CHUNK_NODES: usize = 32;

// =============================================================================
// PAIR REDUCTION
// =============================================================================

/// Pair adjacent digests left to right, hashing each pair; a dangling last
/// element is paired with the empty-subtree hash for `depth`.
pub(crate) fn reduce_pairs(batch: &[Digest], depth: usize) -> Vec<Digest> {
    let mut out = Vec::with_capacity(batch.len().div_ceil(2));
    for pair in batch.chunks(2) {
        let right = pair.get(1).copied().unwrap_or_else(|| empty_hash(depth));
        out.push(hash_pair(&pair[0], &right));
    }
    out
}

// =============================================================================
// COMBINER LEVEL
// =============================================================================

/// One level of the combiner chain.
pub(crate) struct CombinerLevel {
    /// Depth of this level; depth 0 consumes leaf hashes.
    depth: usize,
    /// Input digests waiting for the next dispatch.
    pending: Vec<Digest>,
    /// Per-level completion chain, in dispatch order.
    inflight: VecDeque<TaskHandle<Vec<Digest>>>,
    /// Next level down, allocated on first dispatch.
    child: Option<Box<CombinerLevel>>,
}

impl CombinerLevel {
    /// Level 0, the entry of the chain. Consumes leaf hashes.
    pub fn root() -> Self {
        Self {
            depth: 0,
            pending: Vec::with_capacity(CHUNK_NODES),
            inflight: VecDeque::new(),
            child: None,
        }
    }

    /// Allocate a level at `depth`.
    ///
    /// Level `MAX_DEPTH` is the deepest legal level: it holds the root of a
    /// full 2^24-leaf block and never dispatches. Anything deeper means the
    /// caller streamed more leaves than a block supports.
    pub fn new(depth: usize) -> Result<Self, HasherError> {
        if depth > MAX_DEPTH {
            return Err(HasherError::TooManyLeaves);
        }
        Ok(Self {
            depth,
            pending: Vec::with_capacity(CHUNK_NODES),
            inflight: VecDeque::new(),
            child: None,
        })
    }

    /// Append one input digest, dispatching when the batch fills.
    pub fn combine(
        &mut self,
        digest: Digest,
        executor: &Arc<dyn Executor>,
    ) -> Result<(), HasherError> {
        self.pending.push(digest);
        if self.pending.len() == CHUNK_NODES {
            self.dispatch(executor)?;
        }
        Ok(())
    }

    /// Dispatch the pending batch, if any, regardless of fill level.
    ///
    /// Mid-stream this is only ever reached with a full (even) batch; the
    /// finalizer reuses it for the possibly-odd tail, which is where the
    /// empty-hash padding actually materializes.
    pub fn flush(&mut self, executor: &Arc<dyn Executor>) -> Result<(), HasherError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        self.dispatch(executor)
    }

    fn dispatch(&mut self, executor: &Arc<dyn Executor>) -> Result<(), HasherError> {
        // The child must exist before results can arrive for it; growing
        // past capacity fails the block rather than indexing off the ladder.
        if self.child.is_none() {
            self.child = Some(Box::new(Self::new(self.depth + 1)?));
        }
        let batch = mem::replace(&mut self.pending, Vec::with_capacity(CHUNK_NODES));
        let depth = self.depth;
        trace!(depth, nodes = batch.len(), "dispatching combine batch");
        let handle = TaskHandle::spawn(&**executor, move || reduce_pairs(&batch, depth));
        self.inflight.push_back(handle);
        Ok(())
    }

    /// Apply every already-finished batch at the front of the chain, in
    /// dispatch order, without blocking. Recurses into the child so the
    /// whole tree makes progress while the producer is still streaming.
    pub fn pump(&mut self, executor: &Arc<dyn Executor>) -> Result<(), HasherError> {
        loop {
            let Some(front) = self.inflight.front_mut() else {
                break;
            };
            let Some(outputs) = front.try_take()? else {
                break;
            };
            self.inflight.pop_front();
            self.feed_child(outputs, executor)?;
        }
        if let Some(child) = self.child.as_deref_mut() {
            child.pump(executor)?;
        }
        Ok(())
    }

    /// Await the whole per-level chain, feeding each result into the child
    /// in dispatch order.
    pub async fn drain(&mut self, executor: &Arc<dyn Executor>) -> Result<(), HasherError> {
        while let Some(handle) = self.inflight.pop_front() {
            let outputs = handle.take().await?;
            self.feed_child(outputs, executor)?;
        }
        Ok(())
    }

    fn feed_child(
        &mut self,
        outputs: Vec<Digest>,
        executor: &Arc<dyn Executor>,
    ) -> Result<(), HasherError> {
        let Some(child) = self.child.as_deref_mut() else {
            unreachable!("dispatch allocates the child before submitting");
        };
        for digest in outputs {
            child.combine(digest, executor)?;
        }
        Ok(())
    }

    /// Step down to the child level, allocating it if this level never
    /// dispatched (possible only in degenerate finalization paths).
    pub fn descend(&mut self) -> Result<&mut Self, HasherError> {
        if self.child.is_none() {
            self.child = Some(Box::new(Self::new(self.depth + 1)?));
        }
        let Some(child) = self.child.as_deref_mut() else {
            unreachable!("child ensured above");
        };
        Ok(child)
    }

    /// Take the single digest left at the target level, or the empty-block
    /// root when no leaf ever reached it.
    pub fn take_root(&mut self) -> Digest {
        debug_assert!(
            self.pending.len() <= 1,
            "target level must hold at most one digest"
        );
        self.pending.pop().unwrap_or_else(|| empty_hash(0))
    }
}

// =============================================================================
// TREE GEOMETRY
// =============================================================================

/// Depth at which exactly one digest remains for a block of `num_leaves`:
/// the base-2 logarithm of the smallest power of two at or above the count.
/// Zero leaves collapse to depth 0 (the empty-block root).
pub(crate) fn target_depth(num_leaves: u64) -> usize {
    if num_leaves == 0 {
        0
    } else {
        num_leaves.next_power_of_two().trailing_zeros() as usize
    }
}
