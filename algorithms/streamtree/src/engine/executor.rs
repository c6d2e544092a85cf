//! Worker Executors
//!
//! The hasher offloads CPU-bound batches to an externally owned executor and
//! observes each result through a [`TaskHandle`]. Any pool that can run a
//! boxed closure qualifies; rayon pools are wired up out of the box.

use futures::channel::oneshot;

use crate::types::HasherError;

// =============================================================================
// EXECUTOR CONTRACT
// =============================================================================

/// A unit of work scheduled onto an [`Executor`].
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Submission of CPU-bound work to a shared pool.
///
/// The core never blocks on the executor and never requires exclusive
/// access; it only needs `execute` to eventually run the job on some thread.
/// Implementations must not drop jobs while results are still awaited; a
/// dropped job resolves the waiting chain with
/// [`HasherError::ExecutorShutdown`].
pub trait Executor: Send + Sync {
    /// Schedule `job` to run.
    fn execute(&self, job: Job);
}

#[cfg(feature = "multithread")]
impl Executor for rayon::ThreadPool {
    fn execute(&self, job: Job) {
        self.spawn(job);
    }
}

/// Executor backed by rayon's shared global pool.
#[cfg(feature = "multithread")]
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalPool;

#[cfg(feature = "multithread")]
impl Executor for GlobalPool {
    fn execute(&self, job: Job) {
        rayon::spawn(job);
    }
}

/// Executor that runs every job inline on the submitting thread.
///
/// Turns the whole pipeline into a deterministic sequential computation;
/// results are always ready by the time a handle is polled. Useful for
/// tests and for callers that cannot spare worker threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallerThread;

impl Executor for CallerThread {
    fn execute(&self, job: Job) {
        job();
    }
}

// =============================================================================
// TASK HANDLES
// =============================================================================

/// The awaitable half of one submitted unit of work.
///
/// Completion chains hold handles in dispatch order; a handle is consumed
/// exactly once, either by a non-blocking [`try_take`](Self::try_take) poll
/// or by awaiting [`take`](Self::take).
#[derive(Debug)]
pub struct TaskHandle<T> {
    rx: oneshot::Receiver<T>,
}

impl<T: Send + 'static> TaskHandle<T> {
    /// Run `work` on `executor` and hand back the handle that will resolve
    /// with its return value.
    pub fn spawn<F>(executor: &dyn Executor, work: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        executor.execute(Box::new(move || {
            // The receiver may have been dropped (hasher discarded
            // mid-stream); the result is simply discarded with it.
            let _ = tx.send(work());
        }));
        Self { rx }
    }

    /// Non-blocking poll: `Ok(Some(value))` once the work has finished,
    /// `Ok(None)` while it is still running.
    ///
    /// # Errors
    /// [`HasherError::ExecutorShutdown`] if the worker was dropped before
    /// producing a value.
    pub fn try_take(&mut self) -> Result<Option<T>, HasherError> {
        self.rx
            .try_recv()
            .map_err(|_| HasherError::ExecutorShutdown)
    }

    /// Await the work's value.
    ///
    /// # Errors
    /// [`HasherError::ExecutorShutdown`] if the worker was dropped before
    /// producing a value.
    pub async fn take(self) -> Result<T, HasherError> {
        self.rx.await.map_err(|_| HasherError::ExecutorShutdown)
    }
}
