//! The public-facing facade: assembles a multiplexer and a worker pool,
//! and exposes `schedule`.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{ConfigError, DispatcherError};
use crate::multiplexer::PriorityMultiplexer;
use crate::pool::{DrainTracker, WorkerPool};
use crate::priority::{Priority, QueueOptions};
use crate::sink::{ErrorSink, TracingSink};
use crate::task::Task;

/// A priority-aware task dispatcher: bounded/unbounded per-priority
/// queues feeding a fixed pool of worker threads.
///
/// # Field order and shutdown
///
/// Rust drops struct fields top to bottom. `pool` is declared before
/// `multiplexer` so that, when a `Dispatcher` is dropped, the worker pool
/// (and its threads) are fully torn down and joined *before* the
/// multiplexer — and therefore its sub-queues — are deallocated. Any
/// producer still blocked on a full bounded sub-queue is only released
/// once the sub-queue itself is dropped, which cannot happen until every
/// `Arc<PriorityMultiplexer>` clone (including the ones each worker
/// thread held) has gone away.
pub struct Dispatcher {
    pool: WorkerPool,
    multiplexer: Arc<PriorityMultiplexer>,
    tracker: Arc<DrainTracker>,
}

impl Dispatcher {
    /// Build a dispatcher with an explicit per-priority configuration.
    ///
    /// `thread_count` must be between 1 and
    /// `std::thread::available_parallelism()` inclusive.
    pub fn new(
        thread_count: usize,
        config: BTreeMap<Priority, QueueOptions>,
    ) -> Result<Self, ConfigError> {
        Self::with_sink(thread_count, config, Arc::new(TracingSink))
    }

    /// Like [`Dispatcher::new`], but with a caller-supplied [`ErrorSink`]
    /// for panic reporting instead of the default [`TracingSink`].
    pub fn with_sink(
        thread_count: usize,
        config: BTreeMap<Priority, QueueOptions>,
        sink: Arc<dyn ErrorSink>,
    ) -> Result<Self, ConfigError> {
        let max = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        if thread_count == 0 || thread_count > max {
            return Err(ConfigError::InvalidThreadCount {
                got: thread_count,
                max,
            });
        }

        let multiplexer = Arc::new(PriorityMultiplexer::new(&config)?);
        let tracker = Arc::new(DrainTracker::new());
        let pool = WorkerPool::new(
            Arc::clone(&multiplexer),
            Arc::clone(&tracker),
            sink,
            thread_count,
        )?;

        Ok(Self {
            pool,
            multiplexer,
            tracker,
        })
    }

    /// Build a dispatcher with the default configuration: `High` bounded
    /// to 1000 tasks, `Normal` unbounded.
    pub fn with_default_config(thread_count: usize) -> Result<Self, ConfigError> {
        Self::new(thread_count, default_config())
    }

    /// Submit a task under the given priority class.
    ///
    /// Blocks if that priority's sub-queue is bounded and currently full.
    /// Fails only if `priority` has no backing sub-queue in the
    /// configuration this dispatcher was built with; a task submitted
    /// after shutdown has begun is silently dropped instead of erroring,
    /// matching the submission contract.
    pub fn schedule(
        &self,
        priority: Priority,
        task: impl FnOnce() + Send + 'static,
    ) -> Result<(), DispatcherError> {
        let task: Task = Box::new(task);
        self.multiplexer.push(priority, task)?;
        self.tracker.record_enqueued();
        Ok(())
    }

    /// Block until every currently-queued and currently-executing task
    /// has finished.
    ///
    /// Not part of the submission contract's invariants — an addition
    /// for hosts that want a deterministic wait instead of relying on
    /// the worker pool's own shutdown-time drain sweep. Safe to call
    /// repeatedly, and safe to call before scheduling more work: the
    /// dispatcher remains usable after it returns.
    pub fn drain_blocking(&self) {
        self.tracker.wait_until_idle();
    }
}

/// `High = bounded(1000)`, `Normal = unbounded`.
fn default_config() -> BTreeMap<Priority, QueueOptions> {
    let mut config = BTreeMap::new();
    config.insert(Priority::High, QueueOptions::bounded(1000));
    config.insert(Priority::Normal, QueueOptions::unbounded());
    config
}
