//! The fixed-size worker pool and its shutdown-time drain bookkeeping.

use std::panic;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};

use crate::error::ConfigError;
use crate::multiplexer::PriorityMultiplexer;
use crate::sink::ErrorSink;

/// Tracks how many tasks are queued and how many are in flight, so
/// [`crate::dispatcher::Dispatcher::drain_blocking`] can wait for true
/// quiescence instead of racing the worker loop's own shutdown check.
///
/// Tracks enqueue/dequeue/completion counts so a caller can wait for
/// true quiescence instead of racing the worker loop's own shutdown
/// check (see DESIGN.md).
pub(crate) struct DrainTracker {
    queue_depth: AtomicUsize,
    active_tasks: AtomicUsize,
    idle_mutex: Mutex<()>,
    idle_cond: Condvar,
}

impl DrainTracker {
    pub(crate) fn new() -> Self {
        Self {
            queue_depth: AtomicUsize::new(0),
            active_tasks: AtomicUsize::new(0),
            idle_mutex: Mutex::new(()),
            idle_cond: Condvar::new(),
        }
    }

    pub(crate) fn record_enqueued(&self) {
        self.queue_depth.fetch_add(1, Ordering::Release);
    }

    fn record_dequeued(&self) {
        self.queue_depth.fetch_sub(1, Ordering::Release);
        self.active_tasks.fetch_add(1, Ordering::Release);
    }

    fn record_completed(&self) {
        let previously_active = self.active_tasks.fetch_sub(1, Ordering::Release);
        // Lock before checking+notifying: wait_until_idle() holds this
        // same mutex while it re-checks its predicate and calls wait(),
        // so acquiring it here guarantees we don't notify into a gap
        // between its check and its wait() call.
        if previously_active == 1 && self.queue_depth.load(Ordering::Acquire) == 0 {
            let _guard = self.idle_mutex.lock();
            self.idle_cond.notify_all();
        }
    }

    pub(crate) fn wait_until_idle(&self) {
        let mut guard = self.idle_mutex.lock();
        while self.queue_depth.load(Ordering::Acquire) > 0
            || self.active_tasks.load(Ordering::Acquire) > 0
        {
            self.idle_cond.wait(&mut guard);
        }
    }
}

/// RAII guard that always records task completion, even if the task
/// panicked — without it, a panicking task would leave `active_tasks`
/// permanently inflated and `wait_until_idle` would hang forever.
struct ActiveTaskGuard<'a> {
    tracker: &'a DrainTracker,
}

impl Drop for ActiveTaskGuard<'_> {
    fn drop(&mut self) {
        self.tracker.record_completed();
    }
}

/// A fixed number of worker threads draining a shared
/// [`PriorityMultiplexer`].
pub(crate) struct WorkerPool {
    multiplexer: Arc<PriorityMultiplexer>,
    shutdown: Arc<AtomicBool>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    pub(crate) fn new(
        multiplexer: Arc<PriorityMultiplexer>,
        tracker: Arc<DrainTracker>,
        sink: Arc<dyn ErrorSink>,
        num_threads: usize,
    ) -> Result<Self, ConfigError> {
        let max = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        if num_threads == 0 || num_threads > max {
            return Err(ConfigError::InvalidThreadCount {
                got: num_threads,
                max,
            });
        }

        let shutdown = Arc::new(AtomicBool::new(false));
        let mut workers = Vec::with_capacity(num_threads);
        for index in 0..num_threads {
            let multiplexer = Arc::clone(&multiplexer);
            let tracker = Arc::clone(&tracker);
            let sink = Arc::clone(&sink);
            let shutdown = Arc::clone(&shutdown);
            let handle = std::thread::Builder::new()
                .name(format!("priority-dispatcher-{index}"))
                .spawn(move || worker_loop(&multiplexer, &tracker, sink.as_ref(), &shutdown))
                .expect("failed to spawn dispatcher worker thread");
            workers.push(handle);
        }

        Ok(Self {
            multiplexer,
            shutdown,
            workers: Mutex::new(workers),
        })
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Order matters: set the worker-local flag first so a worker
        // that is about to loop back sees it, then shut the multiplexer
        // down so pop() unblocks with its final drain sweep. The
        // multiplexer itself is not deallocated here — this pool and the
        // owning `Dispatcher` both hold `Arc` clones, and the
        // `Dispatcher`'s own clone (declared after this pool's field)
        // outlives this `drop`, so sub-queues are not released yet.
        self.shutdown.store(true, Ordering::Release);
        self.multiplexer.shutdown();
        let mut workers = self.workers.lock();
        for handle in workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(
    multiplexer: &Arc<PriorityMultiplexer>,
    tracker: &Arc<DrainTracker>,
    sink: &dyn ErrorSink,
    shutdown: &Arc<AtomicBool>,
) {
    while !shutdown.load(Ordering::Acquire) {
        let task = match multiplexer.pop() {
            Some(task) => task,
            None => break,
        };
        tracker.record_dequeued();
        let _guard = ActiveTaskGuard { tracker };
        if let Err(payload) = panic::catch_unwind(panic::AssertUnwindSafe(task)) {
            sink.report_panic(payload.as_ref());
        }
        // _guard drops here, recording completion whether or not the
        // task panicked.
    }
}
