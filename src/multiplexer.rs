//! The priority multiplexer: one blocking `pop` over many sub-queues.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Condvar, Mutex};

use crate::error::{ConfigError, DispatcherError};
use crate::priority::{Priority, QueueOptions};
use crate::queue::{BoundedQueue, SubQueue, UnboundedQueue};
use crate::task::Task;

/// Combines one sub-queue per configured [`Priority`] into a single
/// blocking-pop surface that always serves the highest ready class first.
///
/// `pop_mutex` serializes consumers; `push` never takes it, so producers
/// and consumers only ever contend on a single sub-queue's own mutex.
pub(crate) struct PriorityMultiplexer {
    // BTreeMap so pop() can walk classes in a stable, descending order via
    // `.iter().rev()` — `Priority`'s derived `Ord` puts `High` last.
    queues: BTreeMap<Priority, Box<dyn SubQueue>>,
    shutdown: AtomicBool,
    pop_mutex: Mutex<()>,
    task_available: Condvar,
}

impl PriorityMultiplexer {
    pub(crate) fn new(config: &BTreeMap<Priority, QueueOptions>) -> Result<Self, ConfigError> {
        let mut queues: BTreeMap<Priority, Box<dyn SubQueue>> = BTreeMap::new();
        for (&priority, options) in config {
            options.validate(priority)?;
            let queue: Box<dyn SubQueue> = if options.bounded {
                Box::new(BoundedQueue::new(options.capacity.expect("validated above")))
            } else {
                Box::new(UnboundedQueue::new())
            };
            queues.insert(priority, queue);
        }
        Ok(Self {
            queues,
            shutdown: AtomicBool::new(false),
            pop_mutex: Mutex::new(()),
            task_available: Condvar::new(),
        })
    }

    /// Route `task` to its priority's sub-queue, blocking if that
    /// sub-queue is bounded and full.
    ///
    /// Silently discards `task` if the multiplexer has already been shut
    /// down, per the submission contract: a shutdown-in-flight producer
    /// is not an error.
    pub(crate) fn push(&self, priority: Priority, task: Task) -> Result<(), DispatcherError> {
        if self.shutdown.load(Ordering::Acquire) {
            return Ok(());
        }
        let queue = self
            .queues
            .get(&priority)
            .ok_or(DispatcherError::UnknownPriority(priority))?;
        queue.push(task);
        self.task_available.notify_one();
        Ok(())
    }

    /// Block until a task is available, or return `None` once shutdown
    /// has been observed and every sub-queue reports empty.
    ///
    /// Every iteration re-walks all sub-queues from the highest priority
    /// down before deciding whether to wait or report exhaustion, so the
    /// same loop implements both the "keep waiting" phase and the final
    /// drain sweep — there is no separate post-shutdown code path.
    pub(crate) fn pop(&self) -> Option<Task> {
        let mut guard = self.pop_mutex.lock();
        loop {
            for queue in self.queues.values().rev() {
                if let Some(task) = queue.try_pop() {
                    return Some(task);
                }
            }
            if self.shutdown.load(Ordering::Acquire) {
                return None;
            }
            self.task_available.wait(&mut guard);
        }
    }

    /// Reject all future pushes and wake every blocked `pop()` caller.
    /// Idempotent.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        // Hold pop_mutex while broadcasting: a worker between its
        // shutdown check and its `wait` call is either already inside
        // `wait` (and will be woken) or hasn't reached it yet and will
        // acquire this same mutex before doing so, so it will observe
        // the flag we just set without needing a notification at all.
        let _guard = self.pop_mutex.lock();
        self.task_available.notify_all();
    }

}

impl Drop for PriorityMultiplexer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn config(high: QueueOptions, normal: QueueOptions) -> BTreeMap<Priority, QueueOptions> {
        let mut config = BTreeMap::new();
        config.insert(Priority::High, high);
        config.insert(Priority::Normal, normal);
        config
    }

    #[test]
    fn strict_priority_serves_high_before_normal() {
        // High pushed after Normal must still come out of pop() first.
        let mux = PriorityMultiplexer::new(&config(
            QueueOptions::bounded(100),
            QueueOptions::unbounded(),
        ))
        .unwrap();

        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let o = Arc::clone(&order);
        mux.push(Priority::Normal, Box::new(move || o.lock().unwrap().push("normal")))
            .unwrap();
        let o = Arc::clone(&order);
        mux.push(Priority::High, Box::new(move || o.lock().unwrap().push("high")))
            .unwrap();

        mux.pop().unwrap()();
        mux.pop().unwrap()();
        assert_eq!(*order.lock().unwrap(), vec!["high", "normal"]);
    }

    #[test]
    fn blocking_pop_unblocks_on_push() {
        let mux = Arc::new(
            PriorityMultiplexer::new(&config(QueueOptions::bounded(10), QueueOptions::unbounded()))
                .unwrap(),
        );
        let consumer_mux = Arc::clone(&mux);
        let consumer = thread::spawn(move || consumer_mux.pop());

        thread::sleep(Duration::from_millis(50));
        assert!(!consumer.is_finished(), "pop should still be blocked");

        mux.push(Priority::High, Box::new(|| {})).unwrap();
        let task = consumer.join().unwrap();
        assert!(task.is_some());
    }

    #[test]
    fn blocking_pop_unblocks_on_shutdown() {
        let mux = Arc::new(
            PriorityMultiplexer::new(&config(QueueOptions::bounded(10), QueueOptions::unbounded()))
                .unwrap(),
        );
        let consumer_mux = Arc::clone(&mux);
        let consumer = thread::spawn(move || consumer_mux.pop());

        thread::sleep(Duration::from_millis(50));
        mux.shutdown();

        let task = consumer.join().unwrap();
        assert!(task.is_none());
    }

    #[test]
    fn drain_after_shutdown_returns_queued_tasks_then_none() {
        let mux = PriorityMultiplexer::new(&config(
            QueueOptions::bounded(10),
            QueueOptions::unbounded(),
        ))
        .unwrap();

        mux.push(Priority::High, Box::new(|| {})).unwrap();
        mux.push(Priority::Normal, Box::new(|| {})).unwrap();
        mux.shutdown();

        assert!(mux.pop().is_some());
        assert!(mux.pop().is_some());
        assert!(mux.pop().is_none());
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mux = PriorityMultiplexer::new(&config(
            QueueOptions::bounded(10),
            QueueOptions::unbounded(),
        ))
        .unwrap();
        mux.shutdown();
        mux.shutdown();
        mux.shutdown();
        assert!(mux.pop().is_none());
    }

    #[test]
    fn push_after_shutdown_is_silently_discarded() {
        let mux = PriorityMultiplexer::new(&config(
            QueueOptions::bounded(10),
            QueueOptions::unbounded(),
        ))
        .unwrap();
        mux.shutdown();
        mux.push(Priority::Normal, Box::new(|| panic!("must never run")))
            .unwrap();
        assert!(mux.pop().is_none());
    }

    #[test]
    fn push_to_unconfigured_priority_errors() {
        let mut config = BTreeMap::new();
        config.insert(Priority::Normal, QueueOptions::unbounded());
        let mux = PriorityMultiplexer::new(&config).unwrap();
        let err = mux.push(Priority::High, Box::new(|| {})).unwrap_err();
        assert!(matches!(err, DispatcherError::UnknownPriority(Priority::High)));
    }
}
