use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

use super::SubQueue;
use crate::task::Task;

struct State {
    buffer: VecDeque<Task>,
    shutdown: bool,
}

/// A FIFO bounded to a fixed capacity. `push` blocks while the buffer is
/// full; `try_pop` never blocks.
///
/// Two condition variables keep producer and consumer wakeups directed:
/// a `push` unblocked by a `try_pop` should only ever wake other
/// producers, and vice versa, so no thread burns a wakeup checking a
/// predicate that didn't change for it.
pub(crate) struct BoundedQueue {
    capacity: usize,
    state: Mutex<State>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl BoundedQueue {
    /// # Panics
    ///
    /// Never — capacity is validated by [`crate::priority::QueueOptions::validate`]
    /// before a `BoundedQueue` is ever constructed.
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "capacity must be positive");
        Self {
            capacity,
            state: Mutex::new(State {
                buffer: VecDeque::new(),
                shutdown: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }
}

impl SubQueue for BoundedQueue {
    fn push(&self, task: Task) {
        let mut state = self.state.lock();
        loop {
            if state.shutdown {
                // Dropped here: the dispatcher is tearing down and no
                // longer guarantees execution of newly arriving work.
                return;
            }
            if state.buffer.len() < self.capacity {
                break;
            }
            self.not_full.wait(&mut state);
        }
        state.buffer.push_back(task);
        drop(state);
        self.not_empty.notify_one();
    }

    fn try_pop(&self) -> Option<Task> {
        let mut state = self.state.lock();
        if state.shutdown || state.buffer.is_empty() {
            return None;
        }
        let task = state.buffer.pop_front();
        drop(state);
        self.not_full.notify_one();
        task
    }
}

impl Drop for BoundedQueue {
    fn drop(&mut self) {
        {
            let mut state = self.state.lock();
            state.shutdown = true;
        }
        // Broadcast, not notify_one: every blocked producer and consumer
        // must observe the shutdown, not just the next one in line.
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }
}
