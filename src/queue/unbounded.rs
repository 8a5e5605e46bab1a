use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

use super::SubQueue;
use crate::task::Task;

struct State {
    buffer: VecDeque<Task>,
    shutdown: bool,
}

/// A FIFO with no capacity limit. `push` never blocks on space — only on
/// the mutex — so this variant carries a single `not_empty` condition
/// variable; there is no `not_full` predicate to ever wait on.
pub(crate) struct UnboundedQueue {
    state: Mutex<State>,
    not_empty: Condvar,
}

impl UnboundedQueue {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(State {
                buffer: VecDeque::new(),
                shutdown: false,
            }),
            not_empty: Condvar::new(),
        }
    }
}

impl SubQueue for UnboundedQueue {
    fn push(&self, task: Task) {
        let mut state = self.state.lock();
        if state.shutdown {
            return;
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
        state.buffer.pop_front()
    }
}

impl Drop for UnboundedQueue {
    fn drop(&mut self) {
        {
            let mut state = self.state.lock();
            state.shutdown = true;
        }
        self.not_empty.notify_all();
    }
}
