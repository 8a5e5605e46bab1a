//! Single-priority FIFO queues.
//!
//! Two variants back one priority class each: [`BoundedQueue`] blocks
//! producers once full, [`UnboundedQueue`] never blocks on space. Both
//! share the same shutdown contract, captured by the private [`SubQueue`]
//! trait the multiplexer programs against.

mod bounded;
mod unbounded;

pub(crate) use bounded::BoundedQueue;
pub(crate) use unbounded::UnboundedQueue;

use crate::task::Task;

/// A single-priority FIFO with blocking push, non-blocking pop, and a
/// one-way shutdown switch.
///
/// Implementors guarantee: once shut down, `push` silently drops its task
/// and `try_pop` never reports a waiting task, even if one is physically
/// still buffered. Nothing in this trait is specific to bounded or
/// unbounded storage — the capacity check lives entirely in the bounded
/// implementation's `push`.
pub(crate) trait SubQueue: Send + Sync {
    /// Enqueue a task, blocking if the queue is bounded and full.
    ///
    /// A no-op if the queue has been shut down: the task is dropped
    /// without running.
    fn push(&self, task: Task);

    /// Dequeue the head of the queue without blocking.
    ///
    /// Returns `None` if the queue is empty or has been shut down.
    fn try_pop(&self) -> Option<Task>;
}
