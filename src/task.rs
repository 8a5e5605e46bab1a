//! The opaque unit of work scheduled by the dispatcher.

/// A movable, zero-argument, no-return callable submitted for asynchronous
/// execution.
///
/// `Task` is owned transitively: the producer owns it until `schedule`
/// moves it into a sub-queue, the sub-queue owns it until a worker's
/// `try_pop` moves it out, and the worker owns it for the duration of the
/// call. There is no copy path anywhere in that chain.
pub type Task = Box<dyn FnOnce() + Send + 'static>;
