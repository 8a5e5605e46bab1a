//! Error types for dispatcher construction and task submission.
//!
//! Every fallible constructor and the submission path return one of the
//! enums here. Task panics are not represented as `Error`s — they are
//! caught and handed to an [`ErrorSink`](crate::sink::ErrorSink) instead,
//! since a panicking task must never fail `schedule` or stop the pool.

use crate::priority::Priority;

/// Errors raised while building a [`PriorityMultiplexer`](crate::multiplexer::PriorityMultiplexer)
/// or [`Dispatcher`](crate::dispatcher::Dispatcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A bounded queue was configured with a capacity of zero.
    #[error("bounded queue capacity must be positive, got {0}")]
    NonPositiveCapacity(usize),

    /// A bounded queue was configured without a capacity at all.
    #[error("bounded queue for priority {0:?} requires a capacity")]
    MissingCapacity(Priority),

    /// `thread_count` was zero or exceeded the host's available parallelism.
    #[error("thread_count must be between 1 and {max} (available parallelism), got {got}")]
    InvalidThreadCount {
        /// The value the caller supplied.
        got: usize,
        /// The upper bound, taken from `std::thread::available_parallelism()`.
        max: usize,
    },
}

/// Errors raised while submitting a task.
#[derive(Debug, thiserror::Error)]
pub enum DispatcherError {
    /// `schedule` was called with a priority class that has no backing
    /// sub-queue in the multiplexer's configuration.
    #[error("unknown priority class: {0:?}")]
    UnknownPriority(Priority),
}
