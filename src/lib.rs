//! A priority-aware, in-process task dispatcher.
//!
//! Buffers opaque, zero-argument work units ([`Task`]) in per-priority
//! queues — some bounded with producer backpressure, some unbounded —
//! and executes them on a fixed-size pool of worker threads, always
//! preferring ready work from a higher [`Priority`] class over a lower
//! one.
//!
//! This crate is meant to be embedded inside a larger application that
//! needs to offload CPU-bound or blocking work while preserving a simple
//! priority-ordering discipline among independent jobs. It does not do
//! work stealing, fairness across priority classes, deadline scheduling,
//! dynamic pool resizing, persistence, or per-task cancellation.
//!
//! # Example
//!
//! ```
//! use priority_dispatcher::{Dispatcher, Priority};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let dispatcher = Dispatcher::with_default_config(4).unwrap();
//! let counter = Arc::new(AtomicUsize::new(0));
//!
//! for _ in 0..10 {
//!     let counter = Arc::clone(&counter);
//!     dispatcher
//!         .schedule(Priority::Normal, move || {
//!             counter.fetch_add(1, Ordering::SeqCst);
//!         })
//!         .unwrap();
//! }
//!
//! dispatcher.drain_blocking();
//! assert_eq!(counter.load(Ordering::SeqCst), 10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod dispatcher;
mod error;
mod multiplexer;
mod pool;
mod priority;
mod queue;
mod sink;
mod task;

pub use dispatcher::Dispatcher;
pub use error::{ConfigError, DispatcherError};
pub use priority::{Priority, QueueOptions};
pub use sink::{ErrorSink, TracingSink};
pub use task::Task;
