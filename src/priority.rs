//! The priority class enumeration and per-class queue configuration.

use crate::error::ConfigError;

/// A priority class for scheduled work.
///
/// Ordered so that `High > Normal` under the derived [`Ord`]; the
/// multiplexer walks configured classes from highest to lowest whenever it
/// selects the next task, so adding further variants (e.g. `Low`) only
/// requires extending this enum and the default configuration — the
/// selection algorithm itself does not special-case `High` or `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Preferred only over classes not present at all; never starved, but
    /// never given precedence over `High`.
    Normal,
    /// Strictly preferred over every lower class whenever both have work
    /// ready at the moment a worker selects its next task.
    High,
}

/// Per-priority-class queue configuration.
///
/// A bounded queue requires `capacity`; an unbounded queue ignores it.
/// Use [`QueueOptions::bounded`] / [`QueueOptions::unbounded`] rather than
/// constructing this directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueOptions {
    pub(crate) bounded: bool,
    pub(crate) capacity: Option<usize>,
}

impl QueueOptions {
    /// A bounded queue with the given fixed capacity.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            bounded: true,
            capacity: Some(capacity),
        }
    }

    /// An unbounded queue. Producers never block on space.
    pub fn unbounded() -> Self {
        Self {
            bounded: false,
            capacity: None,
        }
    }

    /// Validate this configuration against the priority class it will back.
    ///
    /// A bounded queue must carry a strictly positive capacity.
    pub(crate) fn validate(&self, priority: Priority) -> Result<(), ConfigError> {
        if self.bounded {
            match self.capacity {
                None => Err(ConfigError::MissingCapacity(priority)),
                Some(0) => Err(ConfigError::NonPositiveCapacity(0)),
                Some(_) => Ok(()),
            }
        } else {
            Ok(())
        }
    }
}
