//! Handoff queue error types.

use thiserror::Error;

/// Errors returned by [`MessageQueue`](super::MessageQueue) operations.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum QueueError {
    /// The queue was closed and holds no more items.
    #[error("message queue is closed")]
    Closed,
}
