//! Phase actor error types.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors returned by [`PhaseActor`](super::PhaseActor) operations.
#[derive(Debug, Error)]
pub enum LightError {
    #[error("toggle loop is already running")]
    AlreadyRunning,

    #[error("light has been shut down")]
    Stopped,

    #[error("failed to spawn toggle loop thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("toggle loop thread panicked")]
    WorkerPanicked,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
