//! Configuration errors and individual validation violations.

use std::path::PathBuf;
use thiserror::Error;

/// A single rule a [`CycleConfig`](super::CycleConfig) broke.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("minimum cycle must be greater than zero")]
    ZeroMinCycle,

    #[error("minimum cycle ({min_ms} ms) exceeds maximum cycle ({max_ms} ms)")]
    InvertedCycle { min_ms: u64, max_ms: u64 },

    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("history limit must be at least one")]
    ZeroHistoryLimit,
}

/// Errors raised while building or loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid cycle configuration: {}", describe(.0))]
    Invalid(Vec<ConfigViolation>),

    #[error("failed to parse cycle configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn describe(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
