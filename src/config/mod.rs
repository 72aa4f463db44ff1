//! Timing and ordering configuration for phase actors.
//!
//! Validation uses Stillwater's `Validation` type so that a bad configuration
//! reports every broken rule in one pass instead of the first one only.
//!
//! # Example
//!
//! ```rust
//! use phaselight::config::{CycleConfig, ElapsedPrecision};
//! use std::time::Duration;
//!
//! let config = CycleConfig::builder()
//!     .cycle(Duration::from_millis(40), Duration::from_millis(60))
//!     .poll_interval(Duration::from_millis(1))
//!     .precision(ElapsedPrecision::Precise)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.min_cycle(), Duration::from_millis(40));
//!
//! let partial = CycleConfig::from_json(r#"{ "min_cycle_ms": 1000, "max_cycle_ms": 2000 }"#).unwrap();
//! assert_eq!(partial.max_cycle(), Duration::from_secs(2));
//! assert_eq!(partial.poll_interval(), Duration::from_millis(1));
//! ```

mod builder;
mod error;

pub use builder::CycleConfigBuilder;
pub use error::{ConfigError, ConfigViolation};

use crate::core::DEFAULT_HISTORY_LIMIT;
use crate::queue::RetrievalOrder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// How elapsed time is compared against the drawn cycle length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElapsedPrecision {
    /// Truncate elapsed time to whole seconds before comparing. A 4.3 s draw
    /// then fires after 5 s, so real cycles land on whole seconds.
    Truncated,
    /// Compare at full precision.
    #[default]
    Precise,
}

impl ElapsedPrecision {
    /// Whether `elapsed` is past `target` under this precision.
    ///
    /// ```rust
    /// use phaselight::config::ElapsedPrecision;
    /// use std::time::Duration;
    ///
    /// let target = Duration::from_millis(4300);
    /// let elapsed = Duration::from_millis(4900);
    ///
    /// assert!(ElapsedPrecision::Precise.exceeds(elapsed, target));
    /// assert!(!ElapsedPrecision::Truncated.exceeds(elapsed, target));
    /// ```
    pub fn exceeds(self, elapsed: Duration, target: Duration) -> bool {
        match self {
            Self::Truncated => Duration::from_secs(elapsed.as_secs()) > target,
            Self::Precise => elapsed > target,
        }
    }
}

/// Timing and ordering knobs for a phase actor.
///
/// Fields missing from a JSON document keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CycleConfig {
    pub min_cycle_ms: u64,
    pub max_cycle_ms: u64,
    pub poll_interval_ms: u64,
    /// Pause at the start of every publish, before the queue lock is taken.
    pub send_delay_ms: u64,
    pub precision: ElapsedPrecision,
    pub order: RetrievalOrder,
    pub history_limit: usize,
}

pub const DEFAULT_MIN_CYCLE_MS: u64 = 4_000;
pub const DEFAULT_MAX_CYCLE_MS: u64 = 6_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1;

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            min_cycle_ms: DEFAULT_MIN_CYCLE_MS,
            max_cycle_ms: DEFAULT_MAX_CYCLE_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            send_delay_ms: 0,
            precision: ElapsedPrecision::default(),
            order: RetrievalOrder::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl CycleConfig {
    pub fn builder() -> CycleConfigBuilder {
        CycleConfigBuilder::new()
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn min_cycle(&self) -> Duration {
        Duration::from_millis(self.min_cycle_ms)
    }

    pub fn max_cycle(&self) -> Duration {
        Duration::from_millis(self.max_cycle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn send_delay(&self) -> Duration {
        Duration::from_millis(self.send_delay_ms)
    }

    /// Check every rule, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = Vec::new();

        checks.push(if self.min_cycle_ms == 0 {
            Validation::fail(ConfigViolation::ZeroMinCycle)
        } else {
            Validation::success(())
        });

        checks.push(if self.min_cycle_ms > self.max_cycle_ms {
            Validation::fail(ConfigViolation::InvertedCycle {
                min_ms: self.min_cycle_ms,
                max_ms: self.max_cycle_ms,
            })
        } else {
            Validation::success(())
        });

        checks.push(if self.poll_interval_ms == 0 {
            Validation::fail(ConfigViolation::ZeroPollInterval)
        } else {
            Validation::success(())
        });

        checks.push(if self.history_limit == 0 {
            Validation::fail(ConfigViolation::ZeroHistoryLimit)
        } else {
            Validation::success(())
        });

        Validation::all_vec(checks).map(|_| ())
    }

    /// [`validate`](Self::validate) folded into a `Result`.
    pub fn check(&self) -> Result<(), ConfigError> {
        match self.validate() {
            Validation::Success(()) => Ok(()),
            Validation::Failure(violations) => Err(ConfigError::Invalid(
                violations.iter().cloned().collect(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_four_to_six_second_cycle() {
        let config = CycleConfig::default();

        assert_eq!(config.min_cycle(), Duration::from_secs(4));
        assert_eq!(config.max_cycle(), Duration::from_secs(6));
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
        assert_eq!(config.send_delay(), Duration::ZERO);
        assert_eq!(config.order, RetrievalOrder::Lifo);
        assert_eq!(config.precision, ElapsedPrecision::Precise);
        assert!(config.validate().is_success());
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let config = CycleConfig {
            min_cycle_ms: 0,
            max_cycle_ms: 0,
            poll_interval_ms: 0,
            history_limit: 0,
            ..CycleConfig::default()
        };

        match config.validate() {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 3);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigViolation::ZeroMinCycle)));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigViolation::ZeroPollInterval)));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigViolation::ZeroHistoryLimit)));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn inverted_cycle_is_rejected() {
        let config = CycleConfig {
            min_cycle_ms: 500,
            max_cycle_ms: 100,
            ..CycleConfig::default()
        };

        let err = config.check().unwrap_err();
        match err {
            ConfigError::Invalid(violations) => assert_eq!(
                violations,
                vec![ConfigViolation::InvertedCycle {
                    min_ms: 500,
                    max_ms: 100
                }]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn equal_bounds_are_allowed() {
        let config = CycleConfig {
            min_cycle_ms: 250,
            max_cycle_ms: 250,
            ..CycleConfig::default()
        };

        assert!(config.check().is_ok());
    }

    #[test]
    fn elapsed_precision_truncates_to_whole_seconds() {
        let target = Duration::from_millis(4200);

        assert!(!ElapsedPrecision::Truncated.exceeds(Duration::from_millis(4999), target));
        assert!(ElapsedPrecision::Truncated.exceeds(Duration::from_millis(5000), target));
        assert!(ElapsedPrecision::Precise.exceeds(Duration::from_millis(4201), target));
        assert!(!ElapsedPrecision::Precise.exceeds(Duration::from_millis(4200), target));
    }

    #[test]
    fn from_json_fills_missing_fields_with_defaults() {
        let config =
            CycleConfig::from_json(r#"{ "order": "fifo", "precision": "truncated" }"#).unwrap();

        assert_eq!(config.order, RetrievalOrder::Fifo);
        assert_eq!(config.precision, ElapsedPrecision::Truncated);
        assert_eq!(config.min_cycle_ms, DEFAULT_MIN_CYCLE_MS);
        assert_eq!(config.max_cycle_ms, DEFAULT_MAX_CYCLE_MS);
    }

    #[test]
    fn from_json_rejects_unknown_fields() {
        let err = CycleConfig::from_json(r#"{ "cycle": 5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn from_json_validates_values() {
        let err = CycleConfig::from_json(r#"{ "poll_interval_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref v) if v == &[ConfigViolation::ZeroPollInterval]));
        assert!(err.to_string().contains("poll interval"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = CycleConfig::load("/nonexistent/phaselight/cycle.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_reads_config_file() {
        let path = std::env::temp_dir().join(format!("phaselight-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, r#"{ "min_cycle_ms": 10, "max_cycle_ms": 20 }"#).unwrap();

        let config = CycleConfig::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.min_cycle(), Duration::from_millis(10));
        assert_eq!(config.max_cycle(), Duration::from_millis(20));
    }
}
