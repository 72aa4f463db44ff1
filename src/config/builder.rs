//! Builder API for creating cycle configurations.

use super::{CycleConfig, ConfigError, ElapsedPrecision};
use crate::queue::RetrievalOrder;
use std::time::Duration;

/// Fluent builder for [`CycleConfig`]. Starts from the defaults.
#[derive(Debug, Clone, Default)]
pub struct CycleConfigBuilder {
    config: CycleConfig,
}

impl CycleConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the range the cycle length is drawn from (inclusive).
    pub fn cycle(mut self, min: Duration, max: Duration) -> Self {
        self.config.min_cycle_ms = duration_ms(min);
        self.config.max_cycle_ms = duration_ms(max);
        self
    }

    /// Set the sleep between elapsed-time checks
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval_ms = duration_ms(interval);
        self
    }

    /// Set the pause taken before every publish
    pub fn send_delay(mut self, delay: Duration) -> Self {
        self.config.send_delay_ms = duration_ms(delay);
        self
    }

    pub fn precision(mut self, precision: ElapsedPrecision) -> Self {
        self.config.precision = precision;
        self
    }

    pub fn order(mut self, order: RetrievalOrder) -> Self {
        self.config.order = order;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<CycleConfig, ConfigError> {
        self.config.check()?;
        Ok(self.config)
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
