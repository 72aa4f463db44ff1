//! Randomized cycle timer used by the toggle loop.

use crate::config::{CycleConfig, ElapsedPrecision};
use rand::Rng;
use std::time::{Duration, Instant};

/// Tracks when the current cycle started and how long it should last.
#[derive(Debug, Clone)]
pub(crate) struct CycleTimer {
    started: Instant,
    target: Duration,
    min: Duration,
    max: Duration,
    precision: ElapsedPrecision,
}

impl CycleTimer {
    pub(crate) fn start<R: Rng>(config: &CycleConfig, now: Instant, rng: &mut R) -> Self {
        let min = config.min_cycle();
        let max = config.max_cycle();
        Self {
            started: now,
            target: draw(min, max, rng),
            min,
            max,
            precision: config.precision,
        }
    }

    /// Begin a new cycle at `now` with a freshly drawn length.
    pub(crate) fn restart<R: Rng>(&mut self, now: Instant, rng: &mut R) {
        self.started = now;
        self.target = draw(self.min, self.max, rng);
    }

    pub(crate) fn is_due(&self, now: Instant) -> bool {
        self.precision
            .exceeds(now.saturating_duration_since(self.started), self.target)
    }

    pub(crate) fn target(&self) -> Duration {
        self.target
    }
}

/// Uniform draw from `[min, max]`.
fn draw<R: Rng>(min: Duration, max: Duration, rng: &mut R) -> Duration {
    if min >= max {
        return min;
    }
    Duration::from_secs_f64(rng.random_range(min.as_secs_f64()..=max.as_secs_f64()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(min_ms: u64, max_ms: u64, precision: ElapsedPrecision) -> CycleConfig {
        CycleConfig {
            min_cycle_ms: min_ms,
            max_cycle_ms: max_ms,
            precision,
            ..CycleConfig::default()
        }
    }

    #[test]
    fn draws_stay_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let min = Duration::from_secs(4);
        let max = Duration::from_secs(6);

        for _ in 0..1_000 {
            let drawn = draw(min, max, &mut rng);
            assert!(drawn >= min && drawn <= max, "{drawn:?} out of range");
        }
    }

    #[test]
    fn equal_bounds_draw_exact_value() {
        let mut rng = StdRng::seed_from_u64(1);
        let bound = Duration::from_millis(250);

        assert_eq!(draw(bound, bound, &mut rng), bound);
    }

    #[test]
    fn precise_timer_fires_after_target() {
        let mut rng = StdRng::seed_from_u64(3);
        let start = Instant::now();
        let timer = CycleTimer::start(&config(100, 100, ElapsedPrecision::Precise), start, &mut rng);

        assert_eq!(timer.target(), Duration::from_millis(100));
        assert!(!timer.is_due(start + Duration::from_millis(100)));
        assert!(timer.is_due(start + Duration::from_millis(101)));
    }

    #[test]
    fn truncated_timer_waits_for_next_whole_second() {
        let mut rng = StdRng::seed_from_u64(5);
        let start = Instant::now();
        let timer =
            CycleTimer::start(&config(4_200, 4_200, ElapsedPrecision::Truncated), start, &mut rng);

        assert!(!timer.is_due(start + Duration::from_millis(4_900)));
        assert!(timer.is_due(start + Duration::from_secs(5)));
    }

    #[test]
    fn restart_moves_cycle_start() {
        let mut rng = StdRng::seed_from_u64(9);
        let start = Instant::now();
        let mut timer = CycleTimer::start(&config(50, 50, ElapsedPrecision::Precise), start, &mut rng);

        let later = start + Duration::from_millis(60);
        assert!(timer.is_due(later));

        timer.restart(later, &mut rng);
        assert!(!timer.is_due(later + Duration::from_millis(10)));
    }
}
