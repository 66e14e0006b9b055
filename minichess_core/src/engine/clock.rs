use std::time::{Duration, Instant};

/// Hard cap on the share of the budget a search may use.
const MAX_BUDGET_FRACTION: f64 = 0.95;

/// Wall-clock deadline for one search call, polled cooperatively.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    /// Starts the clock now. `None` means no deadline.
    #[must_use]
    pub fn start(budget: Option<Duration>, fraction: f64) -> Self {
        Self {
            start: Instant::now(),
            limit: budget.map(|b| effective_limit(b, fraction)),
        }
    }

    #[must_use]
    pub fn unlimited() -> Self {
        Self::start(None, 1.0)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[must_use]
    pub const fn limit(&self) -> Option<Duration> {
        self.limit
    }

    #[must_use]
    pub fn expired(&self) -> bool {
        self.limit.is_some_and(|limit| self.elapsed() >= limit)
    }
}

/// `min(budget * fraction, 0.95 * budget)`. A fraction that is negative or
/// not finite yields a zero limit.
#[must_use]
pub fn effective_limit(budget: Duration, fraction: f64) -> Duration {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, MAX_BUDGET_FRACTION)
    } else {
        0.0
    };
    budget.mul_f64(fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Duration, expected_ms: u64) {
        let expected = Duration::from_millis(expected_ms);
        let diff = if actual > expected {
            actual - expected
        } else {
            expected - actual
        };
        assert!(diff < Duration::from_micros(1), "{actual:?} != {expected:?}");
    }

    #[test]
    fn test_limit_is_capped_at_95_percent() {
        let budget = Duration::from_millis(1000);
        assert_close(effective_limit(budget, 0.9), 900);
        assert_close(effective_limit(budget, 1.0), 950);
        assert_close(effective_limit(budget, 3.0), 950);
    }

    #[test]
    fn test_bad_fraction_gives_zero_limit() {
        let budget = Duration::from_millis(1000);
        assert_eq!(effective_limit(budget, -0.5), Duration::ZERO);
        assert_eq!(effective_limit(budget, f64::NAN), Duration::ZERO);
    }

    #[test]
    fn test_zero_budget_is_already_expired() {
        let deadline = Deadline::start(Some(Duration::ZERO), 0.9);
        assert!(deadline.expired());
    }

    #[test]
    fn test_unlimited_never_expires() {
        let deadline = Deadline::unlimited();
        assert!(deadline.limit().is_none());
        assert!(!deadline.expired());
    }

    #[test]
    fn test_generous_budget_not_expired() {
        let deadline = Deadline::start(Some(Duration::from_secs(60)), 0.9);
        assert!(!deadline.expired());
        assert_close(deadline.limit().unwrap_or_default(), 54_000);
    }
}
