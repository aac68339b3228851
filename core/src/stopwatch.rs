//! Countdown timer used by every timed state in the simulation.

use std::time::Duration;

/// Countdown timer that expires once its remaining time reaches zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stopwatch {
    remaining: Duration,
}

impl Stopwatch {
    /// Creates a stopwatch that has already expired.
    #[must_use]
    pub const fn expired_watch() -> Self {
        Self {
            remaining: Duration::ZERO,
        }
    }

    /// Restarts the countdown from the provided duration.
    pub fn reset(&mut self, duration: Duration) {
        self.remaining = duration;
    }

    /// Advances the countdown, saturating at zero.
    pub fn tick(&mut self, dt: Duration) {
        self.remaining = self.remaining.saturating_sub(dt);
    }

    /// Reports whether the countdown finished.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Time left before the countdown finishes.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_full_duration() {
        let mut watch = Stopwatch::expired_watch();
        assert!(watch.expired());

        watch.reset(Duration::from_millis(100));
        watch.tick(Duration::from_millis(60));
        assert!(!watch.expired());
        assert_eq!(watch.remaining(), Duration::from_millis(40));

        watch.tick(Duration::from_millis(60));
        assert!(watch.expired());
        assert_eq!(watch.remaining(), Duration::ZERO);
    }
}
