//! Clock implementations.
//!
//! The [`Clock`] trait lives in `jobharvest-core`; this module provides
//! the system implementation plus a manually-advanced clock for tests
//! that exercise the daily-reset boundary.

use chrono::{DateTime, Duration, Utc};
use jobharvest_core::Clock;
use std::sync::Mutex;
use tracing::warn;

/// Wall clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually-advanced clock.
///
/// Intended for tests of reset boundaries; no production code should
/// construct one.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at the given instant.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.lock();
        *now += by;
    }

    /// Jumps the clock to a specific instant.
    pub fn set(&self, to: DateTime<Utc>) {
        *self.lock() = to;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        self.now.lock().unwrap_or_else(|poisoned| {
            warn!("Manual clock mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_advances() {
        let start = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let clock = ManualClock::new(start);

        clock.advance(Duration::hours(13));
        assert_eq!(clock.now(), start + Duration::hours(13));
    }
}
