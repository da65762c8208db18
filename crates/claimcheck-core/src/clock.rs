//! Clock abstraction for metadata timestamping
//!
//! Backends stamp `save-timestamp` and `read-timestamp` from a [`Clock`]
//! collaborator rather than the wall clock directly, so tests can pin time
//! with a [`FixedClock`] and assert exact metadata values.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use parking_lot::RwLock;

/// Provides the current time to storage backends.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Render a timestamp the way backends stamp it into metadata:
/// ISO-8601 with an explicit UTC offset.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Wall clock. Default for every backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock for tests.
///
/// Returns the instant it was constructed with until [`set`](FixedClock::set)
/// or [`advance`](FixedClock::advance) moves it. Shared via `Arc` when several
/// backends should observe the same time.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock pinned at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Pin the clock to a new instant.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write() = now;
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.write();
        *now = *now + delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}
