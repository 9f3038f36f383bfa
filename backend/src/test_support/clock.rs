//! Deterministic clock for timestamp assertions.

use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

/// Clock that advances by a fixed step on every `utc()` read.
///
/// Consecutive reads are strictly increasing, which keeps `updated_at`
/// assertions meaningful. A zero step yields a frozen clock.
pub struct SteppingClock {
    now: Mutex<DateTime<Utc>>,
    step: TimeDelta,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step: TimeDelta) -> Self {
        Self {
            now: Mutex::new(start),
            step,
        }
    }

    /// Clock frozen at `now`.
    pub fn frozen(now: DateTime<Utc>) -> Self {
        Self::new(now, TimeDelta::zero())
    }

    /// Time the next read would return, without advancing.
    pub fn peek(&self) -> DateTime<Utc> {
        *self.lock()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut now = self.lock();
        let current = *now;
        *now = current + self.step;
        current
    }
}
