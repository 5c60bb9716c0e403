use crate::ports::Clock;
use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// Controllable clock for tests.
///
/// Clones share the same instant, so a test can keep a handle and move time
/// while the service holds another.
#[derive(Debug, Clone)]
pub struct FixedClock {
    micros: Arc<AtomicI64>,
}

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self {
            micros: Arc::new(AtomicI64::new(at.and_utc().timestamp_micros())),
        }
    }

    pub fn set(&self, at: NaiveDateTime) {
        self.micros
            .store(at.and_utc().timestamp_micros(), Ordering::SeqCst);
    }

    pub fn advance(&self, by: TimeDelta) {
        let step = by.num_microseconds().unwrap_or(i64::MAX);
        self.micros.fetch_add(step, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        DateTime::from_timestamp_micros(self.micros.load(Ordering::SeqCst))
            .map(|at| at.naive_utc())
            .unwrap_or_default()
    }
}
