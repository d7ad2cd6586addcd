// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction so scheduling logic can be tested with controlled time.

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of time for the scheduler and reconciler.
pub trait Clock: Send + Sync {
    /// Monotonic instant, for intervals and deadlines.
    fn now(&self) -> Instant;

    /// Wall-clock time in UTC, for trigger fire-time math.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock for tests. Starts at a fixed epoch and only moves
/// when [`advance`](FakeClock::advance) is called.
#[derive(Debug, Clone)]
pub struct FakeClock {
    base_instant: Instant,
    base_utc: DateTime<Utc>,
    offset: Arc<Mutex<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            base_instant: Instant::now(),
            // Fixed origin so fire times are reproducible across runs.
            base_utc: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().unwrap_or_default(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Move the clock forward by `d`.
    pub fn advance(&self, d: Duration) {
        *self.offset.lock() += d;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.base_instant + *self.offset.lock()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.base_utc
            + chrono::Duration::from_std(*self.offset.lock()).unwrap_or(chrono::Duration::zero())
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
