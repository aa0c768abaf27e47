// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Time abstraction for deterministic testing.
//!
//! The console only needs wall-clock "now" (for frames it synthesizes), so
//! the clock is a read-only source with a controllable fake for tests.

use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Clock trait for time abstraction
pub trait Clock: Send + Sync {
    /// Get current time as milliseconds since epoch
    fn now_millis(&self) -> u64;

    /// Current time as an RFC 3339 UTC timestamp with millisecond precision.
    fn now_rfc3339(&self) -> String {
        let millis = i64::try_from(self.now_millis()).unwrap_or(i64::MAX);
        DateTime::<Utc>::from_timestamp_millis(millis)
            .unwrap_or_default()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Real clock using system time
#[derive(Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone, Debug)]
pub struct FakeClock {
    current_millis: Arc<AtomicU64>,
}

impl FakeClock {
    /// Create a new fake clock starting at a given time
    pub fn new(start_millis: u64) -> Self {
        Self {
            current_millis: Arc::new(AtomicU64::new(start_millis)),
        }
    }

    /// Create a fake clock starting at Unix epoch
    pub fn at_epoch() -> Self {
        Self::new(0)
    }

    /// Advance time by a duration
    pub fn advance(&self, duration: Duration) {
        self.current_millis
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    /// Set absolute time
    pub fn set(&self, millis: u64) {
        self.current_millis.store(millis, Ordering::SeqCst);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::at_epoch()
    }
}

impl Clock for FakeClock {
    fn now_millis(&self) -> u64 {
        self.current_millis.load(Ordering::SeqCst)
    }
}

/// Clock handle that can be either real or fake
#[derive(Clone, Debug)]
pub enum ClockHandle {
    System(SystemClock),
    Fake(FakeClock),
}

impl ClockHandle {
    /// Create a system clock handle
    pub fn system() -> Self {
        Self::System(SystemClock)
    }

    /// Create a fake clock handle at a specific time
    pub fn fake_at(millis: u64) -> Self {
        Self::Fake(FakeClock::new(millis))
    }

    /// Get as fake clock for manipulation (returns None for system clock)
    pub fn as_fake(&self) -> Option<&FakeClock> {
        match self {
            Self::Fake(f) => Some(f),
            Self::System(_) => None,
        }
    }
}

impl Clock for ClockHandle {
    fn now_millis(&self) -> u64 {
        match self {
            Self::System(c) => c.now_millis(),
            Self::Fake(c) => c.now_millis(),
        }
    }
}

impl Default for ClockHandle {
    fn default() -> Self {
        Self::system()
    }
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod tests;
