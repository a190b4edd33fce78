//! Wall-clock source for timestamp freshness checks.

use chrono::Utc;

/// Current time as Unix seconds
pub trait Clock: Send + Sync {
    /// Seconds since the Unix epoch
    fn now_unix(&self) -> i64;
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_unix(&self) -> i64 {
        self.0
    }
}
