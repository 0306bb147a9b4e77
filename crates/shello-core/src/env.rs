//! Environment abstraction for deterministic testing.
//!
//! Decouples engine logic from the system clock. Production uses real
//! monotonic and wall-clock time; tests use virtual time that only moves when
//! the test advances it.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Abstract environment providing monotonic and wall-clock time.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Monotonic instant type.
    ///
    /// Production environments use `std::time::Instant`; tests may use any
    /// ordered type whose difference is a `Duration`.
    type Instant: Copy + Ord + Send + Sync + std::ops::Sub<Output = Duration>;

    /// Current monotonic time.
    ///
    /// # Invariants
    ///
    /// - Subsequent calls never return an earlier instant.
    fn now(&self) -> Self::Instant;

    /// Current wall-clock time, used to timestamp locally created log entries.
    fn wall_clock(&self) -> DateTime<Utc>;
}
