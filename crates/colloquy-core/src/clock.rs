// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time source abstraction.
//!
//! The store and backends read the clock through this trait so that record
//! timestamps and TTL visibility are deterministic under test. Production
//! code uses [`SystemClock`]; tests inject a manual clock.

use chrono::{DateTime, Utc};

/// A source of the current wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current time as epoch milliseconds (clamped at zero).
    fn now_millis(&self) -> u64 {
        self.now().timestamp_millis().max(0) as u64
    }

    /// Current time as epoch seconds (clamped at zero), the unit of the
    /// `ExpiryTime` attribute.
    fn now_epoch_secs(&self) -> u64 {
        self.now().timestamp().max(0) as u64
    }
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
