// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retention policy: computes `ExpiryTime` values for written records.
//!
//! Consulted only on writes. The same policy is applied to a thread's
//! metadata row and all of its messages, and each append refreshes the
//! metadata expiry from the same instant as the new message, so metadata
//! always expires at or after the newest message. An idle temporary thread
//! therefore disappears as a unit once its window lapses.

use chrono::{DateTime, Duration, Utc};
use colloquy_config::RetentionConfig;

/// Retention windows for temporary and ordinary threads.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    temporary: Duration,
    standard: Option<Duration>,
}

impl RetentionPolicy {
    /// Builds a policy with explicit windows. `None` for `standard` means
    /// ordinary threads never expire.
    pub fn new(temporary: Duration, standard: Option<Duration>) -> Self {
        Self {
            temporary,
            standard,
        }
    }

    pub fn from_config(config: &RetentionConfig) -> Self {
        Self {
            temporary: Duration::hours(config.temporary_hours as i64),
            standard: (config.standard_hours > 0)
                .then(|| Duration::hours(config.standard_hours as i64)),
        }
    }

    /// Expiry instant, in epoch seconds, for a record written at `now`.
    pub fn expiry_for(&self, is_temporary: bool, now: DateTime<Utc>) -> Option<u64> {
        let window = if is_temporary {
            self.temporary
        } else {
            self.standard?
        };
        Some((now + window).timestamp().max(0) as u64)
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::from_config(&RetentionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn temporary_threads_always_expire() {
        let policy = RetentionPolicy::new(Duration::hours(24), None);
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let expiry = policy.expiry_for(true, now).unwrap();
        assert_eq!(expiry, (now + Duration::hours(24)).timestamp() as u64);
    }

    #[test]
    fn ordinary_threads_keep_forever_by_default() {
        let policy = RetentionPolicy::default();
        let now = Utc::now();
        assert_eq!(policy.expiry_for(false, now), None);
        assert!(policy.expiry_for(true, now).is_some());
    }

    #[test]
    fn standard_window_applies_when_configured() {
        let policy = RetentionPolicy::from_config(&RetentionConfig {
            temporary_hours: 24,
            standard_hours: 8760,
        });
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let expiry = policy.expiry_for(false, now).unwrap();
        assert_eq!(expiry, (now + Duration::hours(8760)).timestamp() as u64);
    }
}
