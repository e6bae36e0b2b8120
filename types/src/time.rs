//! Timestamp type used throughout the engine.
//!
//! Timestamps are Unix epoch milliseconds (UTC). Block validity and proof of
//! work are timestamp-sensitive, so mutations use a server-synchronized value
//! rather than the local clock alone.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A Unix timestamp in milliseconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_millis();
        Self(millis as u64)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Shift by a signed offset in milliseconds, clamping at the epoch.
    pub fn offset_by(self, millis: i64) -> Self {
        if millis >= 0 {
            Self(self.0.saturating_add(millis as u64))
        } else {
            Self(self.0.saturating_sub(millis.unsigned_abs()))
        }
    }

    pub fn saturating_add(self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.as_millis() as u64))
    }

    pub fn saturating_sub(self, duration: Duration) -> Self {
        Self(self.0.saturating_sub(duration.as_millis() as u64))
    }

    /// Instants before the epoch clamp to it.
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self(u64::try_from(instant.timestamp_millis()).unwrap_or(0))
    }

    pub fn to_datetime(self) -> DateTime<Utc> {
        i64::try_from(self.0)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// RFC 3339 form with millisecond precision, e.g. `2024-05-01T10:00:00.250Z`.
    pub fn to_iso8601(self) -> String {
        self.to_datetime()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Milliseconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_by_positive_and_negative() {
        let t = Timestamp::from_millis(10_000);
        assert_eq!(t.offset_by(250), Timestamp::from_millis(10_250));
        assert_eq!(t.offset_by(-250), Timestamp::from_millis(9_750));
    }

    #[test]
    fn offset_by_clamps_at_epoch() {
        let t = Timestamp::from_millis(100);
        assert_eq!(t.offset_by(-1_000), Timestamp::EPOCH);
    }

    #[test]
    fn iso8601_has_millisecond_precision() {
        let t = Timestamp::from_millis(1_714_557_600_250);
        assert_eq!(t.to_iso8601(), "2024-05-01T10:00:00.250Z");
        assert_eq!(Timestamp::EPOCH.to_iso8601(), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn saturating_sub_duration() {
        let t = Timestamp::from_millis(120_000);
        assert_eq!(
            t.saturating_sub(Duration::from_secs(60)),
            Timestamp::from_millis(60_000)
        );
    }
}
