//! ISO-8601 (RFC 3339, UTC) (de)serialization for [`Timestamp`].
//!
//! The clock and work services exchange instants as strings such as
//! `2024-05-01T10:00:00.250Z`. Use with
//! `#[serde(with = "atto_types::iso_format")]`.

use chrono::{DateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

use crate::{Timestamp, TypesError};

pub fn serialize<S: Serializer>(timestamp: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_iso8601())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(D::Error::custom)
}

/// Parse an RFC 3339 instant with any offset. Sub-millisecond digits are
/// truncated; instants before the epoch clamp to it.
pub fn parse(s: &str) -> Result<Timestamp, TypesError> {
    let instant = DateTime::parse_from_rfc3339(s.trim())
        .map_err(|e| TypesError::InvalidTimestamp(format!("{s}: {e}")))?;
    Ok(Timestamp::from_datetime(instant.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_zulu_with_and_without_fraction() {
        assert_eq!(
            parse("2024-05-01T10:00:00.250Z").unwrap(),
            Timestamp::from_millis(1_714_557_600_250)
        );
        assert_eq!(
            parse("2024-05-01T10:00:00Z").unwrap(),
            Timestamp::from_millis(1_714_557_600_000)
        );
    }

    #[test]
    fn nanoseconds_truncate_to_millis() {
        assert_eq!(
            parse("2024-05-01T10:00:00.250999999Z").unwrap(),
            Timestamp::from_millis(1_714_557_600_250)
        );
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        assert_eq!(
            parse("2024-05-01T12:00:00.250+02:00").unwrap(),
            Timestamp::from_millis(1_714_557_600_250)
        );
    }

    #[test]
    fn rejects_epoch_numbers() {
        assert!(matches!(
            parse("1714557600250"),
            Err(TypesError::InvalidTimestamp(_))
        ));
    }
}
