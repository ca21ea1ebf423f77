//! Creation-time handling with wire-format normalization.
//!
//! Documents arrive with `created_at` in one of three shapes, depending on
//! which client wrote them:
//!
//! - an RFC3339 string (`"2026-01-05T10:30:00Z"`),
//! - an epoch object (`{"seconds": 1767609000, "nanos": 0}`),
//! - absent, meaning the server stamps it at write time.
//!
//! `Timestamp` accepts the first two on deserialization and always serializes
//! back to the RFC3339 string form, so readers see a single representation.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A normalized point in time (UTC).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    pub fn from_epoch(seconds: i64, nanos: u32) -> Option<Self> {
        DateTime::from_timestamp(seconds, nanos).map(Self)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// The canonical read representation: RFC3339 with millisecond precision.
    pub fn to_iso(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl core::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_iso())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso())
    }
}

/// Accepted wire shapes. Absence is handled by the record (`Option<Timestamp>`).
#[derive(Deserialize)]
#[serde(untagged)]
enum WireTimestamp {
    Iso(String),
    Epoch {
        seconds: i64,
        #[serde(default)]
        nanos: u32,
    },
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match WireTimestamp::deserialize(deserializer)? {
            WireTimestamp::Iso(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| Self(dt.with_timezone(&Utc)))
                .map_err(|e| D::Error::custom(format!("invalid RFC3339 timestamp: {e}"))),
            WireTimestamp::Epoch { seconds, nanos } => Self::from_epoch(seconds, nanos)
                .ok_or_else(|| D::Error::custom("epoch timestamp out of range")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_rfc3339_string() {
        let ts: Timestamp = serde_json::from_str("\"2026-01-05T10:30:00Z\"").unwrap();
        assert_eq!(ts.to_iso(), "2026-01-05T10:30:00.000Z");
    }

    #[test]
    fn deserializes_epoch_object() {
        let ts: Timestamp =
            serde_json::from_str(r#"{"seconds": 1767609000, "nanos": 0}"#).unwrap();
        assert_eq!(ts.as_datetime().timestamp(), 1767609000);
    }

    #[test]
    fn epoch_object_without_nanos_defaults_to_zero() {
        let ts: Timestamp = serde_json::from_str(r#"{"seconds": 0}"#).unwrap();
        assert_eq!(ts.to_iso(), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn serializes_to_iso_string() {
        let ts = Timestamp::from_epoch(1767609000, 0).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2026-01-05T10:30:00.000Z\"");
    }

    #[test]
    fn rejects_garbage_string() {
        let err = serde_json::from_str::<Timestamp>("\"not a date\"");
        assert!(err.is_err());
    }

    #[test]
    fn normalizes_offset_to_utc() {
        let ts: Timestamp = serde_json::from_str("\"2026-01-05T12:30:00+02:00\"").unwrap();
        assert_eq!(ts.to_iso(), "2026-01-05T10:30:00.000Z");
    }
}
