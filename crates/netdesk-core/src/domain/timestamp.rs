//! Lenient timestamp parsing
//!
//! The backend serializes `LocalDateTime` values without an offset
//! (`2025-03-01T10:15:30`), while other deployments send RFC 3339. Both
//! are accepted; offset-less values are wall-clock time in the viewer's
//! local zone and are converted to UTC on the way in.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// All timestamps are UTC.
pub type Timestamp = DateTime<Utc>;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse a timestamp in any accepted format.
pub fn parse(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(from_local)
}

/// Interpret a naive wall-clock time in the local zone. Ambiguous times
/// take the earlier instant; times skipped by a DST jump fall back to UTC.
fn from_local(naive: NaiveDateTime) -> Timestamp {
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => {
            tracing::debug!(%naive, "local time does not exist, reading as UTC");
            naive.and_utc()
        }
    }
}

/// `deserialize_with` helper for required timestamps.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// `deserialize_with` helper for nullable timestamps.
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
    }
}
