//! Human phrases describing how long ago a reading arrived.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

pub const NEVER_UPDATED: &str = "Nunca atualizado";
pub const UPDATED_NOW: &str = "Atualizado agora";

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse an ISO 8601 timestamp.
///
/// Offsets may be written with or without a colon. Values without an offset
/// are read as UTC; a bare date means midnight UTC.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Some(ts) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(input, fmt).ok())
    {
        return Some(ts.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// ISO 8601 with millisecond precision and a `Z` suffix.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Describe the time elapsed between `timestamp` and `now`.
///
/// Unparseable timestamps are treated as absent. Timestamps in the future
/// read as "now".
pub fn format_relative_at(timestamp: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(ts) = timestamp.and_then(parse_timestamp) else {
        return NEVER_UPDATED.to_string();
    };

    let minutes = (now - ts).num_minutes();
    if minutes < 1 {
        UPDATED_NOW.to_string()
    } else if minutes < 60 {
        format!("Atualizado há {} minutos", minutes)
    } else {
        format!("Atualizado há {} horas", minutes / 60)
    }
}
