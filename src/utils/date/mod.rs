// Date utility functions
// Shared between the schedule API wire types and the views

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer};

/// Format a date the way the schedule API expects it (`YYYY-MM-DD`).
pub fn format_api_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// First day (Sunday) of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday() as i64;
    date - chrono::Duration::days(offset)
}

/// Format a local timestamp for task mutation payloads.
///
/// The backend accepts the naive local form submitted by its own
/// `datetime-local` inputs, so no offset is attached.
pub fn format_due_date(due: NaiveDateTime) -> String {
    due.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Parse a timestamp from the schedule API.
///
/// The API emits both RFC 3339 timestamps with an offset and naive local
/// timestamps (`2024-01-01T09:00:00`), depending on which service produced
/// the entry. Returns `None` for anything unparseable so a single bad entry
/// degrades to a skipped event instead of failing the whole fetch.
pub fn parse_flexible_datetime(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Local));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()?;

    Local.from_local_datetime(&naive).single()
}

/// Serde adapter for optional, leniently parsed timestamps.
///
/// Missing fields, `null`, and unparseable strings all deserialize to
/// `None`; they must never abort deserialization of the surrounding
/// timeline.
pub fn deserialize_flexible_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Local>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_flexible_datetime))
}
