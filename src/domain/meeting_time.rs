// src/domain/meeting_time.rs
//
// Meeting dates are stored as naive, zero-padded `YYYY-MM-DDTHH:MM:SS` strings and
// range-queried with plain text comparison. That only orders correctly while every
// stored value has exactly this shape, so every write goes through
// `normalize_meeting_date`.

use crate::errors::ServerError;
use chrono::{Datelike, NaiveDate, NaiveDateTime};

pub const STAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DAY_FORMAT: &str = "%Y-%m-%d";

/// Input shapes accepted from forms (`datetime-local` sends minutes only).
const ACCEPTED_INPUT_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Canonical string for a meeting time. Sub-second precision is dropped.
pub fn format_stamp(at: NaiveDateTime) -> String {
    at.format(STAMP_FORMAT).to_string()
}

/// Inclusive text bounds covering the whole calendar day:
/// 00:00:00 through 23:59:59(.999, truncated to the stored precision).
pub fn day_bounds(day: NaiveDate) -> (String, String) {
    let d = day.format(DAY_FORMAT);
    (format!("{d}T00:00:00"), format!("{d}T23:59:59"))
}

/// Parse user input into the canonical stored form.
pub fn normalize_meeting_date(raw: &str) -> Result<String, ServerError> {
    let raw = raw.trim();
    let parsed = ACCEPTED_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| ServerError::BadRequest(format!("invalid meeting date: '{raw}'")))?;

    // Four-digit years only, otherwise text order stops matching time order.
    if !(1..=9999).contains(&parsed.year()) {
        return Err(ServerError::BadRequest(format!(
            "meeting date out of range: '{raw}'"
        )));
    }

    Ok(format_stamp(parsed))
}

/// Parse a stored canonical value back into a timestamp.
pub fn parse_stamp(stamp: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).ok()
}

/// `YYYY-MM-DD` from a calendar picker.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DAY_FORMAT).ok()
}

/// `YYYY-MM-DDTHH:MM`, the value shape a `datetime-local` input expects.
pub fn to_input_value(stamp: &str) -> String {
    stamp.chars().take(16).collect()
}
