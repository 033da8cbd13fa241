//! Due-date helpers: ISO-8601 parsing and formatting for naive date-times.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::TaskError;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Parse a due date like "2024-05-01", "2024-05-01T09" or "2024-05-01T09:30:00".
///
/// A bare date maps to midnight. A UTC offset (`+02:00`, `Z`) is accepted and
/// dropped: the wall-clock time is kept as written.
pub fn parse_due_date(input: &str) -> Result<NaiveDateTime, TaskError> {
    let mut s = input.trim().to_string();
    if let Some(rest) = s.strip_suffix('Z') {
        s = format!("{rest}+00:00");
    }
    // hour-only time
    if s.len() == 13 && matches!(s.as_bytes()[10], b'T' | b' ') {
        s.push_str(":00");
    }

    let mut last_err = None;
    for fmt in DATETIME_FORMATS {
        match NaiveDateTime::parse_from_str(&s, fmt) {
            Ok(dt) => return Ok(dt),
            Err(e) => last_err = Some(e),
        }
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&s, fmt) {
            return Ok(dt.naive_local());
        }
    }

    match NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        Ok(d) => Ok(d.and_time(NaiveTime::MIN)),
        Err(e) => Err(TaskError::InvalidDate {
            value: input.to_string(),
            source: last_err.unwrap_or(e),
        }),
    }
}

/// Format as `YYYY-MM-DDTHH:MM:SS`, adding six fractional digits only when
/// the sub-second part is non-zero.
pub fn format_due_date(dt: &NaiveDateTime) -> String {
    if dt.nanosecond() == 0 {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// `#[serde(with = ...)]` adapter storing a due date as its ISO-8601 text.
pub(crate) mod iso8601 {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_due_date(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_due_date(&raw).map_err(D::Error::custom)
    }
}
