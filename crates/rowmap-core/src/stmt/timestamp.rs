//! Timestamps are stored with microsecond precision using a fixed-width,
//! UTC, `YYYY-MM-DD HH:MM:SS.ffffff` text rendering. The rendering is used
//! for SQLite storage, default-value literals, and content hashing.

use crate::Result;

use jiff::{civil::DateTime, tz::TimeZone, Timestamp};

/// Returns the current time truncated to microseconds.
pub fn now() -> Timestamp {
    let now = Timestamp::now();
    truncate(now).unwrap_or(now)
}

/// Drops sub-microsecond precision.
pub fn truncate(ts: Timestamp) -> Result<Timestamp> {
    Ok(Timestamp::from_microsecond(ts.as_microsecond())?)
}

/// Returns the smallest microsecond-precision instant that is both `>= now`
/// and strictly later than `prev`.
pub fn next_after(prev: Option<Timestamp>, now: Timestamp) -> Result<Timestamp> {
    let now = truncate(now)?;
    match prev {
        Some(prev) if now <= prev => Ok(Timestamp::from_microsecond(prev.as_microsecond() + 1)?),
        _ => Ok(now),
    }
}

/// Converts a timestamp to its UTC civil date-time.
pub fn to_civil(ts: Timestamp) -> DateTime {
    TimeZone::UTC.to_datetime(ts)
}

/// Interprets a civil date-time as UTC.
pub fn from_civil(dt: DateTime) -> Result<Timestamp> {
    Ok(dt.to_zoned(TimeZone::UTC)?.timestamp())
}

pub fn format(ts: Timestamp) -> String {
    let dt = to_civil(ts);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:06}",
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        dt.subsec_nanosecond() / 1_000
    )
}

/// Parses the stored rendering. The fractional part is optional so values
/// produced by a database `CURRENT_TIMESTAMP` default are accepted too.
pub fn parse(src: &str) -> Result<Timestamp> {
    let dt: DateTime = src.trim().replacen(' ', "T", 1).parse()?;
    truncate(from_civil(dt)?)
}
