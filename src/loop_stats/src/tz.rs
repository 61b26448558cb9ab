//! Time zone parsing and conversion helpers.
//!
//! What this module provides:
//! - [`parse_timezone`]: Parse an IANA time zone name (e.g., "US/Eastern") into a [`Tz`].
//! - [`parse_timestamp`]: Parse an ISO-8601 timestamp, keeping the offset it was written with.
//! - [`from_millis`]: Convert epoch milliseconds (as stored in `mills`/`date` fields) to UTC.
//! - [`seconds_since_midnight`]: Wall-clock seconds elapsed since local midnight in a zone.
//! - [`local_midnight`]: The instant a calendar day starts in a zone, with a [`DstPolicy`]
//!   deciding what happens when midnight is skipped or repeated.
//!
//! Notes:
//! - Profile schedules are evaluated in the profile's own zone, never in the zone the
//!   glucose reading was uploaded with.
//! - Some zones (historically `America/Sao_Paulo`) start DST at 00:00, so local midnight
//!   does not exist on that day. [`DstPolicy::ShiftForward`] lands on the first valid instant.
//!
//! Examples
//! - "2023-11-03T10:05:00.000-0400" keeps its -04:00 offset.
//! - 2023-11-03T17:00:00Z in "US/Eastern" is 13:00 local, i.e. 46800 seconds since midnight.

use anyhow::Context;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// IANA zone name -> [`Tz`].
pub fn parse_timezone(name: &str) -> anyhow::Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("bad tz: {name}"))
}

/// ISO-8601 timestamp with an explicit offset.
///
/// Accepts RFC-3339 (`2023-11-03T14:05:00.000Z`, `2023-11-03T10:05:00-04:00`) and the
/// compact offset form some uploaders write (`2023-11-03T10:05:00.000-0400`).
pub fn parse_timestamp(s: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z")
        .with_context(|| format!("bad iso8601 timestamp: {s}"))
}

/// Milliseconds since the Unix epoch -> UTC instant.
pub fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

/// Seconds elapsed since local midnight for `instant` observed in `tz`.
///
/// Leap seconds are folded into the preceding second, so the result is always `< 86400`.
pub fn seconds_since_midnight(instant: DateTime<Utc>, tz: Tz) -> u32 {
    instant.with_timezone(&tz).num_seconds_from_midnight()
}

/// Policy for handling DST edge cases when converting local naive timestamps to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DstPolicy {
    /// Error on ambiguous (fall-back) or nonexistent (spring-forward) local times.
    Strict,
    /// For ambiguous local times, pick the earlier instant.
    PreferEarliest,
    /// For ambiguous local times, pick the later instant.
    PreferLatest,
    /// For nonexistent local times, step forward one minute at a time until a valid
    /// instant is found (capped at 2 hours). Ambiguous times take the earlier instant.
    ShiftForward,
}

/// Convert a naive local timestamp to UTC using a specific IANA time zone and DST policy.
///
/// Errors:
/// - Returns an error if the time is ambiguous or nonexistent and `policy` does not resolve it.
pub fn from_local_naive_with_policy(
    naive: NaiveDateTime,
    tz: Tz,
    policy: DstPolicy,
) -> anyhow::Result<DateTime<Utc>> {
    use chrono::offset::LocalResult::*;
    match tz.from_local_datetime(&naive) {
        Single(dt) => Ok(dt.with_timezone(&Utc)),
        Ambiguous(a, b) => match policy {
            DstPolicy::PreferEarliest | DstPolicy::ShiftForward => Ok(a.with_timezone(&Utc)),
            DstPolicy::PreferLatest => Ok(b.with_timezone(&Utc)),
            DstPolicy::Strict => Err(anyhow::anyhow!("ambiguous local time {naive} in {tz}")),
        },
        None => match policy {
            DstPolicy::ShiftForward => {
                let mut t = naive;
                for _ in 0..120 {
                    t += chrono::Duration::minutes(1);
                    if let Single(dt) = tz.from_local_datetime(&t) {
                        return Ok(dt.with_timezone(&Utc));
                    }
                }
                Err(anyhow::anyhow!("nonexistent local time {naive} in {tz}"))
            }
            _ => Err(anyhow::anyhow!("nonexistent local time {naive} in {tz}")),
        },
    }
}

/// Instant at which `date` begins in `tz`.
pub fn local_midnight(date: NaiveDate, tz: Tz, policy: DstPolicy) -> anyhow::Result<DateTime<Tz>> {
    let utc = from_local_naive_with_policy(date.and_time(NaiveTime::MIN), tz, policy)?;
    Ok(utc.with_timezone(&tz))
}

/// Local midnight of the day `dt` falls on, keeping `dt`'s fixed offset.
pub fn fixed_midnight(dt: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    dt - chrono::Duration::seconds(i64::from(dt.num_seconds_from_midnight()))
        - chrono::Duration::nanoseconds(i64::from(dt.nanosecond()))
}
