//! Time-of-day schedules.

use anyhow::{Context, anyhow, bail};
use serde::Serialize;

/// Seconds in one day; every `time_of_day` is below this.
pub const SECS_PER_DAY: u32 = 24 * 60 * 60;

/// One row of a schedule: the value that applies from `time_of_day` onward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduleEntry {
    /// Seconds since local midnight.
    pub time_of_day: u32,
    /// Setting value (ratio, sensitivity, rate, or target).
    pub value: f64,
}

impl ScheduleEntry {
    /// Build an entry, rejecting times outside one day.
    pub fn new(time_of_day: u32, value: f64) -> anyhow::Result<Self> {
        if time_of_day >= SECS_PER_DAY {
            bail!("time_of_day {time_of_day} is outside a day");
        }
        Ok(Self { time_of_day, value })
    }
}

/// Entries sorted ascending by `time_of_day`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    /// Sort `entries` by time of day. Entries sharing a time keep their input order.
    pub fn new(mut entries: Vec<ScheduleEntry>) -> Self {
        entries.sort_by_key(|e| e.time_of_day);
        Self { entries }
    }

    /// Entries in ascending time-of-day order.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// True if the schedule has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry with the greatest `time_of_day` strictly below `local_seconds`.
    ///
    /// There is no wrap-around: a query earlier than (or equal to) the first entry
    /// returns `None` rather than the previous day's last entry.
    pub fn entry_before(&self, local_seconds: u32) -> Option<&ScheduleEntry> {
        let idx = self
            .entries
            .partition_point(|e| e.time_of_day < local_seconds);
        idx.checked_sub(1).map(|i| &self.entries[i])
    }
}

impl FromIterator<ScheduleEntry> for Schedule {
    fn from_iter<I: IntoIterator<Item = ScheduleEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Parse `"HH:MM"` (or `"HH:MM:SS"`) into seconds since midnight.
pub fn parse_time_of_day(s: &str) -> anyhow::Result<u32> {
    let mut parts = s.trim().split(':');
    let mut next = |what: &str| -> anyhow::Result<Option<u32>> {
        parts
            .next()
            .map(|p| p.parse::<u32>().with_context(|| format!("bad {what} in {s:?}")))
            .transpose()
    };
    let h = next("hour")?.ok_or_else(|| anyhow!("empty time of day"))?;
    let m = next("minute")?.ok_or_else(|| anyhow!("missing minutes in {s:?}"))?;
    let sec = next("second")?.unwrap_or(0);
    if parts.next().is_some() || h > 23 || m > 59 || sec > 59 {
        bail!("bad time of day: {s:?}");
    }
    Ok(h * 3600 + m * 60 + sec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sched(rows: &[(u32, f64)]) -> Schedule {
        rows.iter()
            .map(|&(t, v)| ScheduleEntry::new(t, v).unwrap())
            .collect()
    }

    #[test]
    fn parses_hh_mm() {
        assert_eq!(parse_time_of_day("00:00").unwrap(), 0);
        assert_eq!(parse_time_of_day("06:30").unwrap(), 6 * 3600 + 30 * 60);
        assert_eq!(parse_time_of_day("23:59:59").unwrap(), SECS_PER_DAY - 1);
        assert!(parse_time_of_day("24:00").is_err());
        assert!(parse_time_of_day("7").is_err());
        assert!(parse_time_of_day("ab:cd").is_err());
    }

    #[test]
    fn entries_are_sorted() {
        let s = sched(&[(43_200, 8.0), (0, 10.0)]);
        assert_eq!(s.entries()[0].value, 10.0);
        assert_eq!(s.entries()[1].value, 8.0);
    }

    #[test]
    fn lookup_is_strictly_before() {
        let s = sched(&[(0, 10.0), (43_200, 8.0)]);
        assert_eq!(s.entry_before(6 * 3600).unwrap().value, 10.0);
        // exactly on the boundary still reads the earlier row
        assert_eq!(s.entry_before(43_200).unwrap().value, 10.0);
        assert_eq!(s.entry_before(43_201).unwrap().value, 8.0);
        assert!(s.entry_before(0).is_none());
    }

    #[test]
    fn no_wrap_around_before_first_entry() {
        let s = sched(&[(3_600, 1.2), (79_200, 0.9)]);
        assert!(s.entry_before(1_800).is_none());
    }

    #[test]
    fn out_of_day_entry_rejected() {
        assert!(ScheduleEntry::new(SECS_PER_DAY, 1.0).is_err());
    }
}
