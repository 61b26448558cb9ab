//! Calendar-day keys for bucketing readings.
//!
//! - A day is identified by (year, day-of-year) in whatever zone the timestamp carries.
//! - Keys order chronologically, so a `BTreeMap<DayKey, _>` iterates days in order.
//! - Text form is `YYYY-DDD` with a zero-padded ordinal (e.g., `2023-307`).

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use serde::{Serialize, Serializer};

/// One calendar day: year plus 1-based day of year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey {
    year: i32,
    ordinal: u32,
}

impl DayKey {
    /// Build a key, validating the ordinal against the year's length.
    pub fn new(year: i32, ordinal: u32) -> anyhow::Result<Self> {
        if NaiveDate::from_yo_opt(year, ordinal).is_none() {
            bail!("day {ordinal} does not exist in {year}");
        }
        Ok(Self { year, ordinal })
    }

    /// Day `dt` falls on, read in `dt`'s own zone.
    pub fn of<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self {
            year: dt.year(),
            ordinal: dt.ordinal(),
        }
    }

    /// Calendar year.
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// 1-based day of year.
    pub const fn ordinal(&self) -> u32 {
        self.ordinal
    }

    /// The calendar date this key names.
    pub fn date(&self) -> NaiveDate {
        // ordinal is validated on construction
        NaiveDate::from_yo_opt(self.year, self.ordinal).unwrap_or(NaiveDate::MIN)
    }
}

impl From<NaiveDate> for DayKey {
    fn from(d: NaiveDate) -> Self {
        Self {
            year: d.year(),
            ordinal: d.ordinal(),
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:03}", self.year, self.ordinal)
    }
}

impl FromStr for DayKey {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (y, d) = s
            .rsplit_once('-')
            .ok_or_else(|| anyhow!("expected YYYY-DDD, got {s}"))?;
        let year: i32 = y.parse().map_err(|_| anyhow!("bad year in {s}"))?;
        let ordinal: u32 = d.parse().map_err(|_| anyhow!("bad day of year in {s}"))?;
        Self::new(year, ordinal)
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
