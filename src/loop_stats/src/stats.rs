//! Daily time-in-range statistics.
//!
//! Readings are bucketed by calendar day and each day reports the share of readings
//! below, within, and above a [`TargetRange`]. Days are keyed by [`DayKey`] so rows
//! come out in chronological order. No smoothing or imputation is applied; a day
//! with two readings is reported with the same formula as a day with 288.
//!
//! Non-finite glucose values are not counted.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use serde::Serialize;

use crate::{
    day::DayKey,
    glucose::{Band, GlucoseReading, TargetRange},
    tz::{DstPolicy, fixed_midnight, local_midnight},
};

/// Percentages for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStatRow {
    /// Calendar day (`YYYY-DDD`).
    pub day: DayKey,
    /// Local midnight starting the day.
    pub date: DateTime<FixedOffset>,
    /// Readings counted for the day.
    pub readings: usize,
    /// Percent of readings at or below the lower bound.
    pub pct_below: f64,
    /// Percent of readings above the lower bound and at or below the upper bound.
    pub pct_inrange: f64,
    /// Percent of readings above the upper bound.
    pub pct_above: f64,
}

impl fmt::Display for DailyStatRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<8} {:>8} {:>6.1} {:>9.1} {:>6.1}",
            self.day.to_string(),
            self.readings,
            self.pct_below,
            self.pct_inrange,
            self.pct_above
        )
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    below: usize,
    inrange: usize,
    above: usize,
}

impl Counts {
    fn add(&mut self, band: Band) {
        match band {
            Band::Below => self.below += 1,
            Band::InRange => self.inrange += 1,
            Band::Above => self.above += 1,
        }
    }

    fn total(&self) -> usize {
        self.below + self.inrange + self.above
    }

    fn into_row(self, day: DayKey, date: DateTime<FixedOffset>) -> DailyStatRow {
        let n = self.total();
        let pct = |k: usize| {
            if n == 0 {
                0.0
            } else {
                k as f64 / n as f64 * 100.0
            }
        };
        DailyStatRow {
            day,
            date,
            readings: n,
            pct_below: pct(self.below),
            pct_inrange: pct(self.inrange),
            pct_above: pct(self.above),
        }
    }
}

fn bucket<I>(stamped: I, range: TargetRange) -> Vec<DailyStatRow>
where
    I: IntoIterator<Item = (DayKey, DateTime<FixedOffset>, f64)>,
{
    let mut days: BTreeMap<DayKey, (DateTime<FixedOffset>, Counts)> = BTreeMap::new();
    let mut skipped = 0usize;
    for (day, anchor, value) in stamped {
        let (date, counts) = days.entry(day).or_insert((anchor, Counts::default()));
        // earliest midnight wins so the row does not depend on input order
        if anchor < *date {
            *date = anchor;
        }
        if value.is_finite() {
            counts.add(range.classify(value));
        } else {
            skipped += 1;
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "ignored non-finite glucose values");
    }
    days.into_iter()
        .map(|(day, (date, counts))| counts.into_row(day, date))
        .collect()
}

/// One row per calendar day present in `readings`, in day order.
///
/// Days are read in each reading's own offset. When a day's readings carry different
/// offsets, `date` is the earliest of their midnights.
pub fn daily_stats(readings: &[GlucoseReading], range: TargetRange) -> Vec<DailyStatRow> {
    bucket(
        readings
            .iter()
            .map(|r| (DayKey::of(&r.timestamp), fixed_midnight(r.timestamp), r.value)),
        range,
    )
}

/// Like [`daily_stats`], but calendar days are read in `tz`.
pub fn daily_stats_in_tz(
    readings: &[GlucoseReading],
    tz: Tz,
    range: TargetRange,
) -> Vec<DailyStatRow> {
    bucket(
        readings.iter().map(|r| {
            let local = r.timestamp.with_timezone(&tz);
            let day = DayKey::of(&local);
            let anchor = local_midnight(day.date(), tz, DstPolicy::ShiftForward)
                .map(|m| m.fixed_offset())
                .unwrap_or_else(|_| fixed_midnight(local.fixed_offset()));
            (day, anchor, r.value)
        }),
        range,
    )
}

/// Plain-text report: a title line, a header, then one line per day.
pub fn render_report(rows: &[DailyStatRow], range: TargetRange) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format!("Target range: {} - {} mg/dL", range.min, range.max));
    lines.push(format!(
        "{:<8} {:>8} {:>6} {:>9} {:>6}",
        "day", "readings", "below", "in range", "above"
    ));
    lines.extend(rows.iter().map(DailyStatRow::to_string));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tz::parse_timestamp;

    fn reading(ts: &str, value: f64) -> GlucoseReading {
        GlucoseReading::new(parse_timestamp(ts).unwrap(), value)
    }

    #[test]
    fn boundary_day() {
        let rows = daily_stats(
            &[
                reading("2023-11-03T08:00:00-04:00", 70.0),
                reading("2023-11-03T09:00:00-04:00", 120.0),
                reading("2023-11-03T10:00:00-04:00", 180.0),
                reading("2023-11-03T11:00:00-04:00", 181.0),
            ],
            TargetRange::default(),
        );
        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.day.to_string(), "2023-307");
        assert_eq!(r.readings, 4);
        assert_eq!((r.pct_below, r.pct_inrange, r.pct_above), (25.0, 50.0, 25.0));
        assert_eq!(r.date, parse_timestamp("2023-11-03T00:00:00-04:00").unwrap());
    }

    #[test]
    fn days_split_on_local_midnight() {
        let readings = [
            reading("2023-11-03T23:55:00-04:00", 60.0),
            reading("2023-11-04T00:05:00-04:00", 200.0),
            reading("2023-11-04T00:10:00-04:00", 100.0),
        ];
        let rows = daily_stats(&readings, TargetRange::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].pct_below, 100.0);
        assert_eq!((rows[1].pct_inrange, rows[1].pct_above), (50.0, 50.0));
    }

    #[test]
    fn explicit_zone_moves_readings_between_days() {
        // 02:00Z on Nov 4 belongs to Nov 3 in US/Eastern.
        let readings = [
            reading("2023-11-04T02:00:00Z", 100.0),
            reading("2023-11-04T12:00:00Z", 100.0),
        ];
        assert_eq!(daily_stats(&readings, TargetRange::default()).len(), 1);

        let rows = daily_stats_in_tz(&readings, Tz::US__Eastern, TargetRange::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].day.to_string(), "2023-307");
        assert_eq!(rows[0].date, parse_timestamp("2023-11-03T00:00:00-04:00").unwrap());
    }

    #[test]
    fn dst_day_anchor_ignores_input_order() {
        let a = reading("2023-11-05T00:30:00-04:00", 100.0);
        let b = reading("2023-11-05T23:30:00-05:00", 100.0);
        let ab = daily_stats(&[a.clone(), b.clone()], TargetRange::default());
        let ba = daily_stats(&[b, a], TargetRange::default());
        assert_eq!(ab, ba);
        assert_eq!(ab.len(), 1);
        assert_eq!(ab[0].date, parse_timestamp("2023-11-05T00:00:00-04:00").unwrap());
        assert_eq!(ab[0].date.offset(), ba[0].date.offset());
        assert_eq!(ab[0].date.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn skipped_midnight_anchors_at_first_valid_instant() {
        // Sao Paulo skipped 00:00-01:00 on 2018-11-04.
        let tz: Tz = "America/Sao_Paulo".parse().unwrap();
        let rows = daily_stats_in_tz(
            &[reading("2018-11-04T12:00:00Z", 100.0)],
            tz,
            TargetRange::default(),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].day.to_string(), "2018-308");
        assert_eq!(rows[0].date, parse_timestamp("2018-11-04T01:00:00-02:00").unwrap());
        assert_eq!(rows[0].date.offset().local_minus_utc(), -2 * 3600);
    }

    #[test]
    fn nan_values_are_not_counted() {
        let rows = daily_stats(
            &[
                reading("2023-11-03T08:00:00Z", f64::NAN),
                reading("2023-11-03T09:00:00Z", 100.0),
            ],
            TargetRange::default(),
        );
        assert_eq!(rows[0].readings, 1);
        assert_eq!(rows[0].pct_inrange, 100.0);
    }

    #[test]
    fn day_with_only_nan_is_all_zero() {
        let rows = daily_stats(
            &[reading("2023-11-03T08:00:00Z", f64::NAN)],
            TargetRange::default(),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(
            (rows[0].pct_below, rows[0].pct_inrange, rows[0].pct_above),
            (0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn empty_input_gives_no_rows() {
        assert!(daily_stats(&[], TargetRange::default()).is_empty());
    }

    #[test]
    fn report_snapshot() {
        let rows = daily_stats(
            &[
                reading("2023-11-03T08:00:00-04:00", 70.0),
                reading("2023-11-03T09:00:00-04:00", 120.0),
                reading("2023-11-03T10:00:00-04:00", 180.0),
                reading("2023-11-03T11:00:00-04:00", 181.0),
            ],
            TargetRange::default(),
        );
        insta::assert_snapshot!(render_report(&rows, TargetRange::default()), @r"
Target range: 70 - 180 mg/dL
day      readings  below  in range  above
2023-307        4   25.0      50.0   25.0
");
    }
}
