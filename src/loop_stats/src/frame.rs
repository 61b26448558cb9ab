//! Polars views of the daily statistics, for plotting and tabular export.
//!
//! Enabled with the `polars` feature. Column layout:
//! `day` (str, `YYYY-DDD`), `date` (datetime\[ms\], local midnight as UTC instant),
//! `readings` (u64), `pct_below`, `pct_inrange`, `pct_above` (f64).

use std::{fs::File, path::Path};

use anyhow::Context;
use polars::prelude::*;
use polars_io::SerWriter;
use polars_io::ipc::IpcWriter;

use crate::stats::DailyStatRow;

/// One row per day, in the order given.
pub fn daily_stats_frame(rows: &[DailyStatRow]) -> PolarsResult<DataFrame> {
    let millis: Vec<i64> = rows.iter().map(|r| r.date.timestamp_millis()).collect();
    let date = Series::new("date".into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

    DataFrame::new(vec![
        Column::new(
            "day".into(),
            rows.iter().map(|r| r.day.to_string()).collect::<Vec<_>>(),
        ),
        date.into(),
        Column::new(
            "readings".into(),
            rows.iter().map(|r| r.readings as u64).collect::<Vec<_>>(),
        ),
        Column::new(
            "pct_below".into(),
            rows.iter().map(|r| r.pct_below).collect::<Vec<_>>(),
        ),
        Column::new(
            "pct_inrange".into(),
            rows.iter().map(|r| r.pct_inrange).collect::<Vec<_>>(),
        ),
        Column::new(
            "pct_above".into(),
            rows.iter().map(|r| r.pct_above).collect::<Vec<_>>(),
        ),
    ])
}

/// Write the daily rows as an Arrow IPC (Feather) file.
pub fn write_daily_stats_ipc(rows: &[DailyStatRow], path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let mut df = daily_stats_frame(rows).context("build daily stats frame")?;
    let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    IpcWriter::new(&mut file)
        .finish(&mut df)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        glucose::{GlucoseReading, TargetRange},
        stats::daily_stats,
        tz::parse_timestamp,
    };

    fn rows() -> Vec<DailyStatRow> {
        let readings: Vec<_> = [
            ("2023-11-03T08:00:00-04:00", 60.0),
            ("2023-11-04T08:00:00-04:00", 120.0),
        ]
        .iter()
        .map(|(ts, v)| GlucoseReading::new(parse_timestamp(ts).unwrap(), *v))
        .collect();
        daily_stats(&readings, TargetRange::default())
    }

    #[test]
    fn frame_has_one_row_per_day() {
        let df = daily_stats_frame(&rows()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(
            df.get_column_names_str(),
            vec!["day", "date", "readings", "pct_below", "pct_inrange", "pct_above"]
        );
    }

    #[test]
    fn ipc_file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daily.feather");
        write_daily_stats_ipc(&rows(), &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
