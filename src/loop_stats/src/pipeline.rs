//! Config-driven glue between a [`RecordSource`] and the analysis functions.

use anyhow::{Context, anyhow};
use chrono::{DateTime, FixedOffset, Utc};

use crate::{
    config::AnalysisConfig,
    error::ResolveError,
    glucose::{GlucoseReading, filter_device},
    profile::ProfileHistory,
    resolver::resolve_settings_each,
    source::{ExportDir, RecordSource},
    stats::{DailyStatRow, daily_stats, daily_stats_in_tz},
};

/// Open the export directory named in `[source]`.
pub fn export_dir_from_config(cfg: &AnalysisConfig) -> anyhow::Result<ExportDir> {
    let dir = cfg
        .source
        .export_dir
        .as_ref()
        .ok_or_else(|| anyhow!("config has no source.export_dir"))?;
    ExportDir::new(dir.clone())
}

/// Readings from `source`, restricted to the configured device when one is set.
pub fn load_readings<S: RecordSource + ?Sized>(
    source: &S,
    cfg: &AnalysisConfig,
) -> anyhow::Result<Vec<GlucoseReading>> {
    let readings = source.glucose_readings().context("load glucose readings")?;
    Ok(match cfg.cgm.device.as_deref() {
        Some(device) => filter_device(readings, device),
        None => readings,
    })
}

/// Daily time-in-range rows for the configured targets, device, and zone.
pub fn daily_report<S: RecordSource + ?Sized>(
    source: &S,
    cfg: &AnalysisConfig,
) -> anyhow::Result<Vec<DailyStatRow>> {
    let readings = load_readings(source, cfg)?;
    let range = cfg.target_range()?;
    Ok(match cfg.cgm_timezone()? {
        Some(tz) => daily_stats_in_tz(&readings, tz, range),
        None => daily_stats(&readings, range),
    })
}

/// The configured profile setting in force at each reading's time, sorted by time.
pub fn settings_at_readings<S: RecordSource + ?Sized>(
    source: &S,
    cfg: &AnalysisConfig,
) -> anyhow::Result<Vec<(DateTime<FixedOffset>, Result<f64, ResolveError>)>> {
    let mut readings = load_readings(source, cfg)?;
    readings.sort_by_key(|r| r.timestamp);
    let history = ProfileHistory::new(source.profile_versions().context("load profiles")?);
    let kind = cfg.setting_kind()?;

    let times: Vec<DateTime<Utc>> = readings
        .iter()
        .map(|r| r.timestamp.with_timezone(&Utc))
        .collect();
    let values = resolve_settings_each(&times, &history, kind, &cfg.profile.name);
    Ok(readings
        .into_iter()
        .map(|r| r.timestamp)
        .zip(values)
        .collect())
}
