//! Setting-at-time resolution.
//!
//! For each query instant:
//! 1. pick the most recent [`ProfileVersion`](crate::profile::ProfileVersion) that stores
//!    the requested profile and took effect at or before the instant;
//! 2. read the requested [`SettingKind`] schedule from that profile;
//! 3. convert the instant into that profile's zone (the version's when it names none)
//!    and take seconds since local midnight;
//! 4. return the value of the last schedule entry starting strictly before that time.
//!
//! [`resolve_settings`] is all-or-nothing over a batch. [`resolve_settings_each`] keeps
//! one result per query so callers can skip or default individual failures.

use chrono::{DateTime, Utc};

use crate::{
    error::ResolveError,
    profile::{ProfileHistory, SettingKind},
    tz::seconds_since_midnight,
};

/// Resolve one setting value at one instant.
pub fn resolve_setting(
    history: &ProfileHistory,
    at: DateTime<Utc>,
    kind: SettingKind,
    profile_name: &str,
) -> Result<f64, ResolveError> {
    let version = history.version_at(profile_name, at).ok_or_else(|| {
        ResolveError::NoApplicableVersion {
            at,
            profile: profile_name.to_string(),
        }
    })?;

    // version_at only returns versions that store the name
    let profile = version
        .profile(profile_name)
        .ok_or_else(|| ResolveError::NoApplicableVersion {
            at,
            profile: profile_name.to_string(),
        })?;

    let schedule = profile
        .schedule(kind)
        .ok_or_else(|| ResolveError::UnknownSetting {
            kind,
            available: profile.available(),
        })?;

    let local_seconds = seconds_since_midnight(at, profile.zone_or(version.timezone));
    schedule
        .entry_before(local_seconds)
        .map(|e| e.value)
        .ok_or(ResolveError::NoMatchingScheduleEntry { at, local_seconds })
}

/// Resolve `kind` for every query time, in input order. Fails on the first bad query.
pub fn resolve_settings(
    query_times: &[DateTime<Utc>],
    history: &ProfileHistory,
    kind: SettingKind,
    profile_name: &str,
) -> Result<Vec<f64>, ResolveError> {
    query_times
        .iter()
        .map(|&at| resolve_setting(history, at, kind, profile_name))
        .collect()
}

/// Resolve `kind` for every query time, keeping per-query failures.
pub fn resolve_settings_each(
    query_times: &[DateTime<Utc>],
    history: &ProfileHistory,
    kind: SettingKind,
    profile_name: &str,
) -> Vec<Result<f64, ResolveError>> {
    let out: Vec<_> = query_times
        .iter()
        .map(|&at| resolve_setting(history, at, kind, profile_name))
        .collect();
    let failed = out.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        tracing::debug!(
            setting = %kind,
            profile = profile_name,
            failed,
            total = out.len(),
            "some query times could not be resolved"
        );
    }
    out
}
