//! Profile documents.
//!
//! One document is one saved snapshot of the profile store:
//!
//! ```json
//! {
//!   "mills": "1698796800000",
//!   "defaultProfile": "Default",
//!   "store": {
//!     "Default": {
//!       "timezone": "US/Eastern",
//!       "dia": 6,
//!       "carbratio": [{"time": "00:00", "value": 10, "timeAsSeconds": 0}],
//!       "sens":      [{"time": "00:00", "value": 45}],
//!       "basal":     [{"time": "00:00", "value": 0.85}]
//!     }
//!   }
//! }
//! ```
//!
//! Each stored profile keeps its own `timezone`. The version's fallback zone is taken
//! from the default profile, then from the first stored profile that names one.

use anyhow::{Context, anyhow, bail};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    documents::Num,
    profile::{NamedProfile, ProfileVersion, Schedule, ScheduleEntry, SettingKind, schedule},
    tz::{from_millis, parse_timestamp, parse_timezone},
};

/// Raw profile-store document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    /// Activation time, epoch milliseconds.
    #[serde(default)]
    pub mills: Option<Num>,
    /// Activation time as ISO-8601; used when `mills` is absent.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Name of the profile the uploader marked as default.
    #[serde(default)]
    pub default_profile: Option<String>,
    /// Named profiles, in document order.
    pub store: IndexMap<String, StoredProfile>,
}

/// Raw named profile inside `store`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoredProfile {
    /// IANA zone name for the schedules.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Carb ratio schedule.
    #[serde(default)]
    pub carbratio: Option<Vec<ScheduleRow>>,
    /// Sensitivity schedule.
    #[serde(default)]
    pub sens: Option<Vec<ScheduleRow>>,
    /// Basal schedule.
    #[serde(default)]
    pub basal: Option<Vec<ScheduleRow>>,
    /// Lower target schedule.
    #[serde(default)]
    pub target_low: Option<Vec<ScheduleRow>>,
    /// Upper target schedule.
    #[serde(default)]
    pub target_high: Option<Vec<ScheduleRow>>,
    /// Duration of insulin action.
    #[serde(default)]
    pub dia: Option<Num>,
    /// Carb absorption rate.
    #[serde(default)]
    pub carbs_hr: Option<Num>,
    /// Glucose units.
    #[serde(default)]
    pub units: Option<String>,
}

/// Raw schedule row.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    /// `"HH:MM"` start time.
    #[serde(default)]
    pub time: Option<String>,
    /// Setting value.
    pub value: Num,
    /// Start time as seconds since midnight; fallback when `time` is absent.
    #[serde(default)]
    pub time_as_seconds: Option<Num>,
}

impl ScheduleRow {
    fn to_entry(&self) -> anyhow::Result<ScheduleEntry> {
        let time_of_day = match (&self.time, &self.time_as_seconds) {
            (Some(t), _) => schedule::parse_time_of_day(t)?,
            (None, Some(secs)) => u32::try_from(secs.as_i64()?)
                .map_err(|_| anyhow!("negative timeAsSeconds"))?,
            (None, None) => bail!("schedule row has neither time nor timeAsSeconds"),
        };
        ScheduleEntry::new(time_of_day, self.value.as_f64()?)
    }
}

impl StoredProfile {
    fn rows(&self, kind: SettingKind) -> Option<&Vec<ScheduleRow>> {
        match kind {
            SettingKind::CarbRatio => self.carbratio.as_ref(),
            SettingKind::Sensitivity => self.sens.as_ref(),
            SettingKind::Basal => self.basal.as_ref(),
            SettingKind::TargetLow => self.target_low.as_ref(),
            SettingKind::TargetHigh => self.target_high.as_ref(),
        }
    }

    fn to_named(&self) -> anyhow::Result<NamedProfile> {
        let mut schedules = IndexMap::new();
        for kind in SettingKind::ALL {
            if let Some(rows) = self.rows(kind) {
                let entries = rows
                    .iter()
                    .map(ScheduleRow::to_entry)
                    .collect::<anyhow::Result<Vec<_>>>()
                    .with_context(|| format!("bad {kind} schedule"))?;
                schedules.insert(kind, Schedule::new(entries));
            }
        }
        Ok(NamedProfile {
            timezone: self.timezone.as_deref().map(parse_timezone).transpose()?,
            schedules,
            dia: self.dia.as_ref().map(Num::as_f64).transpose()?,
            carbs_hr: self.carbs_hr.as_ref().map(Num::as_f64).transpose()?,
            units: self.units.clone(),
        })
    }
}

impl ProfileDocument {
    /// Activation instant: `mills` first, then `startDate`.
    pub fn effective_at(&self) -> anyhow::Result<DateTime<Utc>> {
        if let Some(m) = &self.mills {
            let ms = m.as_i64().context("bad mills")?;
            return from_millis(ms).ok_or_else(|| anyhow!("mills out of range: {ms}"));
        }
        if let Some(s) = &self.start_date {
            return Ok(parse_timestamp(s)?.with_timezone(&Utc));
        }
        bail!("profile document has neither mills nor startDate")
    }

    fn timezone_name(&self) -> Option<&str> {
        let from_default = self
            .default_profile
            .as_deref()
            .and_then(|name| self.store.get(name))
            .and_then(|p| p.timezone.as_deref());
        from_default.or_else(|| self.store.values().find_map(|p| p.timezone.as_deref()))
    }

    /// Convert into a typed [`ProfileVersion`].
    pub fn into_version(self) -> anyhow::Result<ProfileVersion> {
        let effective_at = self.effective_at()?;
        let tz_name = self
            .timezone_name()
            .ok_or_else(|| anyhow!("no stored profile names a timezone"))?;
        let timezone = parse_timezone(tz_name)?;

        let mut named_profiles = IndexMap::with_capacity(self.store.len());
        for (name, stored) in &self.store {
            let named = stored
                .to_named()
                .with_context(|| format!("profile {name:?}"))?;
            named_profiles.insert(name.clone(), named);
        }
        Ok(ProfileVersion {
            effective_at,
            timezone,
            named_profiles,
        })
    }
}

/// Decode profile documents, skipping (and logging) the ones that do not convert.
pub fn decode_profiles(docs: Vec<serde_json::Value>) -> Vec<ProfileVersion> {
    let total = docs.len();
    let versions: Vec<_> = docs
        .into_iter()
        .enumerate()
        .filter_map(|(i, doc)| {
            let decoded = serde_json::from_value::<ProfileDocument>(doc)
                .context("profile document shape")
                .and_then(ProfileDocument::into_version);
            match decoded {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!(
                        index = i,
                        error = %format!("{e:#}"),
                        "skipping profile document"
                    );
                    None
                }
            }
        })
        .collect();
    tracing::debug!(total, decoded = versions.len(), "decoded profile documents");
    versions
}

/// Parse a JSON array of profile documents and decode it.
pub fn decode_profiles_str(json: &str) -> anyhow::Result<Vec<ProfileVersion>> {
    let docs: Vec<serde_json::Value> =
        serde_json::from_str(json).context("profile export is not a JSON array")?;
    Ok(decode_profiles(docs))
}
