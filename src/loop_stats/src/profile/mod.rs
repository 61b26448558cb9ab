//! Versioned dosing profiles.
//!
//! A [`ProfileVersion`] is one saved snapshot of the user's settings: when it took
//! effect, its fallback zone, and the named profiles it holds ("Default", "Exercise",
//! ...). Each [`NamedProfile`] maps a [`SettingKind`] to a time-of-day [`Schedule`]
//! and may declare its own zone, which wins over the version's.
//!
//! See [`history::ProfileHistory`] for the effective-at index used to pick the
//! version in force at a given instant.

pub mod history;
mod kind;
pub mod schedule;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use indexmap::IndexMap;

pub use history::ProfileHistory;
pub use kind::SettingKind;
pub use schedule::{Schedule, ScheduleEntry};

/// Settings bundle stored under one profile name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedProfile {
    /// Zone this profile's schedules are written in, when it declares one.
    pub timezone: Option<Tz>,
    /// Schedules keyed by setting kind, in document order.
    pub schedules: IndexMap<SettingKind, Schedule>,
    /// Duration of insulin action, hours.
    pub dia: Option<f64>,
    /// Carb absorption rate, grams per hour.
    pub carbs_hr: Option<f64>,
    /// Glucose units the targets and sensitivities are written in.
    pub units: Option<String>,
}

impl NamedProfile {
    /// Schedule for `kind`, if this profile defines one.
    pub fn schedule(&self, kind: SettingKind) -> Option<&Schedule> {
        self.schedules.get(&kind)
    }

    /// Zone to read schedule times in: this profile's own, else `fallback`.
    pub fn zone_or(&self, fallback: Tz) -> Tz {
        self.timezone.unwrap_or(fallback)
    }

    /// Setting kinds present, in document order.
    pub fn available(&self) -> Vec<SettingKind> {
        self.schedules.keys().copied().collect()
    }
}

/// One snapshot of the profile store.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileVersion {
    /// Instant this version became active.
    pub effective_at: DateTime<Utc>,
    /// Zone for named profiles that do not declare their own.
    pub timezone: Tz,
    /// Profiles by name; lookup is by key only.
    pub named_profiles: IndexMap<String, NamedProfile>,
}

impl ProfileVersion {
    /// New version with no named profiles.
    pub fn new(effective_at: DateTime<Utc>, timezone: Tz) -> Self {
        Self {
            effective_at,
            timezone,
            named_profiles: IndexMap::new(),
        }
    }

    /// Builder-style insert of a named profile.
    pub fn with_profile(mut self, name: impl Into<String>, profile: NamedProfile) -> Self {
        self.named_profiles.insert(name.into(), profile);
        self
    }

    /// Named profile lookup.
    pub fn profile(&self, name: &str) -> Option<&NamedProfile> {
        self.named_profiles.get(name)
    }

    /// True if this version stores a profile called `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.named_profiles.contains_key(name)
    }
}
