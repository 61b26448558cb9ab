use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::profile::SettingKind;

/// Reasons a setting cannot be resolved for a query time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// No version storing the profile was effective at or before the query time.
    #[error("no version of profile {profile:?} is effective at {at}")]
    NoApplicableVersion {
        /// Query instant.
        at: DateTime<Utc>,
        /// Requested profile name.
        profile: String,
    },

    /// The resolved profile has no schedule for the requested kind.
    #[error("the requested setting, {kind}, is not one of: {}", join(available))]
    UnknownSetting {
        /// Requested setting kind.
        kind: SettingKind,
        /// Kinds the resolved profile does define.
        available: Vec<SettingKind>,
    },

    /// The query's local time of day precedes every schedule entry.
    #[error("no schedule entry starts before {local_seconds}s past local midnight (query {at})")]
    NoMatchingScheduleEntry {
        /// Query instant.
        at: DateTime<Utc>,
        /// Seconds since midnight in the profile's zone.
        local_seconds: u32,
    },
}

fn join(kinds: &[SettingKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
