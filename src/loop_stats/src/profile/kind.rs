//! Setting kinds stored as time-of-day schedules inside a named profile.
//!
//! The text form matches the keys used by profile documents, so a
//! [`SettingKind`] round-trips through config files and document stores:
//! ```
//! use loop_stats::profile::SettingKind;
//!
//! let kind: SettingKind = "sens".parse().unwrap();
//! assert_eq!(kind, SettingKind::Sensitivity);
//! assert_eq!(kind.to_string(), "sens");
//! ```

use std::{fmt, str::FromStr};

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Which schedule of a named profile to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SettingKind {
    /// Grams of carbohydrate covered by one unit of insulin.
    #[serde(rename = "carbratio")]
    CarbRatio,
    /// Insulin sensitivity factor (glucose drop per unit).
    #[serde(rename = "sens")]
    Sensitivity,
    /// Scheduled basal rate (U/h).
    #[serde(rename = "basal")]
    Basal,
    /// Lower bound of the correction target.
    #[serde(rename = "target_low")]
    TargetLow,
    /// Upper bound of the correction target.
    #[serde(rename = "target_high")]
    TargetHigh,
}

impl SettingKind {
    /// Every kind, in document order.
    pub const ALL: [SettingKind; 5] = [
        SettingKind::CarbRatio,
        SettingKind::Sensitivity,
        SettingKind::Basal,
        SettingKind::TargetLow,
        SettingKind::TargetHigh,
    ];

    /// Document key for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            SettingKind::CarbRatio => "carbratio",
            SettingKind::Sensitivity => "sens",
            SettingKind::Basal => "basal",
            SettingKind::TargetLow => "target_low",
            SettingKind::TargetHigh => "target_high",
        }
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "carbratio" => Ok(SettingKind::CarbRatio),
            "sens" => Ok(SettingKind::Sensitivity),
            "basal" => Ok(SettingKind::Basal),
            "target_low" => Ok(SettingKind::TargetLow),
            "target_high" => Ok(SettingKind::TargetHigh),
            other => bail!("unknown setting kind: {other}"),
        }
    }
}
