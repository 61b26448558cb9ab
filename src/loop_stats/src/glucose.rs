//! CGM readings and target ranges.

use anyhow::bail;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Default lower bound of the target range (mg/dL).
pub const DEFAULT_MIN_TARGET: f64 = 70.0;
/// Default upper bound of the target range (mg/dL).
pub const DEFAULT_MAX_TARGET: f64 = 180.0;

/// A single glucose reading.
///
/// The timestamp keeps the offset it was recorded with, so calendar days can be
/// read in the reading's own zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlucoseReading {
    /// When the reading was taken.
    pub timestamp: DateTime<FixedOffset>,
    /// Glucose concentration (e.g. mg/dL).
    pub value: f64,
    /// Uploader/device identifier, when the source records one.
    pub device: Option<String>,
}

impl GlucoseReading {
    /// Reading with no device attribution.
    pub fn new(timestamp: DateTime<FixedOffset>, value: f64) -> Self {
        Self {
            timestamp,
            value,
            device: None,
        }
    }
}

/// Keep only readings uploaded by `device`.
///
/// Sources often carry the same sensor values twice (e.g. from the pump loop and a
/// phone uploader); picking one device removes the duplicates.
pub fn filter_device(readings: Vec<GlucoseReading>, device: &str) -> Vec<GlucoseReading> {
    let before = readings.len();
    let kept: Vec<_> = readings
        .into_iter()
        .filter(|r| r.device.as_deref() == Some(device))
        .collect();
    tracing::debug!(device, before, kept = kept.len(), "filtered readings by device");
    kept
}

/// Target band: `value <= min` is below, `min < value <= max` is in range,
/// `value > max` is above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    /// Inclusive upper edge of "below".
    pub min: f64,
    /// Inclusive upper edge of "in range".
    pub max: f64,
}

impl TargetRange {
    /// Validated range; `min` must be strictly below `max`.
    pub fn new(min: f64, max: f64) -> anyhow::Result<Self> {
        if !(min.is_finite() && max.is_finite()) {
            bail!("target bounds must be finite (got {min}..{max})");
        }
        if min >= max {
            bail!("target min {min} must be below max {max}");
        }
        Ok(Self { min, max })
    }

    /// Which band `value` falls in.
    pub fn classify(&self, value: f64) -> Band {
        if value <= self.min {
            Band::Below
        } else if value <= self.max {
            Band::InRange
        } else {
            Band::Above
        }
    }
}

impl Default for TargetRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_TARGET,
            max: DEFAULT_MAX_TARGET,
        }
    }
}

/// Position of a reading relative to a [`TargetRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// At or below the lower bound.
    Below,
    /// Above the lower bound, at or below the upper bound.
    InRange,
    /// Above the upper bound.
    Above,
}
