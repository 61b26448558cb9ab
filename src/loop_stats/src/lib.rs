//! Analytics over automated-insulin-delivery and CGM records.
//!
//! Two independent computations sit at the core:
//! - [`resolver`]: which profile setting (carb ratio, sensitivity, basal, targets) was
//!   in force at each query instant, given a versioned history of profile snapshots.
//! - [`stats`]: per-calendar-day percentages of glucose readings below, within, and
//!   above a target range.
//!
//! Around them: [`documents`] decodes stored JSON documents, [`source`] supplies them,
//! [`config`] loads the TOML settings, and [`pipeline`] wires the three together.

#![deny(missing_docs)]

pub mod config;
pub mod day;
pub mod documents;
/// Resolution errors.
pub mod error;
#[cfg(feature = "polars")]
pub mod frame;
pub mod glucose;
pub mod pipeline;
pub mod profile;
pub mod resolver;
pub mod source;
pub mod stats;
pub mod tz;

pub use error::ResolveError;
pub use glucose::{GlucoseReading, TargetRange};
pub use profile::{ProfileHistory, ProfileVersion, SettingKind};
pub use resolver::{resolve_setting, resolve_settings, resolve_settings_each};
pub use stats::{DailyStatRow, daily_stats, daily_stats_in_tz};
