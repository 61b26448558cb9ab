//! Analysis configuration: parsing, normalization, and loading.
//!
//! The configuration is a small TOML file:
//!
//! ```toml
//! [targets]
//! min = 70
//! max = 180
//!
//! [profile]
//! name = "Default"
//! setting = "carbratio"
//!
//! [cgm]
//! device = "loop://Dexcom/G6/21.0"   # keep one uploader's readings
//! timezone = "US/Eastern"            # bucket days in this zone
//!
//! [source]
//! export_dir = "exports"
//! ```
//!
//! Every table and key is optional; defaults are a 70-180 mg/dL target, the
//! "Default" profile's carb ratio, all devices, and each reading's own offset.
//!
//! Entrypoints:
//! - Parse + normalize from a TOML string: [`load_config_str`]
//! - Parse + normalize from a file path: [`load_config_path`]
//! - Path from the `LOOP_STATS_CONFIG` environment variable: [`load_config_from_env`]

use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    glucose::{DEFAULT_MAX_TARGET, DEFAULT_MIN_TARGET, TargetRange},
    profile::SettingKind,
    tz::parse_timezone,
};

/// Environment variable naming the config file for [`load_config_from_env`].
pub const CONFIG_ENV: &str = "LOOP_STATS_CONFIG";

/// Errors related to locating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable required by the application is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Target band for time-in-range.
    #[serde(default)]
    pub targets: TargetsCfg,
    /// Which profile setting to resolve.
    #[serde(default)]
    pub profile: ProfileCfg,
    /// CGM reading selection.
    #[serde(default)]
    pub cgm: CgmCfg,
    /// Where exported documents live.
    #[serde(default)]
    pub source: SourceCfg,
}

/// `[targets]`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct TargetsCfg {
    /// Inclusive upper edge of "below" (mg/dL).
    pub min: f64,
    /// Inclusive upper edge of "in range" (mg/dL).
    pub max: f64,
}

impl Default for TargetsCfg {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_TARGET,
            max: DEFAULT_MAX_TARGET,
        }
    }
}

/// `[profile]`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ProfileCfg {
    /// Named profile to read.
    pub name: String,
    /// Schedule to read (`carbratio`, `sens`, `basal`, `target_low`, `target_high`).
    pub setting: String,
}

impl Default for ProfileCfg {
    fn default() -> Self {
        Self {
            name: "Default".into(),
            setting: SettingKind::CarbRatio.to_string(),
        }
    }
}

/// `[cgm]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CgmCfg {
    /// Keep only readings from this uploader.
    pub device: Option<String>,
    /// Zone to read calendar days in; `None` uses each reading's own offset.
    pub timezone: Option<String>,
}

/// `[source]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourceCfg {
    /// Directory with `profile.json` and `entries.json`.
    pub export_dir: Option<PathBuf>,
}

impl AnalysisConfig {
    /// Target band. Valid after [`normalize_config`].
    pub fn target_range(&self) -> anyhow::Result<TargetRange> {
        TargetRange::new(self.targets.min, self.targets.max)
    }

    /// Setting kind. Valid after [`normalize_config`].
    pub fn setting_kind(&self) -> anyhow::Result<SettingKind> {
        self.profile.setting.parse()
    }

    /// Day-bucketing zone, if configured.
    pub fn cgm_timezone(&self) -> anyhow::Result<Option<Tz>> {
        self.cgm.timezone.as_deref().map(parse_timezone).transpose()
    }
}

/// Normalize and validate a configuration in place.
///
/// - Trim profile name, setting, device, and zone
/// - Empty `device`/`timezone` become `None`
///
/// Errors:
/// - `targets.min >= targets.max` or non-finite bounds
/// - Empty profile name
/// - Unknown setting kind or time zone name
pub fn normalize_config(cfg: &mut AnalysisConfig) -> anyhow::Result<()> {
    cfg.target_range().context("invalid [targets]")?;

    cfg.profile.name = cfg.profile.name.trim().to_string();
    if cfg.profile.name.is_empty() {
        bail!("profile.name cannot be empty after trimming");
    }
    cfg.profile.setting = cfg.profile.setting.trim().to_string();
    cfg.setting_kind().context("invalid profile.setting")?;

    let trim_opt = |v: &mut Option<String>| {
        *v = v
            .take()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
    };
    trim_opt(&mut cfg.cgm.device);
    trim_opt(&mut cfg.cgm.timezone);
    cfg.cgm_timezone().context("invalid cgm.timezone")?;
    Ok(())
}

/// Parse and normalize a configuration from a TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<AnalysisConfig> {
    let mut cfg: AnalysisConfig = toml::from_str(toml_str).context("failed to parse config TOML")?;
    normalize_config(&mut cfg)?;
    tracing::debug!(?cfg, "loaded analysis config");
    Ok(cfg)
}

/// Read a TOML file from disk, parse, and normalize it.
pub fn load_config_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<AnalysisConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}

/// Reads an environment variable, returning a structured error if it's missing.
pub fn get_env_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

/// Load the file named by [`CONFIG_ENV`].
pub fn load_config_from_env() -> anyhow::Result<AnalysisConfig> {
    let path = get_env_var(CONFIG_ENV)?;
    load_config_path(path)
}
