//! Record sources.
//!
//! This module defines the [`RecordSource`] trait, the seam between the analysis
//! code and whatever fetched the raw documents. Analysis functions only ever see
//! already-materialized `Vec`s; a source decides where they come from.
//!
//! [`ExportDir`] reads the bulk JSON exports of the `profile` and `entries`
//! collections from a directory.
//!
//! # Example
//!
//! ```rust
//! use loop_stats::glucose::GlucoseReading;
//! use loop_stats::profile::ProfileVersion;
//! use loop_stats::source::RecordSource;
//!
//! struct Empty;
//!
//! impl RecordSource for Empty {
//!     fn profile_versions(&self) -> anyhow::Result<Vec<ProfileVersion>> {
//!         Ok(vec![])
//!     }
//!     fn glucose_readings(&self) -> anyhow::Result<Vec<GlucoseReading>> {
//!         Ok(vec![])
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    documents::{decode_entries_str, decode_profiles_str},
    glucose::GlucoseReading,
    profile::ProfileVersion,
};

/// File name of the profile collection export inside an [`ExportDir`].
pub const PROFILE_FILE: &str = "profile.json";
/// File name of the CGM entries collection export inside an [`ExportDir`].
pub const ENTRIES_FILE: &str = "entries.json";

/// Supplies fully-fetched profile versions and glucose readings.
pub trait RecordSource {
    /// Every profile version the source holds, in any order.
    fn profile_versions(&self) -> anyhow::Result<Vec<ProfileVersion>>;

    /// Every glucose reading the source holds, in any order.
    fn glucose_readings(&self) -> anyhow::Result<Vec<GlucoseReading>>;
}

/// Directory holding `profile.json` and `entries.json` exports (JSON arrays).
#[derive(Debug, Clone)]
pub struct ExportDir {
    root: PathBuf,
}

impl ExportDir {
    /// Source rooted at `root`. The directory must exist.
    pub fn new(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            anyhow::bail!("export directory {} does not exist", root.display());
        }
        Ok(Self { root })
    }

    /// Directory this source reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, file: &str) -> anyhow::Result<String> {
        let path = self.root.join(file);
        std::fs::read_to_string(&path)
            .with_context(|| format!("read export file {}", path.display()))
    }
}

impl RecordSource for ExportDir {
    fn profile_versions(&self) -> anyhow::Result<Vec<ProfileVersion>> {
        decode_profiles_str(&self.read(PROFILE_FILE)?)
            .with_context(|| format!("decode {PROFILE_FILE}"))
    }

    fn glucose_readings(&self) -> anyhow::Result<Vec<GlucoseReading>> {
        decode_entries_str(&self.read(ENTRIES_FILE)?)
            .with_context(|| format!("decode {ENTRIES_FILE}"))
    }
}
