//! Decoding of stored documents into typed records.
//!
//! Profile and CGM-entry documents are loose JSON: numbers are sometimes written as
//! strings, optional fields come and go between uploader versions, and extra fields
//! are common. The serde models here accept that shape and convert it into
//! [`ProfileVersion`](crate::profile::ProfileVersion) and
//! [`GlucoseReading`](crate::glucose::GlucoseReading).
//!
//! Bulk decoders skip documents that cannot be converted and log a `warn!` for each,
//! so one malformed upload does not hide a year of data.

pub mod entry;
pub mod profile;

use anyhow::{Context, bail};
use serde::Deserialize;

pub use entry::{EntryDocument, decode_entries, decode_entries_str};
pub use profile::{ProfileDocument, decode_profiles, decode_profiles_str};

/// A number that may have been stored as JSON text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Num {
    /// Integral JSON number.
    Int(i64),
    /// Fractional JSON number.
    Float(f64),
    /// Numeric text, e.g. `"1698796800000"` or `"0.85"`.
    Text(String),
}

impl Num {
    /// Value as `f64`.
    pub fn as_f64(&self) -> anyhow::Result<f64> {
        match self {
            Num::Int(i) => Ok(*i as f64),
            Num::Float(f) => Ok(*f),
            Num::Text(s) => s
                .trim()
                .parse::<f64>()
                .with_context(|| format!("not a number: {s:?}")),
        }
    }

    /// Value as `i64`; fractional values are rejected.
    pub fn as_i64(&self) -> anyhow::Result<i64> {
        match self {
            Num::Int(i) => Ok(*i),
            Num::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(*f as i64),
            Num::Float(f) => bail!("not an integer: {f}"),
            Num::Text(s) => s
                .trim()
                .parse::<i64>()
                .with_context(|| format!("not an integer: {s:?}")),
        }
    }
}
