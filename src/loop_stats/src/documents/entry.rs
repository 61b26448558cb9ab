//! CGM entry documents.
//!
//! ```json
//! {"type": "sgv", "sgv": 123, "dateString": "2023-11-03T10:05:00.000-0400",
//!  "date": 1699020300000, "device": "loop://Dexcom/G6/21.0"}
//! ```
//!
//! `dateString` is authoritative and keeps the uploader's offset; `date` (epoch
//! milliseconds) is the fallback and is read as UTC. Entries without `sgv`
//! (calibrations, meter checks) are not glucose readings and are skipped.

use anyhow::{Context, anyhow, bail};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::{
    documents::Num,
    glucose::GlucoseReading,
    tz::{from_millis, parse_timestamp},
};

/// Raw entry document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDocument {
    /// Sensor glucose value.
    #[serde(default)]
    pub sgv: Option<Num>,
    /// ISO-8601 reading time.
    #[serde(default)]
    pub date_string: Option<String>,
    /// Reading time, epoch milliseconds.
    #[serde(default)]
    pub date: Option<Num>,
    /// Uploader identifier.
    #[serde(default)]
    pub device: Option<String>,
}

impl EntryDocument {
    fn timestamp(&self) -> anyhow::Result<DateTime<FixedOffset>> {
        if let Some(s) = &self.date_string {
            return parse_timestamp(s);
        }
        if let Some(d) = &self.date {
            let ms = d.as_i64().context("bad date")?;
            return from_millis(ms)
                .map(|t| t.fixed_offset())
                .ok_or_else(|| anyhow!("date out of range: {ms}"));
        }
        bail!("entry has neither dateString nor date")
    }

    /// Convert into a reading; `Ok(None)` for entries that carry no glucose value.
    pub fn into_reading(self) -> anyhow::Result<Option<GlucoseReading>> {
        let Some(sgv) = &self.sgv else {
            return Ok(None);
        };
        let value = sgv.as_f64().context("bad sgv")?;
        let timestamp = self.timestamp()?;
        Ok(Some(GlucoseReading {
            timestamp,
            value,
            device: self.device,
        }))
    }
}

/// Decode entry documents, skipping non-glucose entries and logging undecodable ones.
pub fn decode_entries(docs: Vec<serde_json::Value>) -> Vec<GlucoseReading> {
    let total = docs.len();
    let mut not_sgv = 0usize;
    let mut readings = Vec::with_capacity(total);
    for (i, doc) in docs.into_iter().enumerate() {
        let decoded = serde_json::from_value::<EntryDocument>(doc)
            .context("entry document shape")
            .and_then(EntryDocument::into_reading);
        match decoded {
            Ok(Some(r)) => readings.push(r),
            Ok(None) => not_sgv += 1,
            Err(e) => {
                tracing::warn!(index = i, error = %format!("{e:#}"), "skipping entry document")
            }
        }
    }
    tracing::debug!(total, decoded = readings.len(), not_sgv, "decoded entry documents");
    readings
}

/// Parse a JSON array of entry documents and decode it.
pub fn decode_entries_str(json: &str) -> anyhow::Result<Vec<GlucoseReading>> {
    let docs: Vec<serde_json::Value> =
        serde_json::from_str(json).context("entries export is not a JSON array")?;
    Ok(decode_entries(docs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn date_string_keeps_offset() {
        let out = decode_entries(vec![json!({
            "type": "sgv",
            "sgv": 123,
            "dateString": "2023-11-03T10:05:00.000-0400",
            "date": 1699020300000i64,
            "device": "loop://Dexcom/G6/21.0"
        })]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, 123.0);
        assert_eq!(out[0].timestamp.offset().local_minus_utc(), -4 * 3600);
        assert_eq!(out[0].device.as_deref(), Some("loop://Dexcom/G6/21.0"));
    }

    #[test]
    fn falls_back_to_epoch_millis() {
        let out = decode_entries(vec![json!({"sgv": "98", "date": 1699020300000i64})]);
        assert_eq!(
            out[0].timestamp,
            Utc.with_ymd_and_hms(2023, 11, 3, 14, 5, 0).unwrap().fixed_offset()
        );
        assert_eq!(out[0].value, 98.0);
    }

    #[test]
    fn calibrations_and_garbage_are_skipped() {
        let out = decode_entries(vec![
            json!({"type": "cal", "slope": 900, "date": 1699020300000i64}),
            json!({"sgv": 100}),
            json!({"sgv": 100, "dateString": "yesterday"}),
            json!({"sgv": 101, "dateString": "2023-11-03T14:05:00Z"}),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, 101.0);
    }
}
