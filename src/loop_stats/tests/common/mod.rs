#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use indexmap::IndexMap;
use loop_stats::profile::{NamedProfile, ProfileVersion, Schedule, ScheduleEntry, SettingKind};
use serde_json::{Value, json};

pub const H: u32 = 3600;

/// Midnight UTC on 2023-11-01 plus `n` days.
pub fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 11, 1, 0, 0, 0).unwrap() + Duration::days(n)
}

pub fn schedule(rows: &[(u32, f64)]) -> Schedule {
    rows.iter()
        .map(|&(t, v)| ScheduleEntry::new(t, v).expect("entry"))
        .collect()
}

pub fn profile_with(kind: SettingKind, rows: &[(u32, f64)]) -> NamedProfile {
    NamedProfile {
        schedules: IndexMap::from([(kind, schedule(rows))]),
        ..Default::default()
    }
}

pub fn version(
    effective_at: DateTime<Utc>,
    tz: Tz,
    name: &str,
    profile: NamedProfile,
) -> ProfileVersion {
    ProfileVersion::new(effective_at, tz).with_profile(name, profile)
}

/// Two profile documents: carb ratio 10 from day 0, carb ratio 12/9 from day 5.
pub fn profile_docs() -> Value {
    json!([
        {
            "mills": day(0).timestamp_millis().to_string(),
            "defaultProfile": "Default",
            "store": {
                "Default": {
                    "timezone": "UTC",
                    "carbratio": [{"time": "00:00", "value": 10}],
                    "basal": [{"time": "00:00", "value": 0.8}, {"time": "06:00", "value": 1.1}]
                }
            }
        },
        {
            "mills": day(5).timestamp_millis(),
            "defaultProfile": "Default",
            "store": {
                "Default": {
                    "timezone": "UTC",
                    "carbratio": [{"time": "00:00", "value": 12}, {"time": "12:00", "value": 9}]
                }
            }
        }
    ])
}

/// Entries over two days from two uploaders plus a calibration record.
pub fn entry_docs() -> Value {
    json!([
        {
            "type": "sgv",
            "sgv": 65,
            "dateString": "2023-11-03T08:00:00.000Z",
            "device": "loop://Dexcom/G6/21.0"
        },
        {
            "type": "sgv",
            "sgv": 140,
            "dateString": "2023-11-03T13:00:00.000Z",
            "device": "loop://Dexcom/G6/21.0"
        },
        {"type": "sgv", "sgv": 140, "dateString": "2023-11-03T13:00:00.000Z", "device": "xDrip"},
        {
            "type": "sgv",
            "sgv": 210,
            "dateString": "2023-11-07T13:00:00.000Z",
            "device": "loop://Dexcom/G6/21.0"
        },
        {
            "type": "sgv",
            "sgv": 100,
            "dateString": "2023-11-07T14:00:00.000Z",
            "device": "loop://Dexcom/G6/21.0"
        },
        {"type": "cal", "slope": 900, "date": 1699020300000i64}
    ])
}
