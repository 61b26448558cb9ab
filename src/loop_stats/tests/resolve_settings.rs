mod common;

use chrono::Duration;
use chrono_tz::Tz;
use common::{H, day, profile_with, version};
use loop_stats::{
    ProfileHistory, ResolveError, SettingKind, resolve_settings, resolve_settings_each,
};
use proptest::prelude::*;

fn two_versions() -> ProfileHistory {
    ProfileHistory::new(vec![
        version(day(0), Tz::UTC, "Default", profile_with(SettingKind::CarbRatio, &[(0, 10.0)])),
        version(day(5), Tz::UTC, "Default", profile_with(SettingKind::CarbRatio, &[(0, 7.0)])),
    ])
}

#[test]
fn version_selection_scenario() {
    let h = two_versions();
    let got = resolve_settings(
        &[day(3) + Duration::hours(1), day(7) + Duration::hours(1)],
        &h,
        SettingKind::CarbRatio,
        "Default",
    )
    .unwrap();
    assert_eq!(got, vec![10.0, 7.0]);
}

#[test]
fn schedule_scenario() {
    let h = ProfileHistory::new(vec![version(
        day(0),
        Tz::UTC,
        "Default",
        profile_with(SettingKind::CarbRatio, &[(0, 10.0), (12 * H, 8.0)]),
    )]);
    let q = |hh: i64, mm: i64| day(0) + Duration::hours(hh) + Duration::minutes(mm);
    let got = resolve_settings(
        &[q(13, 0), q(6, 0), q(23, 59)],
        &h,
        SettingKind::CarbRatio,
        "Default",
    )
    .unwrap();
    assert_eq!(got, vec![8.0, 10.0, 8.0]);
}

#[test]
fn dst_shift_changes_local_time_of_day() {
    // 11:30Z is 07:30 EDT on Nov 4 but 06:30 EST on Nov 6 (after fall back).
    let h = ProfileHistory::new(vec![version(
        day(0),
        Tz::US__Eastern,
        "Default",
        profile_with(SettingKind::Basal, &[(0, 0.8), (7 * H, 1.2)]),
    )]);
    let at = |d: i64| day(d) + Duration::hours(11) + Duration::minutes(30);
    let got = resolve_settings(&[at(3), at(5)], &h, SettingKind::Basal, "Default").unwrap();
    assert_eq!(got, vec![1.2, 0.8]);
}

#[test]
fn missing_profile_name_is_no_applicable_version() {
    let err = resolve_settings(&[day(9)], &two_versions(), SettingKind::CarbRatio, "Exercise")
        .unwrap_err();
    assert!(matches!(
        err,
        ResolveError::NoApplicableVersion { ref profile, .. } if profile == "Exercise"
    ));
}

#[test]
fn each_reports_failures_in_place() {
    let out = resolve_settings_each(
        &[day(-1), day(1) + Duration::hours(2), day(6)],
        &two_versions(),
        SettingKind::CarbRatio,
        "Default",
    );
    assert!(matches!(out[0], Err(ResolveError::NoApplicableVersion { .. })));
    assert_eq!(out[1], Ok(10.0));
    // exactly local midnight: no entry starts strictly before 00:00
    assert!(matches!(
        out[2],
        Err(ResolveError::NoMatchingScheduleEntry { local_seconds: 0, .. })
    ));
}

proptest! {
    #[test]
    fn after_latest_version_uses_latest(offset in 1i64..(365 * 86_400)) {
        prop_assume!(offset % 86_400 != 0);
        let at = day(5) + Duration::seconds(offset);
        let got =
            resolve_settings(&[at], &two_versions(), SettingKind::CarbRatio, "Default").unwrap();
        prop_assert_eq!(got, vec![7.0]);
    }

    #[test]
    fn before_earliest_version_fails(offset in 1i64..(365 * 86_400)) {
        let at = day(0) - Duration::seconds(offset);
        let err = resolve_settings(&[at], &two_versions(), SettingKind::CarbRatio, "Default")
            .unwrap_err();
        let is_no_version = matches!(err, ResolveError::NoApplicableVersion { .. });
        prop_assert!(is_no_version);
    }

    #[test]
    fn resolution_is_idempotent(
        offsets in proptest::collection::vec(-86_400i64..(10 * 86_400), 0..20)
    ) {
        let h = two_versions();
        let times: Vec<_> = offsets.iter().map(|s| day(0) + Duration::seconds(*s)).collect();
        let a = resolve_settings_each(&times, &h, SettingKind::CarbRatio, "Default");
        let b = resolve_settings_each(&times, &h, SettingKind::CarbRatio, "Default");
        prop_assert_eq!(a, b);
    }
}
