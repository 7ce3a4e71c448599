#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use apidelta_core::changelog::Changelog;
use apidelta_core::errors::ApiDeltaError;
use apidelta_core::exports::Content;
use apidelta_core::report::ReportOption;
use apidelta_core::version::{classify, classify_flags, select_baseline, ReleaseLabel};
use common::func;
use proptest::prelude::*;

fn decide(previous: &str, preview: bool, breaking: bool, additive: bool) -> (String, ReleaseLabel) {
    let decision = classify_flags(previous, preview, breaking, additive).unwrap();
    (decision.version.to_string(), decision.label)
}

fn breaking_changelog() -> Changelog {
    let mut old = Content::default();
    old.funcs.insert("NewClient".into(), func(&[], Some("*Client")));
    Changelog::between(Some(&old), Some(&Content::default()), ReportOption::All)
}

#[test]
fn test_first_ga_from_zero_with_breaking() {
    let decision = classify("0.5.0", false, &breaking_changelog()).unwrap();
    assert_eq!(decision.version.to_string(), "1.0.0");
    assert_eq!(decision.label, ReleaseLabel::FirstGABreakingChange);
}

#[test]
fn test_next_beta_on_empty_changelog() {
    let empty = Changelog::Modified(Default::default());
    let decision = classify("1.2.0-beta.1", true, &empty).unwrap();
    assert_eq!(decision.version.to_string(), "1.2.0-beta.2");
    assert_eq!(decision.label, ReleaseLabel::Beta);
}

#[test]
fn test_stable_from_beta_fails() {
    let empty = Changelog::Modified(Default::default());
    match classify("1.2.0-beta.1", false, &empty).unwrap_err() {
        ApiDeltaError::InvalidPreviousVersion { version } => assert_eq!(version, "1.2.0-beta.1"),
        other => panic!("expected InvalidPreviousVersion, got {other:?}"),
    }
}

#[test]
fn test_zero_major_rows() {
    for (breaking, additive) in [(true, false), (false, true), (false, false)] {
        let (version, _) = decide("0.5.0", false, breaking, additive);
        assert_eq!(version, "1.0.0");
    }
    assert_eq!(decide("0.5.0", false, false, true).1, ReleaseLabel::FirstGA);

    assert_eq!(decide("0.5.0", true, true, false), ("0.6.0".into(), ReleaseLabel::BetaBreakingChange));
    assert_eq!(decide("0.5.0", true, false, true), ("0.6.0".into(), ReleaseLabel::Beta));
    assert_eq!(decide("0.5.0", true, false, false), ("0.5.1".into(), ReleaseLabel::Beta));
}

#[test]
fn test_beta_line_rows() {
    assert_eq!(
        decide("1.2.0-beta.3", true, true, false),
        ("1.2.0-beta.4".into(), ReleaseLabel::BetaBreakingChange)
    );
    assert_eq!(decide("1.2.0-beta.3", true, false, true), ("1.2.0-beta.4".into(), ReleaseLabel::Beta));
    assert_eq!(decide("v1.2.0-beta.9", true, false, false), ("1.2.0-beta.10".into(), ReleaseLabel::Beta));
}

#[test]
fn test_preview_from_stable_rows() {
    assert_eq!(
        decide("1.4.2", true, true, false),
        ("2.0.0-beta.1".into(), ReleaseLabel::BetaBreakingChange)
    );
    assert_eq!(decide("1.4.2", true, false, true), ("1.5.0-beta.1".into(), ReleaseLabel::Beta));
    assert_eq!(decide("1.4.2", true, false, false), ("1.4.3-beta.1".into(), ReleaseLabel::Beta));
}

#[test]
fn test_stable_rows() {
    assert_eq!(
        decide("1.4.2", false, true, true),
        ("2.0.0".into(), ReleaseLabel::StableBreakingChange)
    );
    assert_eq!(decide("1.4.2", false, false, true), ("1.5.0".into(), ReleaseLabel::Stable));
    assert_eq!(decide("1.4.2", false, false, false), ("1.4.3".into(), ReleaseLabel::Stable));
}

#[test]
fn test_whole_package_markers_drive_flags() {
    let decision = classify("1.0.0", false, &Changelog::RemovedPackage).unwrap();
    assert_eq!(decision.label, ReleaseLabel::StableBreakingChange);
    let decision = classify("1.0.0", false, &Changelog::NewPackage).unwrap();
    assert_eq!(decision.version.to_string(), "1.1.0");
}

#[test]
fn test_malformed_previous_versions() {
    for previous in ["", "latest", "1.2", "1.2.0-beta.x"] {
        let err = classify_flags(previous, true, false, false).unwrap_err();
        assert!(
            matches!(err, ApiDeltaError::InvalidVersion { .. }),
            "{previous:?} gave {err:?}"
        );
    }
}

#[test]
fn test_stable_from_release_candidate_fails() {
    for (breaking, additive) in [(true, false), (false, true), (false, false)] {
        let err = classify_flags("1.2.0-rc.1", false, breaking, additive).unwrap_err();
        assert!(
            matches!(err, ApiDeltaError::InvalidPreviousVersion { ref version } if version == "1.2.0-rc.1"),
            "got {err:?}"
        );
    }
}

#[test]
fn test_preview_from_release_candidate_starts_beta_line() {
    assert_eq!(
        decide("1.2.0-rc.1", true, false, true),
        ("1.3.0-beta.1".into(), ReleaseLabel::Beta)
    );
}

#[test]
fn test_beta_in_tag_path_is_not_a_prerelease() {
    let previous = "sdk/resourcemanager/betaservice/armbetaservice/v1.2.0";
    assert_eq!(decide(previous, false, false, true), ("1.3.0".into(), ReleaseLabel::Stable));
    assert_eq!(
        decide(previous, true, false, true),
        ("1.3.0-beta.1".into(), ReleaseLabel::Beta)
    );

    let releases = [
        "sdk/resourcemanager/betaservice/armbetaservice/v1.3.0-beta.1",
        "sdk/resourcemanager/betaservice/armbetaservice/v1.2.0",
    ];
    assert_eq!(select_baseline(false, &releases), Some(releases[1]));
}

#[test]
fn test_select_baseline() {
    let releases = ["1.3.0-beta.2", "1.2.0", "1.2.0-beta.1", "1.1.0"];
    assert_eq!(select_baseline(true, &releases), Some("1.3.0-beta.2"));
    assert_eq!(select_baseline(false, &releases), Some("1.2.0"));

    let only_betas = vec!["0.2.0-beta.1".to_string()];
    assert_eq!(select_baseline(false, &only_betas), Some("0.2.0-beta.1"));

    let none: [&str; 0] = [];
    assert_eq!(select_baseline(true, &none), None);
}

proptest! {
    #[test]
    fn prop_classifier_is_total_over_valid_versions(
        major in 0u64..5,
        minor in 0u64..20,
        patch in 0u64..20,
        beta in prop::option::of(1u64..10),
        preview in any::<bool>(),
        breaking in any::<bool>(),
        additive in any::<bool>(),
    ) {
        let previous = match beta {
            Some(n) => format!("{major}.{minor}.{patch}-beta.{n}"),
            None => format!("{major}.{minor}.{patch}"),
        };
        let result = classify_flags(&previous, preview, breaking, additive);

        let stable_from_beta = major >= 1 && beta.is_some() && !preview;
        if stable_from_beta {
            prop_assert!(
                matches!(result, Err(ApiDeltaError::InvalidPreviousVersion { .. })),
                "expected InvalidPreviousVersion"
            );
        } else {
            let decision = result.unwrap();
            let label = decision.label.as_str();
            prop_assert_eq!(label.ends_with(",BreakingChange"), breaking);
            // Only a 1.x+ preview line carries a beta prerelease.
            prop_assert_eq!(decision.version.pre.is_empty(), !preview || major == 0);
            prop_assert!(decision.version > semver::Version::parse(&previous).unwrap()
                || (major == 0 && !preview));
        }
    }
}
