//! Next-version classifier.
//!
//! A pure function of `(previous, is_preview, has_breaking, has_additive)`:
//!
//! | previous                | target  | breaking              | additive          | fix only          |
//! |-------------------------|---------|-----------------------|-------------------|-------------------|
//! | `0.x`                   | stable  | `1.0.0` FirstGA,Brk   | `1.0.0` FirstGA   | `1.0.0` FirstGA   |
//! | `0.x`                   | preview | minor+1 Beta,Brk      | minor+1 Beta      | patch+1 Beta      |
//! | `≥1`, beta              | preview | `beta.N+1` Beta,Brk   | `beta.N+1` Beta   | `beta.N+1` Beta   |
//! | `≥1`, no beta           | preview | major+1 `-beta.1`     | minor+1 `-beta.1` | patch+1 `-beta.1` |
//! | `≥1`, no beta           | stable  | major+1 Stable,Brk    | minor+1 Stable    | patch+1 Stable    |
//! | `≥1`, beta              | stable  | error                 | error             | error             |
//!
//! "beta" means the parsed prerelease starts with `beta`. A stable target
//! rejects any prerelease baseline, `-rc.N` included.

use crate::changelog::Changelog;
use crate::errors::{ApiDeltaError, Result};
use crate::{log_op_end, log_op_error, log_op_start};
use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Release-process label attached to the pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReleaseLabel {
    #[serde(rename = "Stable")]
    Stable,
    #[serde(rename = "Stable,BreakingChange")]
    StableBreakingChange,
    #[serde(rename = "Beta")]
    Beta,
    #[serde(rename = "Beta,BreakingChange")]
    BetaBreakingChange,
    #[serde(rename = "FirstGA")]
    FirstGA,
    #[serde(rename = "FirstGA,BreakingChange")]
    FirstGABreakingChange,
}

impl ReleaseLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseLabel::Stable => "Stable",
            ReleaseLabel::StableBreakingChange => "Stable,BreakingChange",
            ReleaseLabel::Beta => "Beta",
            ReleaseLabel::BetaBreakingChange => "Beta,BreakingChange",
            ReleaseLabel::FirstGA => "FirstGA",
            ReleaseLabel::FirstGABreakingChange => "FirstGA,BreakingChange",
        }
    }

    fn beta(breaking: bool) -> Self {
        if breaking {
            ReleaseLabel::BetaBreakingChange
        } else {
            ReleaseLabel::Beta
        }
    }

    fn stable(breaking: bool) -> Self {
        if breaking {
            ReleaseLabel::StableBreakingChange
        } else {
            ReleaseLabel::Stable
        }
    }

    fn first_ga(breaking: bool) -> Self {
        if breaking {
            ReleaseLabel::FirstGABreakingChange
        } else {
            ReleaseLabel::FirstGA
        }
    }
}

impl fmt::Display for ReleaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The next version together with its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDecision {
    pub version: Version,
    pub label: ReleaseLabel,
}

/// Parse a version string, tolerating a `v` prefix and a tag path such as
/// `sdk/resourcemanager/foo/armfoo/v1.2.0`.
///
/// # Errors
///
/// Returns `InvalidVersion` when the remainder is not valid semver.
pub fn parse_version(text: &str) -> Result<Version> {
    let tail = text.rsplit('/').next().unwrap_or(text).trim();
    let bare = tail.strip_prefix('v').unwrap_or(tail);
    Version::parse(bare).map_err(|e| ApiDeltaError::InvalidVersion {
        version: text.to_string(),
        reason: e.to_string(),
    })
}

/// Decide the next version for a changelog.
///
/// `NewPackage` counts as additive only; `RemovedPackage` counts as breaking.
///
/// # Errors
///
/// - `InvalidVersion` when `previous` is not valid semver or carries an
///   unparseable beta number
/// - `InvalidPreviousVersion` when a stable release is requested from a
///   prerelease baseline
pub fn classify(previous: &str, is_preview: bool, changelog: &Changelog) -> Result<VersionDecision> {
    log_op_start!("classify_version", previous_version = previous, preview = is_preview);
    let start = std::time::Instant::now();

    let decision = classify_flags(
        previous,
        is_preview,
        changelog.has_breaking_changes(),
        changelog.has_additive_changes(),
    )
    .map_err(|e| {
        log_op_error!(
            "classify_version",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "classify_version",
        duration_ms = start.elapsed().as_millis() as u64,
        new_version = %decision.version,
        label = decision.label.as_str()
    );
    Ok(decision)
}

/// The pure core of [`classify`].
///
/// # Errors
///
/// See [`classify`].
pub fn classify_flags(
    previous: &str,
    is_preview: bool,
    has_breaking: bool,
    has_additive: bool,
) -> Result<VersionDecision> {
    let prev = parse_version(previous)?;
    let prev_is_beta = prev.pre.as_str().starts_with("beta");

    let bump = |v: &Version| {
        if has_breaking {
            inc_major(v)
        } else if has_additive {
            inc_minor(v)
        } else {
            inc_patch(v)
        }
    };

    let (version, label) = if prev.major == 0 {
        if !is_preview {
            (Version::new(1, 0, 0), ReleaseLabel::first_ga(has_breaking))
        } else if has_breaking || has_additive {
            (inc_minor(&prev), ReleaseLabel::beta(has_breaking))
        } else {
            (inc_patch(&prev), ReleaseLabel::Beta)
        }
    } else if is_preview {
        if prev_is_beta {
            (next_beta(&prev, previous)?, ReleaseLabel::beta(has_breaking))
        } else {
            let mut next = bump(&prev);
            next.pre = Prerelease::new("beta.1").map_err(|e| ApiDeltaError::Internal {
                message: e.to_string(),
            })?;
            (next, ReleaseLabel::beta(has_breaking))
        }
    } else {
        if !prev.pre.is_empty() {
            return Err(ApiDeltaError::InvalidPreviousVersion {
                version: previous.to_string(),
            });
        }
        (bump(&prev), ReleaseLabel::stable(has_breaking))
    };

    Ok(VersionDecision { version, label })
}

fn inc_major(v: &Version) -> Version {
    Version::new(v.major + 1, 0, 0)
}

fn inc_minor(v: &Version) -> Version {
    Version::new(v.major, v.minor + 1, 0)
}

/// A prerelease baseline releases as its own core version; otherwise patch+1.
fn inc_patch(v: &Version) -> Version {
    if v.pre.is_empty() {
        Version::new(v.major, v.minor, v.patch + 1)
    } else {
        Version::new(v.major, v.minor, v.patch)
    }
}

/// `1.2.0-beta.3` → `1.2.0-beta.4`
fn next_beta(v: &Version, original: &str) -> Result<Version> {
    let invalid = |reason: String| ApiDeltaError::InvalidVersion {
        version: original.to_string(),
        reason,
    };
    let n: u64 = v
        .pre
        .as_str()
        .strip_prefix("beta.")
        .ok_or_else(|| invalid(format!("prerelease `{}` is not beta.N", v.pre)))?
        .parse::<u64>()
        .map_err(|e| invalid(format!("beta number: {}", e)))?;
    let mut next = v.clone();
    next.pre = Prerelease::new(&format!("beta.{}", n + 1)).map_err(|e| invalid(e.to_string()))?;
    next.build = BuildMetadata::EMPTY;
    Ok(next)
}

/// Choose the comparison baseline from a newest-first release list.
///
/// A preview target compares with the newest release; a stable target
/// compares with the newest release whose version segment has no `beta`,
/// falling back to the newest release. Tag path directories are ignored.
pub fn select_baseline<S: AsRef<str>>(is_preview: bool, releases: &[S]) -> Option<&str> {
    let newest: &str = releases.first()?.as_ref();
    if is_preview {
        return Some(newest);
    }
    for release in releases {
        let release: &str = release.as_ref();
        let version_segment = release.rsplit('/').next().unwrap_or(release);
        if !version_segment.contains("beta") {
            return Some(release);
        }
    }
    Some(newest)
}
