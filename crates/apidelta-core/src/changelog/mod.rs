//! Changelog: the report for one package, or a whole-package marker.
//!
//! ## Entry point
//!
//! ```ignore
//! use apidelta_core::changelog::Changelog;
//! use apidelta_core::report::ReportOption;
//!
//! let changelog = Changelog::between(Some(&old), Some(&new), ReportOption::All);
//! println!("{}", apidelta_core::changelog::to_markdown(&changelog));
//! ```

pub mod render;

use crate::errors::Result;
use crate::exports::Content;
use crate::report::{self, Package, ReportOption};
use serde::{Deserialize, Serialize};

pub use render::{
    additive_bullets, breaking_bullets, change_summary, func_sort_key, to_compact_markdown,
    to_markdown,
};

/// Outcome of comparing two snapshots of one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Changelog {
    /// No earlier snapshot exists
    NewPackage,
    /// No later snapshot exists
    RemovedPackage,
    Modified(Package),
}

impl Changelog {
    /// Compare two optional snapshots. A single missing side marks the whole
    /// package as new or removed; with both missing there is nothing to
    /// report. An empty `Content` is compared like any other.
    pub fn between(old: Option<&Content>, new: Option<&Content>, option: ReportOption) -> Self {
        match (old, new) {
            (None, None) => Changelog::Modified(Package::default()),
            (None, Some(_)) => Changelog::NewPackage,
            (Some(_), None) => Changelog::RemovedPackage,
            (Some(old), Some(new)) => Changelog::Modified(report::generate(old, new, option)),
        }
    }

    /// The report, when this changelog is `Modified`
    pub fn package(&self) -> Option<&Package> {
        match self {
            Changelog::Modified(package) => Some(package),
            _ => None,
        }
    }

    pub fn package_mut(&mut self) -> Option<&mut Package> {
        match self {
            Changelog::Modified(package) => Some(package),
            _ => None,
        }
    }

    /// True for a `Modified` changelog with nothing in it
    pub fn is_empty(&self) -> bool {
        self.package().is_some_and(Package::is_empty)
    }

    pub fn has_breaking_changes(&self) -> bool {
        match self {
            Changelog::NewPackage => false,
            Changelog::RemovedPackage => true,
            Changelog::Modified(package) => package.has_breaking_changes(),
        }
    }

    pub fn has_additive_changes(&self) -> bool {
        match self {
            Changelog::NewPackage => true,
            Changelog::RemovedPackage => false,
            Changelog::Modified(package) => package.has_additive_changes(),
        }
    }

    /// Pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
