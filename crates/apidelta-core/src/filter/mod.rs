//! Filter pipeline: ordered passes that strip known noise from a report.
//!
//! Every pass takes exclusive `&mut` access to one [`Package`] for its
//! duration and only deletes entries, except the pairing passes (which set
//! `replaced_by` on a removed function) and the `any`-widening relocation
//! (which moves struct field changes into the additive half).
//!
//! Structural passes run before pairing passes: pairing assumes
//! non-exported noise is already gone.

mod pairing;
mod structural;
mod widening;

pub use pairing::{LroFilter, PageableFilter};
pub use structural::{EnumHelperFilter, MarshalUnmarshalFilter, NonExportedFilter, OptionsResponseFilter};
pub use widening::{InterfaceToAnyFilter, ParamsInterfaceToAnyFilter, TypeToAnyFilter};

use crate::changelog::Changelog;
use crate::report::Package;
use crate::{log_op_end, log_op_start};
use serde::{Deserialize, Serialize};

/// One heuristic pass over a report.
pub trait ChangelogFilter: Send + Sync {
    /// Stable pass name used in logs and configuration
    fn name(&self) -> &'static str;

    /// Apply the pass. Running it twice is the same as running it once.
    fn apply(&self, package: &mut Package);
}

/// Configurable identity of each built-in pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    NonExported,
    MarshalUnmarshal,
    EnumHelper,
    OptionsResponse,
    InterfaceToAny,
    TypeToAny,
    Lro,
    Pageable,
    ParamsInterfaceToAny,
}

impl FilterKind {
    /// The standard pass order
    pub const STANDARD: [FilterKind; 9] = [
        FilterKind::NonExported,
        FilterKind::MarshalUnmarshal,
        FilterKind::EnumHelper,
        FilterKind::OptionsResponse,
        FilterKind::InterfaceToAny,
        FilterKind::TypeToAny,
        FilterKind::Lro,
        FilterKind::Pageable,
        FilterKind::ParamsInterfaceToAny,
    ];

    pub fn build(self) -> Box<dyn ChangelogFilter> {
        match self {
            FilterKind::NonExported => Box::new(NonExportedFilter),
            FilterKind::MarshalUnmarshal => Box::new(MarshalUnmarshalFilter),
            FilterKind::EnumHelper => Box::new(EnumHelperFilter),
            FilterKind::OptionsResponse => Box::new(OptionsResponseFilter),
            FilterKind::InterfaceToAny => Box::new(InterfaceToAnyFilter),
            FilterKind::TypeToAny => Box::new(TypeToAnyFilter),
            FilterKind::Lro => Box::new(LroFilter),
            FilterKind::Pageable => Box::new(PageableFilter),
            FilterKind::ParamsInterfaceToAny => Box::new(ParamsInterfaceToAnyFilter),
        }
    }
}

/// Ordered list of passes applied to a changelog taken by value.
pub struct FilterPipeline {
    passes: Vec<Box<dyn ChangelogFilter>>,
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl FilterPipeline {
    /// Pipeline with no passes
    pub fn empty() -> Self {
        Self { passes: Vec::new() }
    }

    /// All built-in passes in the standard order
    pub fn standard() -> Self {
        Self::from_kinds(&FilterKind::STANDARD)
    }

    pub fn from_kinds(kinds: &[FilterKind]) -> Self {
        Self {
            passes: kinds.iter().map(|k| k.build()).collect(),
        }
    }

    /// Append a pass
    pub fn with_filter(mut self, filter: Box<dyn ChangelogFilter>) -> Self {
        self.passes.push(filter);
        self
    }

    /// Pass names in execution order
    pub fn names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run every pass over a `Modified` changelog; whole-package markers pass
    /// through untouched.
    pub fn run(&self, mut changelog: Changelog) -> Changelog {
        let Some(package) = changelog.package_mut() else {
            return changelog;
        };
        log_op_start!("filter_pipeline", passes = self.passes.len());
        let start = std::time::Instant::now();

        let entries_before = entry_count(package);
        for pass in &self.passes {
            let before = entry_count(package);
            pass.apply(package);
            normalize(package);
            let after = entry_count(package);
            tracing::debug!(
                component = module_path!(),
                op = "filter_pipeline",
                event = crate::logging_facility::EVENT_PASS,
                filter = pass.name(),
                removed = before.saturating_sub(after) as u64,
            );
        }

        log_op_end!(
            "filter_pipeline",
            duration_ms = start.elapsed().as_millis() as u64,
            removed = entries_before.saturating_sub(entry_count(package)) as u64
        );
        changelog
    }
}

fn entry_count(package: &Package) -> usize {
    package.breaking_count() + package.additive_count()
}

/// Drop entries and halves left empty by a pass.
fn normalize(package: &mut Package) {
    if let Some(additive) = &mut package.additive_changes {
        additive.changes.prune_empty();
        if additive.added.as_ref().is_some_and(|a| a.is_empty()) {
            additive.added = None;
        }
    }
    if let Some(breaking) = &mut package.breaking_changes {
        breaking.changes.prune_empty();
        if breaking.removed.as_ref().is_some_and(|r| r.is_empty()) {
            breaking.removed = None;
        }
    }
    if package.additive_changes.as_ref().is_some_and(|a| a.is_empty()) {
        package.additive_changes = None;
    }
    if package.breaking_changes.as_ref().is_some_and(|b| b.is_empty()) {
        package.breaking_changes = None;
    }
}

/// Split a function key into receiver and method, if it has both.
pub(crate) fn two_part(key: &str) -> Option<(&str, &str)> {
    let mut parts = key.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(receiver), Some(method), None) => Some((receiver, method)),
        _ => None,
    }
}
