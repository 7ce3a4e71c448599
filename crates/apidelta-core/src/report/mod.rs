//! Report builder: one breaking/additive report per snapshot pair.

use crate::delta::{self, Changes, InterfaceDef, StructDef};
use crate::exports;
use crate::{log_op_end, log_op_start};
use serde::{Deserialize, Serialize};

/// Which halves of the report to compute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOption {
    #[default]
    All,
    BreakingOnly,
    AdditiveOnly,
}

impl ReportOption {
    fn wants_breaking(self) -> bool {
        self != ReportOption::AdditiveOnly
    }

    fn wants_additive(self) -> bool {
        self != ReportOption::BreakingOnly
    }
}

/// New declarations plus changes that only widen the surface.
///
/// A struct name may sit in both `added` (its new named fields) and
/// `changes` (new embedded fields, widened field types). Member keys never
/// repeat across the two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditiveChanges {
    #[serde(default)]
    pub changes: Changes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<delta::Content>,
}

impl AdditiveChanges {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.added.as_ref().map_or(true, delta::Content::is_empty)
    }
}

/// Removed declarations plus incompatible alterations.
///
/// As with [`AdditiveChanges`], a struct name may appear in `removed` and
/// `changes` at once, with disjoint members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakingChanges {
    #[serde(default)]
    pub changes: Changes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<delta::Content>,
}

impl BreakingChanges {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.removed.as_ref().map_or(true, delta::Content::is_empty)
    }
}

/// The report for one package. Absent and present-but-empty halves are
/// treated the same by every predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additive_changes: Option<AdditiveChanges>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breaking_changes: Option<BreakingChanges>,
}

impl Package {
    pub fn is_empty(&self) -> bool {
        !self.has_breaking_changes() && !self.has_additive_changes()
    }

    pub fn has_breaking_changes(&self) -> bool {
        self.breaking_changes.as_ref().is_some_and(|b| !b.is_empty())
    }

    pub fn has_additive_changes(&self) -> bool {
        self.additive_changes.as_ref().is_some_and(|a| !a.is_empty())
    }

    pub fn breaking_count(&self) -> usize {
        self.breaking_changes.as_ref().map_or(0, |c| c.count())
    }

    pub fn additive_count(&self) -> usize {
        self.additive_changes.as_ref().map_or(0, |c| c.count())
    }
}

/// Recursive entry count.
pub trait Count {
    fn count(&self) -> usize;
}

impl Count for delta::Content {
    fn count(&self) -> usize {
        let c = &self.content;
        let interfaces: usize = c
            .interfaces
            .iter()
            .map(|(name, iface)| {
                if self.complete_interfaces.contains(name) {
                    1
                } else {
                    iface.methods.len()
                }
            })
            .sum();
        let structs: usize = c
            .structs
            .iter()
            .map(|(name, def)| {
                if self.complete_structs.contains(name) {
                    1
                } else {
                    def.fields.len()
                }
            })
            .sum();
        c.consts.len() + c.type_aliases.len() + c.funcs.len() + interfaces + structs
    }
}

impl Count for delta::FuncSig {
    fn count(&self) -> usize {
        usize::from(self.params.is_some()) + usize::from(self.returns.is_some())
    }
}

impl Count for StructDef {
    fn count(&self) -> usize {
        self.added_anonymous_fields.len() + self.removed_anonymous_fields.len() + self.fields.len()
    }
}

impl Count for InterfaceDef {
    fn count(&self) -> usize {
        self.added_anonymous_fields.len()
            + self.removed_anonymous_fields.len()
            + self.methods.values().map(|c| c.count()).sum::<usize>()
    }
}

impl Count for Changes {
    fn count(&self) -> usize {
        self.consts.len()
            + self.type_aliases.len()
            + self.funcs.values().map(|c| c.count()).sum::<usize>()
            + self.interfaces.values().map(|c| c.count()).sum::<usize>()
            + self.structs.values().map(|c| c.count()).sum::<usize>()
    }
}

impl Count for AdditiveChanges {
    fn count(&self) -> usize {
        self.changes.count() + self.added.as_ref().map_or(0, |c| c.count())
    }
}

impl Count for BreakingChanges {
    fn count(&self) -> usize {
        self.changes.count() + self.removed.as_ref().map_or(0, |c| c.count())
    }
}

/// Build the report for `lhs` (before) → `rhs` (after).
///
/// Embedded-field additions land in the additive half; everything else that
/// alters a shared declaration lands in the breaking half.
pub fn generate(lhs: &exports::Content, rhs: &exports::Content, option: ReportOption) -> Package {
    log_op_start!("generate_report", option = ?option);
    let start = std::time::Instant::now();

    let structs = delta::struct_field_changes(lhs, rhs);
    let interfaces = delta::interface_method_sig_changes(lhs, rhs);

    let additive_changes = option
        .wants_additive()
        .then(|| {
            let mut changes = Changes::default();
            for (name, def) in &structs {
                if !def.added_anonymous_fields.is_empty() {
                    changes.structs.insert(
                        name.clone(),
                        StructDef {
                            added_anonymous_fields: def.added_anonymous_fields.clone(),
                            ..Default::default()
                        },
                    );
                }
            }
            for (name, def) in &interfaces {
                if !def.added_anonymous_fields.is_empty() {
                    changes.interfaces.insert(
                        name.clone(),
                        InterfaceDef {
                            added_anonymous_fields: def.added_anonymous_fields.clone(),
                            ..Default::default()
                        },
                    );
                }
            }
            let added = delta::exports(lhs, rhs);
            AdditiveChanges {
                changes,
                added: (!added.is_empty()).then_some(added),
            }
        })
        .filter(|a| !a.is_empty());

    let breaking_changes = option
        .wants_breaking()
        .then(|| {
            let mut changes = Changes {
                consts: delta::const_type_changes(lhs, rhs),
                type_aliases: delta::type_alias_changes(lhs, rhs),
                funcs: delta::func_sig_changes(lhs, rhs),
                interfaces: interfaces
                    .into_iter()
                    .map(|(name, mut def)| {
                        def.added_anonymous_fields.clear();
                        (name, def)
                    })
                    .collect(),
                structs: structs
                    .into_iter()
                    .map(|(name, mut def)| {
                        def.added_anonymous_fields.clear();
                        (name, def)
                    })
                    .collect(),
            };
            changes.prune_empty();
            let removed = delta::exports(rhs, lhs);
            BreakingChanges {
                changes,
                removed: (!removed.is_empty()).then_some(removed),
            }
        })
        .filter(|b| !b.is_empty());

    let package = Package {
        additive_changes,
        breaking_changes,
    };

    log_op_end!(
        "generate_report",
        duration_ms = start.elapsed().as_millis() as u64,
        breaking_count = package.breaking_count(),
        additive_count = package.additive_count()
    );
    package
}
