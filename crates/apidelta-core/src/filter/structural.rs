//! Structural passes: visibility, generated helpers, implied structs.

use super::{two_part, ChangelogFilter};
use crate::delta;
use crate::exports::is_exported;
use crate::report::Package;
use regex::Regex;

fn added_mut(package: &mut Package) -> Option<&mut delta::Content> {
    package
        .additive_changes
        .as_mut()
        .and_then(|a| a.added.as_mut())
}

fn removed_mut(package: &mut Package) -> Option<&mut delta::Content> {
    package
        .breaking_changes
        .as_mut()
        .and_then(|b| b.removed.as_mut())
}

/// Both halves of a function key are exported; the receiver may carry `*`.
fn func_key_exported(key: &str) -> bool {
    let (before, after) = key.split_once('.').unwrap_or((key, ""));
    is_exported(before.trim_start_matches('*')) && (after.is_empty() || is_exported(after))
}

/// Drops functions and structs that are not publicly visible.
pub struct NonExportedFilter;

impl NonExportedFilter {
    fn prune(content: &mut delta::Content) {
        content.content.funcs.retain(|k, _| func_key_exported(k));
        let hidden: Vec<String> = content
            .content
            .structs
            .keys()
            .filter(|k| !is_exported(k))
            .cloned()
            .collect();
        for name in hidden {
            content.remove_struct(&name);
        }
    }
}

impl ChangelogFilter for NonExportedFilter {
    fn name(&self) -> &'static str {
        "non_exported"
    }

    fn apply(&self, package: &mut Package) {
        if let Some(added) = added_mut(package) {
            Self::prune(added);
        }
        if let Some(breaking) = package.breaking_changes.as_mut() {
            breaking.changes.funcs.retain(|k, _| func_key_exported(k));
            breaking.changes.structs.retain(|k, _| is_exported(k));
            if let Some(removed) = breaking.removed.as_mut() {
                Self::prune(removed);
            }
        }
    }
}

/// Drops generated `MarshalJSON` / `UnmarshalJSON` methods.
pub struct MarshalUnmarshalFilter;

impl ChangelogFilter for MarshalUnmarshalFilter {
    fn name(&self) -> &'static str {
        "marshal_unmarshal"
    }

    fn apply(&self, package: &mut Package) {
        let keep = |k: &String, _: &mut _| {
            !(k.ends_with(".MarshalJSON") || k.ends_with(".UnmarshalJSON"))
        };
        if let Some(added) = added_mut(package) {
            added.content.funcs.retain(keep);
        }
        if let Some(removed) = removed_mut(package) {
            removed.content.funcs.retain(keep);
        }
    }
}

/// Drops the generated `PossibleTValues` helper of a new or removed enum `T`.
///
/// Acts only when exactly one helper matches; zero or several matches are
/// left alone. On the removed side the enum's constants go with it. A
/// removal can resolve an ambiguity for a shorter alias, so each side is
/// swept until nothing more changes.
pub struct EnumHelperFilter;

impl EnumHelperFilter {
    fn matching<V>(
        map: &std::collections::BTreeMap<String, V>,
        prefix: &str,
        type_name: &str,
    ) -> Vec<String> {
        let pattern = format!(r"^{}{}\w*", prefix, regex::escape(type_name));
        let Ok(re) = Regex::new(&pattern) else {
            return Vec::new();
        };
        map.keys().filter(|k| re.is_match(k)).cloned().collect()
    }

    fn sweep_added(added: &mut delta::Content) -> bool {
        let mut changed = false;
        let aliases: Vec<String> = added.content.type_aliases.keys().cloned().collect();
        for alias in aliases {
            let helpers = Self::matching(&added.content.funcs, "Possible", &alias);
            if let [helper] = helpers.as_slice() {
                added.content.funcs.remove(helper);
                changed = true;
            }
        }
        changed
    }

    fn sweep_removed(removed: &mut delta::Content) -> bool {
        let mut changed = false;
        let aliases: Vec<String> = removed.content.type_aliases.keys().cloned().collect();
        for alias in aliases {
            let consts = Self::matching(&removed.content.consts, "", &alias);
            if consts.is_empty() {
                continue;
            }
            let helpers = Self::matching(&removed.content.funcs, "Possible", &alias);
            if let [helper] = helpers.as_slice() {
                for name in &consts {
                    removed.content.consts.remove(name);
                }
                removed.content.funcs.remove(helper);
                changed = true;
            }
        }
        changed
    }
}

impl ChangelogFilter for EnumHelperFilter {
    fn name(&self) -> &'static str {
        "enum_helper"
    }

    fn apply(&self, package: &mut Package) {
        if let Some(added) = added_mut(package) {
            while Self::sweep_added(added) {}
        }
        if let Some(removed) = removed_mut(package) {
            while Self::sweep_removed(removed) {}
        }
    }
}

/// Drops the options/response structs implied by a new or removed method.
///
/// For `Receiver.Method`, the last parameter type and the first result type
/// name structs that come and go together with the method.
pub struct OptionsResponseFilter;

impl OptionsResponseFilter {
    /// `*Foo` → `Foo`; `*runtime.Poller[FooResponse]` → `FooResponse`.
    fn owned_struct(type_text: &str) -> &str {
        let t = type_text.trim();
        let t = match (t.find('['), t.rfind(']')) {
            (Some(open), Some(close)) if open < close => &t[open + 1..close],
            _ => t,
        };
        t.trim_start_matches('*')
    }

    fn prune(content: &mut delta::Content) {
        let mut implied = Vec::new();
        for (key, func) in &content.content.funcs {
            if two_part(key).is_none() {
                continue;
            }
            if let Some(last) = func.last_param_type() {
                implied.push(Self::owned_struct(last).to_string());
            }
            if let Some(first) = func.first_return() {
                implied.push(Self::owned_struct(first).to_string());
            }
        }
        for name in implied.iter().filter(|n| !n.is_empty()) {
            content.remove_struct(name);
        }
    }
}

impl ChangelogFilter for OptionsResponseFilter {
    fn name(&self) -> &'static str {
        "options_response"
    }

    fn apply(&self, package: &mut Package) {
        if let Some(added) = added_mut(package) {
            Self::prune(added);
        }
        if let Some(removed) = removed_mut(package) {
            Self::prune(removed);
        }
    }
}
