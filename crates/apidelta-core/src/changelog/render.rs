//! Markdown and summary rendering for a [`Changelog`].
//!
//! Output is byte-stable for identical input. Bullets are built from ordered
//! maps, with functions ordered by [`func_sort_key`]. Downstream tooling
//! splices these sections into existing changelog files by substring search.

use super::Changelog;
use crate::delta::{self, Changes, FuncSig};
use crate::exports::{is_exported, split_type_list, Const, Func};
use crate::report::Package;
use std::collections::BTreeMap;

const BREAKING_SECTION: &str = "Breaking Changes";
const ADDITIVE_SECTION: &str = "Features Added";
const NO_CHANGES: &str = "No exported changes";
const NEW_PACKAGE: &str = "This is a new package";
const REMOVED_PACKAGE: &str = "This package was removed";

/// Full rendering: `### Section`, blank line, bullets; sections separated by
/// a blank line.
pub fn to_markdown(changelog: &Changelog) -> String {
    match changelog {
        Changelog::NewPackage => NEW_PACKAGE.to_string(),
        Changelog::RemovedPackage => REMOVED_PACKAGE.to_string(),
        Changelog::Modified(package) => {
            let sections = sections(package);
            if sections.is_empty() {
                return NO_CHANGES.to_string();
            }
            sections
                .iter()
                .map(|(title, bullets)| format!("### {}\n\n{}", title, bullet_lines(bullets)))
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

/// Compact rendering: header directly followed by bullets, empty when
/// nothing changed.
pub fn to_compact_markdown(changelog: &Changelog) -> String {
    match changelog {
        Changelog::NewPackage => NEW_PACKAGE.to_string(),
        Changelog::RemovedPackage => REMOVED_PACKAGE.to_string(),
        Changelog::Modified(package) => sections(package)
            .iter()
            .map(|(title, bullets)| format!("### {}\n{}", title, bullet_lines(bullets)))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// `Total B breaking change(s), A additive change(s).`
pub fn change_summary(changelog: &Changelog) -> String {
    let (breaking, additive) = changelog
        .package()
        .map_or((0, 0), |p| (p.breaking_count(), p.additive_count()));
    format!(
        "Total {} breaking change(s), {} additive change(s).",
        breaking, additive
    )
}

fn sections(package: &Package) -> Vec<(&'static str, Vec<String>)> {
    let mut out = Vec::new();
    let breaking = breaking_bullets(package);
    if !breaking.is_empty() {
        out.push((BREAKING_SECTION, breaking));
    }
    let additive = additive_bullets(package);
    if !additive.is_empty() {
        out.push((ADDITIVE_SECTION, additive));
    }
    out
}

fn bullet_lines(bullets: &[String]) -> String {
    bullets.iter().map(|b| format!("- {}\n", b)).collect()
}

/// Sort key placing related operations next to each other.
///
/// Strips a leading `*`, the `New` prefix of a free constructor, and the
/// `Begin` / `New…Pager` affixes of a method name.
pub fn func_sort_key(name: &str) -> String {
    let name = name.trim_start_matches('*');
    match name.split_once('.') {
        Some((receiver, method)) => {
            let method = method.strip_prefix("Begin").unwrap_or(method);
            let method = method
                .strip_prefix("New")
                .and_then(|m| m.strip_suffix("Pager"))
                .filter(|m| !m.is_empty())
                .unwrap_or(method);
            format!("{}.{}", receiver, method)
        }
        None => name
            .strip_prefix("New")
            .filter(|n| !n.is_empty())
            .unwrap_or(name)
            .to_string(),
    }
}

fn sorted_by_func_key<V>(funcs: &BTreeMap<String, V>) -> Vec<(&String, &V)> {
    let mut entries: Vec<_> = funcs.iter().collect();
    entries.sort_by(|(a, _), (b, _)| {
        func_sort_key(a)
            .cmp(&func_sort_key(b))
            .then_with(|| a.cmp(b))
    });
    entries
}

fn quoted(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!("`{}`", n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Group constant names by type, keeping each group sorted.
fn consts_by_type<'a>(
    consts: impl Iterator<Item = (&'a String, &'a Const)>,
) -> BTreeMap<&'a str, Vec<&'a str>> {
    let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (name, value) in consts {
        groups
            .entry(value.type_name.as_str())
            .or_default()
            .push(name.as_str());
    }
    groups
}

// ---------------------------------------------------------------------
// Breaking
// ---------------------------------------------------------------------

/// Sorted bullets of the "Breaking Changes" section.
pub fn breaking_bullets(package: &Package) -> Vec<String> {
    let Some(breaking) = &package.breaking_changes else {
        return Vec::new();
    };
    let mut bullets = Vec::new();
    if let Some(removed) = &breaking.removed {
        removed_bullets(removed, &mut bullets);
    }
    changed_bullets(&breaking.changes, &mut bullets);
    bullets
}

fn removed_bullets(removed: &delta::Content, out: &mut Vec<String>) {
    let c = &removed.content;
    let groups = consts_by_type(c.consts.iter());

    for name in c.type_aliases.keys() {
        if groups.contains_key(name.as_str()) {
            out.push(format!("Enum `{}` has been removed", name));
        } else {
            out.push(format!("Type alias `{}` has been removed", name));
        }
    }
    for (type_name, names) in &groups {
        if c.type_aliases.contains_key(*type_name) {
            continue;
        }
        if is_exported(type_name) {
            out.push(format!(
                "{} from enum `{}` has been removed",
                quoted(names),
                type_name
            ));
        } else {
            for name in names {
                out.push(format!("Const `{}` has been removed", name));
            }
        }
    }

    for (name, func) in sorted_by_func_key(&c.funcs) {
        out.push(match &func.replaced_by {
            Some(successor) => replacement_bullet(name, successor),
            None => format!("Function `{}` has been removed", name),
        });
    }

    for name in removed.complete_interfaces() {
        out.push(format!("Interface `{}` has been removed", name));
    }
    for name in removed.modified_interfaces() {
        let methods: Vec<&str> = c.interfaces[name].methods.keys().map(String::as_str).collect();
        out.push(format!(
            "Method {} of interface `{}` has been removed",
            quoted(&methods),
            name
        ));
    }

    for name in removed.complete_structs() {
        out.push(format!("Struct `{}` has been removed", name));
    }
    for name in removed.modified_structs() {
        let fields: Vec<&str> = c.structs[name].fields.keys().map(String::as_str).collect();
        out.push(format!(
            "Field {} of struct `{}` has been removed",
            quoted(&fields),
            name
        ));
    }
}

fn method_name(key: &str) -> &str {
    key.split_once('.').map_or(key, |(_, m)| m)
}

fn replacement_bullet(name: &str, successor: &str) -> String {
    let (old, new) = (method_name(name), method_name(successor));
    let is_pager = |m: &str| m.starts_with("New") && m.ends_with("Pager");
    if new.starts_with("Begin") && !old.starts_with("Begin") {
        format!(
            "Operation `{}` has been changed to LRO, use `{}` instead.",
            name, successor
        )
    } else if old.starts_with("Begin") {
        format!(
            "Operation `{}` has been changed to non-LRO, use `{}` instead.",
            name, successor
        )
    } else if is_pager(new) && !is_pager(old) {
        format!(
            "Operation `{}` has supported pagination, use `{}` instead.",
            name, successor
        )
    } else if is_pager(old) {
        format!(
            "Operation `{}` does not support pagination anymore, use `{}` instead.",
            name, successor
        )
    } else {
        format!(
            "Function `{}` has been removed, use `{}` instead.",
            name, successor
        )
    }
}

fn func_sig_bullets(label: &str, name: &str, sig: &FuncSig, out: &mut Vec<String>) {
    if let Some(params) = &sig.params {
        out.push(format!(
            "{} `{}` parameter(s) have been changed from `({})` to `({})`",
            label, name, params.from, params.to
        ));
    }
    if let Some(returns) = &sig.returns {
        out.push(format!(
            "{} `{}` return value(s) have been changed from `({})` to `({})`",
            label, name, returns.from, returns.to
        ));
    }
}

fn changed_bullets(changes: &Changes, out: &mut Vec<String>) {
    for (name, sig) in &changes.consts {
        out.push(format!(
            "Type of const `{}` has been changed from `{}` to `{}`",
            name, sig.from, sig.to
        ));
    }
    for (name, sig) in &changes.type_aliases {
        out.push(format!(
            "Type alias `{}` type has been changed from `{}` to `{}`",
            name, sig.from, sig.to
        ));
    }
    for (name, sig) in sorted_by_func_key(&changes.funcs) {
        func_sig_bullets("Function", name, sig, out);
    }
    for (name, def) in &changes.interfaces {
        for field in &def.removed_anonymous_fields {
            out.push(format!(
                "Anonymous field `{}` of interface `{}` has been removed",
                field, name
            ));
        }
        for (method, sig) in &def.methods {
            func_sig_bullets("Method", &format!("{}.{}", name, method), sig, out);
        }
    }
    for (name, def) in &changes.structs {
        for field in &def.removed_anonymous_fields {
            out.push(format!(
                "Anonymous field `{}` of struct `{}` has been removed",
                field, name
            ));
        }
        field_type_bullets(name, &def.fields, out);
    }
}

fn field_type_bullets(
    struct_name: &str,
    fields: &BTreeMap<String, delta::Signature>,
    out: &mut Vec<String>,
) {
    for (field, sig) in fields {
        out.push(format!(
            "Type of `{}.{}` has been changed from `{}` to `{}`",
            struct_name, field, sig.from, sig.to
        ));
    }
}

// ---------------------------------------------------------------------
// Additive
// ---------------------------------------------------------------------

/// Sorted bullets of the "Features Added" section.
pub fn additive_bullets(package: &Package) -> Vec<String> {
    let Some(additive) = &package.additive_changes else {
        return Vec::new();
    };
    let mut bullets = Vec::new();
    let empty = delta::Content::default();
    let added = additive.added.as_ref().unwrap_or(&empty);
    let c = &added.content;
    let groups = consts_by_type(c.consts.iter());

    // New values of enums that already existed.
    for (type_name, names) in &groups {
        if c.type_aliases.contains_key(*type_name) {
            continue;
        }
        if is_exported(type_name) {
            bullets.push(format!(
                "New value {} added to enum type `{}`",
                quoted(names),
                type_name
            ));
        } else {
            for name in names {
                bullets.push(format!("New const `{}`", name));
            }
        }
    }
    for name in c.type_aliases.keys() {
        if let Some(values) = groups.get(name.as_str()) {
            bullets.push(format!(
                "New enum type `{}` with values {}",
                name,
                quoted(values)
            ));
        }
    }
    for name in c.type_aliases.keys() {
        if !groups.contains_key(name.as_str()) {
            bullets.push(format!("New type alias `{}`", name));
        }
    }

    for (name, func) in sorted_by_func_key(&c.funcs) {
        bullets.push(format!("New function `{}`", func_display(name, func)));
    }

    for name in added.complete_interfaces() {
        bullets.push(format!("New interface `{}`", name));
    }
    for name in added.modified_interfaces() {
        let methods: Vec<&str> = c.interfaces[name].methods.keys().map(String::as_str).collect();
        bullets.push(format!(
            "New method {} in interface `{}`",
            quoted(&methods),
            name
        ));
    }
    for (name, def) in &additive.changes.interfaces {
        for field in &def.added_anonymous_fields {
            bullets.push(format!(
                "New anonymous field `{}` in interface `{}`",
                field, name
            ));
        }
    }

    for name in added.complete_structs() {
        bullets.push(format!("New struct `{}`", name));
    }
    for name in added.modified_structs() {
        let fields: Vec<&str> = c.structs[name].fields.keys().map(String::as_str).collect();
        bullets.push(format!("New field {} in struct `{}`", quoted(&fields), name));
    }
    for (name, def) in &additive.changes.structs {
        for field in &def.added_anonymous_fields {
            bullets.push(format!(
                "New anonymous field `{}` in struct `{}`",
                field, name
            ));
        }
    }

    // Widening changes relocated from the breaking half.
    for (name, def) in &additive.changes.structs {
        field_type_bullets(name, &def.fields, &mut bullets);
    }

    bullets
}

/// `Name(paramTypes) returnTypes`, with parens around multi-value returns.
fn func_display(name: &str, func: &Func) -> String {
    let mut text = format!("{}({})", name, func.param_types());
    if let Some(returns) = &func.returns {
        if split_type_list(returns).len() > 1 {
            text.push_str(&format!(" ({})", returns));
        } else {
            text.push(' ');
            text.push_str(returns);
        }
    }
    text
}
