//! Passes pairing a removed operation with its renamed successor.

use super::{two_part, ChangelogFilter};
use crate::report::Package;

/// Pair removed functions with an added function whose name is the removed
/// method name passed through `toggle`. The added entry is dropped and the
/// removed one records its successor.
fn pair_removed_with_added(package: &mut Package, toggle: fn(&str) -> String) {
    let (Some(additive), Some(breaking)) = (
        package.additive_changes.as_mut(),
        package.breaking_changes.as_mut(),
    ) else {
        return;
    };
    let (Some(added), Some(removed)) = (additive.added.as_mut(), breaking.removed.as_mut()) else {
        return;
    };

    for (key, func) in removed.content.funcs.iter_mut() {
        if func.replaced_by.is_some() {
            continue;
        }
        let Some((receiver, method)) = two_part(key) else {
            continue;
        };
        let successor = format!("{}.{}", receiver, toggle(method));
        if added.content.funcs.remove(&successor).is_some() {
            func.replaced_by = Some(successor);
        }
    }
}

/// Pairs `X` with `BeginX` (an operation turned long-running or back).
pub struct LroFilter;

impl LroFilter {
    fn toggle(method: &str) -> String {
        match method.strip_prefix("Begin") {
            Some(rest) => rest.to_string(),
            None => format!("Begin{}", method),
        }
    }
}

impl ChangelogFilter for LroFilter {
    fn name(&self) -> &'static str {
        "lro"
    }

    fn apply(&self, package: &mut Package) {
        pair_removed_with_added(package, Self::toggle);
    }
}

/// Pairs `X` with `NewXPager` (an operation gaining or losing pagination).
pub struct PageableFilter;

impl PageableFilter {
    fn toggle(method: &str) -> String {
        match method
            .strip_prefix("New")
            .and_then(|m| m.strip_suffix("Pager"))
            .filter(|m| !m.is_empty())
        {
            Some(rest) => rest.to_string(),
            None => format!("New{}Pager", method),
        }
    }
}

impl ChangelogFilter for PageableFilter {
    fn name(&self) -> &'static str {
        "pageable"
    }

    fn apply(&self, package: &mut Package) {
        pair_removed_with_added(package, Self::toggle);
    }
}
