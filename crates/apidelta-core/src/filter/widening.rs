//! Passes that treat widening to `any` as non-breaking.

use super::ChangelogFilter;
use crate::delta::StructDef;
use crate::exports::split_type_list;
use crate::report::{AdditiveChanges, Package};

/// Drops struct field changes from `interface{}` to `any`.
pub struct InterfaceToAnyFilter;

impl ChangelogFilter for InterfaceToAnyFilter {
    fn name(&self) -> &'static str {
        "interface_to_any"
    }

    fn apply(&self, package: &mut Package) {
        let Some(breaking) = package.breaking_changes.as_mut() else {
            return;
        };
        for def in breaking.changes.structs.values_mut() {
            def.fields
                .retain(|_, sig| !(sig.from.contains("interface{}") && sig.to.contains("any")));
        }
        breaking.changes.structs.retain(|_, def| !def.is_empty());
    }
}

/// Moves struct field changes whose new type is exactly `any` into the
/// additive half.
pub struct TypeToAnyFilter;

impl ChangelogFilter for TypeToAnyFilter {
    fn name(&self) -> &'static str {
        "type_to_any"
    }

    fn apply(&self, package: &mut Package) {
        let Some(breaking) = package.breaking_changes.as_mut() else {
            return;
        };
        let mut widened = Vec::new();
        for (struct_name, def) in breaking.changes.structs.iter_mut() {
            let fields: Vec<String> = def
                .fields
                .iter()
                .filter(|(_, sig)| sig.to == "any")
                .map(|(name, _)| name.clone())
                .collect();
            for field in fields {
                if let Some(sig) = def.fields.remove(&field) {
                    widened.push((struct_name.clone(), field, sig));
                }
            }
        }
        breaking.changes.structs.retain(|_, def| !def.is_empty());

        if widened.is_empty() {
            return;
        }
        let additive = package
            .additive_changes
            .get_or_insert_with(AdditiveChanges::default);
        // The field existed on both sides, so it cannot already be listed
        // under `additive.added` for the same struct.
        for (struct_name, field, sig) in widened {
            additive
                .changes
                .structs
                .entry(struct_name)
                .or_insert_with(StructDef::default)
                .fields
                .insert(field, sig);
        }
    }
}

/// Drops parameter-list changes whose only differences are `interface{}` → `any`.
pub struct ParamsInterfaceToAnyFilter;

impl ParamsInterfaceToAnyFilter {
    fn only_widened(from: &str, to: &str) -> bool {
        let before = split_type_list(from);
        let after = split_type_list(to);
        if before.len() != after.len() {
            return false;
        }
        let mut widened = false;
        for (a, b) in before.iter().zip(&after) {
            if a == b {
                continue;
            }
            if a.replace("interface{}", "any") != *b {
                return false;
            }
            widened = true;
        }
        widened
    }
}

impl ChangelogFilter for ParamsInterfaceToAnyFilter {
    fn name(&self) -> &'static str {
        "params_interface_to_any"
    }

    fn apply(&self, package: &mut Package) {
        let Some(breaking) = package.breaking_changes.as_mut() else {
            return;
        };
        for sig in breaking.changes.funcs.values_mut() {
            if sig
                .params
                .as_ref()
                .is_some_and(|p| Self::only_widened(&p.from, &p.to))
            {
                sig.params = None;
            }
        }
        breaking.changes.funcs.retain(|_, sig| !sig.is_empty());
    }
}
