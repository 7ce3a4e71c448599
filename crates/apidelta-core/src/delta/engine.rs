//! Structural diff over two export snapshots.
//!
//! Every function here is pure and total: `lhs` is the before snapshot,
//! `rhs` the after snapshot.

use crate::delta::model::{Content, FuncSig, InterfaceDef, Signature, StructDef};
use crate::exports::{self, Func};
use std::collections::{BTreeMap, BTreeSet};

/// Everything in `rhs` that is absent from `lhs`.
///
/// Swapping the arguments yields the removed complement. Structs and
/// interfaces missing from `lhs` are copied whole and marked complete;
/// ones present on both sides contribute only their new named fields or
/// methods.
pub fn exports(lhs: &exports::Content, rhs: &exports::Content) -> Content {
    let mut out = Content::default();

    out.content.consts = missing_from(&lhs.consts, &rhs.consts);
    out.content.type_aliases = missing_from(&lhs.type_aliases, &rhs.type_aliases);
    out.content.funcs = missing_from(&lhs.funcs, &rhs.funcs);

    for (name, iface) in &rhs.interfaces {
        match lhs.interfaces.get(name) {
            None => {
                out.content.interfaces.insert(name.clone(), iface.clone());
                out.complete_interfaces.insert(name.clone());
            }
            Some(before) => {
                let methods = missing_from(&before.methods, &iface.methods);
                if !methods.is_empty() {
                    out.content.interfaces.insert(
                        name.clone(),
                        exports::Interface {
                            anonymous_fields: Vec::new(),
                            methods,
                        },
                    );
                }
            }
        }
    }

    for (name, def) in &rhs.structs {
        match lhs.structs.get(name) {
            None => {
                out.content.structs.insert(name.clone(), def.clone());
                out.complete_structs.insert(name.clone());
            }
            Some(before) => {
                let fields = missing_from(&before.fields, &def.fields);
                if !fields.is_empty() {
                    out.content.structs.insert(
                        name.clone(),
                        exports::Struct {
                            anonymous_fields: Vec::new(),
                            fields,
                        },
                    );
                }
            }
        }
    }

    out
}

fn missing_from<V: Clone>(lhs: &BTreeMap<String, V>, rhs: &BTreeMap<String, V>) -> BTreeMap<String, V> {
    rhs.iter()
        .filter(|(k, _)| !lhs.contains_key(*k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Constants present on both sides whose type text differs.
pub fn const_type_changes(
    lhs: &exports::Content,
    rhs: &exports::Content,
) -> BTreeMap<String, Signature> {
    shared_changes(&lhs.consts, &rhs.consts, |a, b| {
        (a.type_name != b.type_name).then(|| Signature::new(&a.type_name, &b.type_name))
    })
}

/// Type aliases present on both sides whose underlying type text differs.
pub fn type_alias_changes(
    lhs: &exports::Content,
    rhs: &exports::Content,
) -> BTreeMap<String, Signature> {
    shared_changes(&lhs.type_aliases, &rhs.type_aliases, |a, b| {
        (a.underlying_type != b.underlying_type)
            .then(|| Signature::new(&a.underlying_type, &b.underlying_type))
    })
}

/// Functions present on both sides whose parameters or results changed.
pub fn func_sig_changes(
    lhs: &exports::Content,
    rhs: &exports::Content,
) -> BTreeMap<String, FuncSig> {
    shared_changes(&lhs.funcs, &rhs.funcs, func_sig)
}

/// Embedded-field and field-type changes of structs present on both sides.
///
/// Fields present on one side only are not reported here; they belong to
/// [`exports`].
pub fn struct_field_changes(
    lhs: &exports::Content,
    rhs: &exports::Content,
) -> BTreeMap<String, StructDef> {
    shared_changes(&lhs.structs, &rhs.structs, |a, b| {
        let (added, removed) = list_delta(&a.anonymous_fields, &b.anonymous_fields);
        let def = StructDef {
            added_anonymous_fields: added,
            removed_anonymous_fields: removed,
            fields: shared_changes(&a.fields, &b.fields, |x, y| {
                (x != y).then(|| Signature::new(x, y))
            }),
        };
        (!def.is_empty()).then_some(def)
    })
}

/// Embedded-interface and method-signature changes of interfaces present on both sides.
pub fn interface_method_sig_changes(
    lhs: &exports::Content,
    rhs: &exports::Content,
) -> BTreeMap<String, InterfaceDef> {
    shared_changes(&lhs.interfaces, &rhs.interfaces, |a, b| {
        let (added, removed) = list_delta(&a.anonymous_fields, &b.anonymous_fields);
        let def = InterfaceDef {
            added_anonymous_fields: added,
            removed_anonymous_fields: removed,
            methods: shared_changes(&a.methods, &b.methods, func_sig),
        };
        (!def.is_empty()).then_some(def)
    })
}

/// Compare one function across snapshots.
///
/// Parameters compare on their joined type text. When the types line up
/// position by position, the only remaining change that counts is a
/// reordering of the same `(name, type)` pairs; that is reported with named
/// parameters so the move is visible. A rename alone is not a change.
pub fn func_sig(lhs: &Func, rhs: &Func) -> Option<FuncSig> {
    let sig = FuncSig {
        params: param_change(lhs, rhs),
        returns: (lhs.returns != rhs.returns).then(|| {
            Signature::new(
                lhs.returns.clone().unwrap_or_default(),
                rhs.returns.clone().unwrap_or_default(),
            )
        }),
    };
    (!sig.is_empty()).then_some(sig)
}

fn param_change(lhs: &Func, rhs: &Func) -> Option<Signature> {
    let (from, to) = (lhs.param_types(), rhs.param_types());
    if from != to {
        return Some(Signature::new(from, to));
    }
    if lhs.params == rhs.params {
        return None;
    }
    let mut before = lhs.params.clone();
    let mut after = rhs.params.clone();
    before.sort();
    after.sort();
    (before == after).then(|| Signature::new(lhs.named_params(), rhs.named_params()))
}

fn shared_changes<V, C>(
    lhs: &BTreeMap<String, V>,
    rhs: &BTreeMap<String, V>,
    compare: impl Fn(&V, &V) -> Option<C>,
) -> BTreeMap<String, C> {
    lhs.iter()
        .filter_map(|(k, a)| {
            let b = rhs.get(k)?;
            compare(a, b).map(|c| (k.clone(), c))
        })
        .collect()
}

/// Compute `(added, removed)` between two ordered lists.
fn list_delta(a: &[String], b: &[String]) -> (Vec<String>, Vec<String>) {
    let set_a: BTreeSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: BTreeSet<&str> = b.iter().map(String::as_str).collect();
    let added = b
        .iter()
        .filter(|s| !set_a.contains(s.as_str()))
        .cloned()
        .collect();
    let removed = a
        .iter()
        .filter(|s| !set_b.contains(s.as_str()))
        .cloned()
        .collect();
    (added, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exports::{Param, Struct};

    fn func(params: &[(&str, &str)], returns: Option<&str>) -> Func {
        Func {
            params: params.iter().map(|(n, t)| Param::new(*n, *t)).collect(),
            returns: returns.map(str::to_string),
            replaced_by: None,
        }
    }

    #[test]
    fn test_rename_only_is_not_a_change() {
        let a = func(&[("ctx", "context.Context"), ("name", "string")], None);
        let b = func(&[("ctx", "context.Context"), ("resourceName", "string")], None);
        assert_eq!(func_sig(&a, &b), None);
    }

    #[test]
    fn test_reorder_is_a_change_with_named_params() {
        let a = func(&[("group", "string"), ("name", "string")], None);
        let b = func(&[("name", "string"), ("group", "string")], None);
        let sig = func_sig(&a, &b).unwrap();
        assert_eq!(
            sig.params,
            Some(Signature::new("group string, name string", "name string, group string"))
        );
        assert_eq!(sig.returns, None);
    }

    #[test]
    fn test_type_change_reports_type_text() {
        let a = func(&[("a", "int"), ("b", "string")], Some("error"));
        let b = func(&[("b", "string"), ("a", "int")], Some("error"));
        let sig = func_sig(&a, &b).unwrap();
        assert_eq!(sig.params, Some(Signature::new("int, string", "string, int")));
    }

    #[test]
    fn test_return_added() {
        let a = func(&[], None);
        let b = func(&[], Some("error"));
        assert_eq!(
            func_sig(&a, &b).unwrap().returns,
            Some(Signature::new("", "error"))
        );
    }

    #[test]
    fn test_exports_partial_struct_holds_only_new_fields() {
        let mut lhs = exports::Content::default();
        let mut rhs = exports::Content::default();
        let mut before = Struct::default();
        before.fields.insert("Name".into(), "*string".into());
        let mut after = before.clone();
        after.fields.insert("Tags".into(), "map[string]*string".into());
        lhs.structs.insert("Resource".into(), before);
        rhs.structs.insert("Resource".into(), after);
        rhs.structs.insert("Fresh".into(), Struct::default());

        let added = exports(&lhs, &rhs);
        assert_eq!(added.complete_structs(), vec!["Fresh"]);
        assert_eq!(added.modified_structs(), vec!["Resource"]);
        let partial = &added.content.structs["Resource"];
        assert_eq!(partial.fields.keys().collect::<Vec<_>>(), vec!["Tags"]);

        let removed = exports(&rhs, &lhs);
        assert!(removed.is_empty());
    }

    #[test]
    fn test_struct_field_changes_anonymous_and_types() {
        let mut lhs = exports::Content::default();
        let mut rhs = exports::Content::default();
        let mut a = Struct {
            anonymous_fields: vec!["Base".into()],
            ..Default::default()
        };
        a.fields.insert("Props".into(), "interface{}".into());
        a.fields.insert("Gone".into(), "string".into());
        let mut b = Struct {
            anonymous_fields: vec!["*Other".into()],
            ..Default::default()
        };
        b.fields.insert("Props".into(), "any".into());
        lhs.structs.insert("S".into(), a);
        rhs.structs.insert("S".into(), b);

        let changes = struct_field_changes(&lhs, &rhs);
        let def = &changes["S"];
        assert_eq!(def.added_anonymous_fields, vec!["*Other".to_string()]);
        assert_eq!(def.removed_anonymous_fields, vec!["Base".to_string()]);
        assert_eq!(def.fields.len(), 1);
        assert_eq!(def.fields["Props"], Signature::new("interface{}", "any"));
    }

    #[test]
    fn test_unchanged_struct_produces_no_entry() {
        let mut lhs = exports::Content::default();
        lhs.structs.insert("S".into(), Struct::default());
        assert!(struct_field_changes(&lhs, &lhs.clone()).is_empty());
    }
}
