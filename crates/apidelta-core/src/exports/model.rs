//! Export surface model for one package snapshot.
//!
//! All collections are `BTreeMap` so serialization and iteration order are
//! deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The exported declarations of one package snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub consts: BTreeMap<String, Const>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub type_aliases: BTreeMap<String, TypeAlias>,
    /// Keyed by `"Receiver.Method"` or `"Name"`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub funcs: BTreeMap<String, Func>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub interfaces: BTreeMap<String, Interface>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub structs: BTreeMap<String, Struct>,
}

impl Content {
    /// True when no declaration of any kind is present
    pub fn is_empty(&self) -> bool {
        self.consts.is_empty()
            && self.type_aliases.is_empty()
            && self.funcs.is_empty()
            && self.interfaces.is_empty()
            && self.structs.is_empty()
    }
}

/// A constant with its (possibly inferred) type and unquoted value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Const {
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: String,
}

/// Any named type that is neither a struct nor an interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAlias {
    pub underlying_type: String,
}

/// One parameter of a function signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Param {
    /// Empty for unnamed parameters
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Param {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A function, method or interface method signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Func {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
    /// Result types joined with `", "`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
    /// Successor operation, set when a removal is paired with an addition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaced_by: Option<String>,
}

impl Func {
    /// Parameter types joined with `", "`, e.g. `context.Context, string`
    pub fn param_types(&self) -> String {
        self.params
            .iter()
            .map(|p| p.type_name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parameters with names joined with `", "`, e.g. `ctx context.Context, name string`
    pub fn named_params(&self) -> String {
        self.params
            .iter()
            .map(|p| {
                if p.name.is_empty() {
                    p.type_name.clone()
                } else {
                    format!("{} {}", p.name, p.type_name)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Type of the last parameter, if any
    pub fn last_param_type(&self) -> Option<&str> {
        self.params.last().map(|p| p.type_name.as_str())
    }

    /// First result type, if any
    pub fn first_return(&self) -> Option<&str> {
        self.returns
            .as_deref()
            .and_then(|r| split_type_list(r).into_iter().next())
    }
}

/// An interface: embedded interfaces plus the method table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anonymous_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub methods: BTreeMap<String, Func>,
}

/// A struct: embedded fields plus named field types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Struct {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anonymous_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

/// Go's export rule: the identifier starts with an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Split a joined type list on top-level commas.
///
/// Commas nested inside brackets, parens or braces belong to a single type
/// (`map[K]V`, `func(a, b int)`, `Pager[T, U]`), so a plain split is not enough.
pub fn split_type_list(joined: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in joined.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(joined[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let tail = joined[start..].trim();
    if !tail.is_empty() || !parts.is_empty() {
        parts.push(tail);
    }
    parts
}
