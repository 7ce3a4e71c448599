//! Delta output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Collections use `BTreeMap`/`BTreeSet` for deterministic serialization.

use crate::exports;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A before/after value for one key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub from: String,
    pub to: String,
}

impl Signature {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Parameter and return changes of one function. At least one side is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncSig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Signature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<Signature>,
}

impl FuncSig {
    pub fn is_empty(&self) -> bool {
        self.params.is_none() && self.returns.is_none()
    }
}

/// Declarations present on one side only.
///
/// Structs and interfaces appear in two flavours: complete (the whole type is
/// new or gone, key recorded in the `complete_*` set) and partial (the type
/// persists and only the listed members are new or gone).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(flatten)]
    pub content: exports::Content,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub complete_structs: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub complete_interfaces: BTreeSet<String>,
}

impl Content {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Structs that are wholly added or removed
    pub fn complete_structs(&self) -> Vec<&str> {
        self.content
            .structs
            .keys()
            .filter(|k| self.complete_structs.contains(*k))
            .map(String::as_str)
            .collect()
    }

    /// Structs that persist with some fields added or removed
    pub fn modified_structs(&self) -> Vec<&str> {
        self.content
            .structs
            .keys()
            .filter(|k| !self.complete_structs.contains(*k))
            .map(String::as_str)
            .collect()
    }

    /// Interfaces that are wholly added or removed
    pub fn complete_interfaces(&self) -> Vec<&str> {
        self.content
            .interfaces
            .keys()
            .filter(|k| self.complete_interfaces.contains(*k))
            .map(String::as_str)
            .collect()
    }

    /// Interfaces that persist with some methods added or removed
    pub fn modified_interfaces(&self) -> Vec<&str> {
        self.content
            .interfaces
            .keys()
            .filter(|k| !self.complete_interfaces.contains(*k))
            .map(String::as_str)
            .collect()
    }

    /// Remove a struct together with its completeness marker.
    pub fn remove_struct(&mut self, name: &str) -> Option<exports::Struct> {
        self.complete_structs.remove(name);
        self.content.structs.remove(name)
    }
}

/// Embedded-field and field-type changes of a struct present on both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDef {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added_anonymous_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed_anonymous_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Signature>,
}

impl StructDef {
    pub fn is_empty(&self) -> bool {
        self.added_anonymous_fields.is_empty()
            && self.removed_anonymous_fields.is_empty()
            && self.fields.is_empty()
    }
}

/// Embedded-interface and method-signature changes of an interface present on both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDef {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added_anonymous_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed_anonymous_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub methods: BTreeMap<String, FuncSig>,
}

impl InterfaceDef {
    pub fn is_empty(&self) -> bool {
        self.added_anonymous_fields.is_empty()
            && self.removed_anonymous_fields.is_empty()
            && self.methods.is_empty()
    }
}

/// Alterations of declarations present on both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub consts: BTreeMap<String, Signature>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub type_aliases: BTreeMap<String, Signature>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub funcs: BTreeMap<String, FuncSig>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub interfaces: BTreeMap<String, InterfaceDef>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub structs: BTreeMap<String, StructDef>,
}

impl Changes {
    /// True when no entry carries any change
    pub fn is_empty(&self) -> bool {
        self.consts.is_empty()
            && self.type_aliases.is_empty()
            && self.funcs.values().all(FuncSig::is_empty)
            && self.interfaces.values().all(InterfaceDef::is_empty)
            && self.structs.values().all(StructDef::is_empty)
    }

    /// Drop struct and interface entries left without any change.
    pub fn prune_empty(&mut self) {
        self.funcs.retain(|_, sig| !sig.is_empty());
        self.interfaces.retain(|_, def| !def.is_empty());
        self.structs.retain(|_, def| !def.is_empty());
    }
}
