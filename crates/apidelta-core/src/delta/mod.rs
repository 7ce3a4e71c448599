//! Export diff engine.
//!
//! Compares two extracted [`exports::Content`](crate::exports::Content)
//! snapshots and produces added/removed declaration sets plus per-key
//! signature changes.
//!
//! ## Guarantees
//!
//! - **Totality**: no function here fails; partial or empty snapshots yield
//!   partial or empty results.
//! - **Determinism**: all maps are ordered, so identical inputs produce
//!   byte-identical serialized output.
//! - **Disjointness**: no member key is both added and removed.

pub mod engine;
pub mod model;

pub use engine::{
    const_type_changes, exports, func_sig, func_sig_changes, interface_method_sig_changes,
    struct_field_changes, type_alias_changes,
};
pub use model::{Changes, Content, FuncSig, InterfaceDef, Signature, StructDef};
