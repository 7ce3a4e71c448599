//! Export surface extraction.
//!
//! Parses the `.go` files of one package directory and records every
//! exported top-level declaration: constants, named types (alias, struct,
//! interface) and functions/methods. Nothing inside a function body is
//! visited.
//!
//! ## Entry point
//!
//! ```ignore
//! use apidelta_core::exports::extract;
//!
//! let content = extract(std::path::Path::new("sdk/resourcemanager/foo/armfoo"))?;
//! ```

pub mod extract;
pub mod model;
pub mod source;
pub mod visitor;

pub use extract::{detect_preview_api_version, extract};
pub use model::{
    is_exported, split_type_list, Const, Content, Func, Interface, Param, Struct, TypeAlias,
};
pub use source::SourceCache;
