//! apidelta core - export diffing, changelog rendering and version classification
//!
//! This crate provides the pipeline that compares two snapshots of a Go
//! package's public surface:
//! - Export extraction from package sources (tree-sitter Go grammar)
//! - Structural delta and breaking/additive report building
//! - Heuristic filter passes removing known regeneration noise
//! - Deterministic markdown rendering and change summaries
//! - Next-version and release-label classification

pub mod changelog;
pub mod config;
pub mod delta;
pub mod errors;
pub mod exports;
pub mod filter;
pub mod logging_facility;
pub mod report;
pub mod version;

// Re-export commonly used types
pub use changelog::Changelog;
pub use config::PipelineConfig;
pub use errors::{ApiDeltaError, ExError, ExErrorKind, Result};
pub use exports::{extract, Content};
pub use filter::{ChangelogFilter, FilterKind, FilterPipeline};
pub use report::{Package, ReportOption};
pub use version::{classify, ReleaseLabel, VersionDecision};
