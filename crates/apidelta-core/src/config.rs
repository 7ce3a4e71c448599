//! Pipeline configuration loaded from TOML.
//!
//! ```toml
//! report = "breaking_only"
//! filters = ["non_exported", "marshal_unmarshal", "lro"]
//! log_profile = "production"
//! ```
//!
//! Every key is optional; unknown keys are rejected.

use crate::errors::{ApiDeltaError, Result};
use crate::filter::{FilterKind, FilterPipeline};
use crate::logging_facility::Profile;
use crate::report::ReportOption;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Which report halves to compute
    pub report: ReportOption,
    /// Filter passes in execution order
    pub filters: Vec<FilterKind>,
    pub log_profile: Profile,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            report: ReportOption::All,
            filters: FilterKind::STANDARD.to_vec(),
            log_profile: Profile::Development,
        }
    }
}

impl PipelineConfig {
    /// Parse a config document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` on malformed TOML, unknown keys or unknown
    /// enum values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ApiDeltaError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Read and parse a config file.
    ///
    /// # Errors
    ///
    /// Returns `Io` when the file cannot be read and `InvalidConfig` when it
    /// does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ApiDeltaError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Serialize back to TOML.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| ApiDeltaError::Serialization {
            message: e.to_string(),
        })
    }

    /// Build the configured filter pipeline
    pub fn pipeline(&self) -> FilterPipeline {
        FilterPipeline::from_kinds(&self.filters)
    }
}
