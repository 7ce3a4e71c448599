pub mod changelog;
pub mod exports;
pub mod version;

use apidelta_core::changelog::Changelog;
use apidelta_core::errors::Result;
use apidelta_core::exports::{extract, Content};
use apidelta_core::logging_facility;
use apidelta_core::PipelineConfig;
use std::path::Path;

/// Load the config file when given, otherwise defaults, and start logging
/// with its profile.
pub fn setup(config: Option<&Path>) -> Result<PipelineConfig> {
    let config = match config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    logging_facility::init(config.log_profile);
    Ok(config)
}

/// A directory that does not exist is a package absent at that revision.
fn snapshot(dir: &Path) -> Result<Option<Content>> {
    if !dir.exists() {
        tracing::debug!(dir = %dir.display(), "snapshot directory missing");
        return Ok(None);
    }
    extract(dir).map(Some)
}

/// Extract both snapshots, build the report and run the configured filters.
pub fn build_changelog(old: &Path, new: &Path, config: &PipelineConfig) -> Result<Changelog> {
    let old = snapshot(old)?;
    let new = snapshot(new)?;
    let changelog = Changelog::between(old.as_ref(), new.as_ref(), config.report);
    Ok(config.pipeline().run(changelog))
}
