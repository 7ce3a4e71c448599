//! Version command
//!
//! Usage: apidelta version --old <DIR> --new <DIR> --previous <VERSION> [--preview] [--json]

use apidelta_core::exports::detect_preview_api_version;
use apidelta_core::version::classify;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct VersionArgs {
    /// Package directory at the previous revision (missing means new package)
    #[arg(long)]
    pub old: PathBuf,

    /// Package directory at the current revision
    #[arg(long)]
    pub new: PathBuf,

    /// Previously released version, e.g. `v1.2.0` or a full tag path
    #[arg(long)]
    pub previous: String,

    /// Target the preview line; detected from `api-version` strings when absent
    #[arg(long)]
    pub preview: bool,

    /// Print the decision as JSON
    #[arg(long)]
    pub json: bool,

    /// Pipeline config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Execute version command
pub fn execute(args: VersionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::setup(args.config.as_deref())?;
    let changelog = super::build_changelog(&args.old, &args.new, &config)?;

    let is_preview = args.preview || (args.new.exists() && detect_preview_api_version(&args.new)?);
    let decision = classify(&args.previous, is_preview, &changelog)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        println!("{} {}", decision.version, decision.label);
    }

    Ok(())
}
