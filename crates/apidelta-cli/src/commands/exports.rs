//! Exports command
//!
//! Usage: apidelta exports <DIR>

use apidelta_core::exports::extract;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportsArgs {
    /// Package directory to extract
    pub dir: PathBuf,

    /// Pipeline config file (TOML); only its log profile applies
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Execute exports command
pub fn execute(args: ExportsArgs) -> Result<(), Box<dyn std::error::Error>> {
    super::setup(args.config.as_deref())?;
    let content = extract(&args.dir)?;
    println!("{}", serde_json::to_string_pretty(&content)?);
    Ok(())
}
