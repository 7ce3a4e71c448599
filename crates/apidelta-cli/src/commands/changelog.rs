//! Changelog command
//!
//! Usage: apidelta changelog --old <DIR> --new <DIR> [--format <FORMAT>] [--output <FILE>]

use apidelta_core::changelog::{change_summary, to_compact_markdown, to_markdown};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Section headers with a blank line before the bullets
    Markdown,
    /// Headers directly followed by bullets; empty when nothing changed
    Compact,
    Json,
    /// One-line change counts
    Summary,
}

#[derive(Debug, Args)]
pub struct ChangelogArgs {
    /// Package directory at the previous revision (missing means new package)
    #[arg(long)]
    pub old: PathBuf,

    /// Package directory at the current revision
    #[arg(long)]
    pub new: PathBuf,

    #[arg(long, value_enum, default_value = "markdown")]
    pub format: Format,

    /// Pipeline config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute changelog command
pub fn execute(args: ChangelogArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::setup(args.config.as_deref())?;
    let changelog = super::build_changelog(&args.old, &args.new, &config)?;

    let text = match args.format {
        Format::Markdown => to_markdown(&changelog),
        Format::Compact => to_compact_markdown(&changelog),
        Format::Json => changelog.to_json()?,
        Format::Summary => change_summary(&changelog),
    };

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, &text)?;
        println!("✓ Changelog written to {}", output_path.display());
    } else if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }

    Ok(())
}
