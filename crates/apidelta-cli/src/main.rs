//! apidelta CLI
//!
//! Command-line interface for comparing two snapshots of a Go package

use apidelta_core::errors::{ApiDeltaError, ExError};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "apidelta")]
#[command(about = "apidelta - Go package API changelog and version classifier", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render the changelog between two package directories
    Changelog(commands::changelog::ChangelogArgs),
    /// Compute the next version and release label
    Version(commands::version::VersionArgs),
    /// Print the exported surface of one package as JSON
    Exports(commands::exports::ExportsArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Changelog(args) => commands::changelog::execute(args),
        Commands::Version(args) => commands::version::execute(args),
        Commands::Exports(args) => commands::exports::execute(args),
    };

    if let Err(e) = result {
        match e.downcast::<ApiDeltaError>() {
            Ok(err) => eprintln!("Error: {}", ExError::from(*err)),
            Err(other) => eprintln!("Error: {}", other),
        }
        std::process::exit(1);
    }
}
