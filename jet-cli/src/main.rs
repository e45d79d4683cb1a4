//! Jet — keep CMS data types in step with the models an application declares.
//!
//! # Usage
//!
//! ```text
//! jet sync --models <dir> [--cms <file>]
//! jet validate --models <dir>
//! jet ids [--cms <file>] [--json]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ids::IdsArgs, sync::SyncArgs, validate::ValidateArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "jet",
    version,
    about = "Synchronize code-declared data types with a CMS",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update data type definitions from model manifests.
    Sync(SyncArgs),

    /// Check model manifests for conflicts without touching the CMS.
    Validate(ValidateArgs),

    /// Show tracked stable id → storage id mappings.
    Ids(IdsArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Validate(args) => args.run(),
        Commands::Ids(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
