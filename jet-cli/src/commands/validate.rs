//! `jet validate` — report every conflict in a set of model manifests.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use jet_discovery::discover_at;
use jet_sync::validate;

/// Arguments for `jet validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Directory of data type manifests (*.yaml, *.yml, *.json).
    #[arg(long, short = 'm')]
    pub models: PathBuf,
}

impl ValidateArgs {
    pub fn run(self) -> Result<()> {
        let models = discover_at(&self.models)
            .with_context(|| format!("failed to read models in '{}'", self.models.display()))?;

        tracing::info!(
            "validating {} model(s) from {}",
            models.len(),
            self.models.display()
        );
        match validate(&models) {
            Ok(()) => {
                println!(
                    "{} {} data type model(s) are valid",
                    "✓".green().bold(),
                    models.len()
                );
                Ok(())
            }
            Err(errors) => {
                for issue in errors.issues() {
                    println!("{} {issue}", "✗".red().bold());
                }
                bail!("{} problem(s) found", errors.issues().len())
            }
        }
    }
}
