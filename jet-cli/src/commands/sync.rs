//! `jet sync` — create or update data type definitions from model manifests.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use jet_core::{config, SchemaKind};
use jet_discovery::ManifestSource;
use jet_sync::{
    ApplicationHandler, DataTypeSynchronizer, FileTypeRepository, MemoryDataTypeService,
};

use super::{default_cms_path, home};

/// Arguments for `jet sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Directory of data type manifests (*.yaml, *.yml, *.json).
    #[arg(long, short = 'm')]
    pub models: PathBuf,

    /// CMS snapshot file. Defaults to ~/.jet/cms.json; created if missing.
    #[arg(long)]
    pub cms: Option<PathBuf>,

    /// Directory holding `.jet/` (config and id store). Defaults to $HOME.
    #[arg(long)]
    pub home: Option<PathBuf>,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let home = home(self.home)?;
        let config = config::load_at(&home).context("failed to load .jet/config.yaml")?;
        let cms_path = self.cms.unwrap_or_else(|| default_cms_path(&home));

        let mut service = MemoryDataTypeService::load_at(&cms_path)
            .with_context(|| format!("failed to load CMS snapshot '{}'", cms_path.display()))?;
        let mut repository =
            FileTypeRepository::open_at(&home).context("failed to load .jet/ids.json")?;
        let source = ManifestSource::new(&self.models);
        tracing::info!(
            "syncing models in {} against {}",
            self.models.display(),
            cms_path.display()
        );

        let handler = ApplicationHandler::new();
        let outcome = {
            let mut data_types = DataTypeSynchronizer::new(&mut service, &source, &mut repository);
            handler.on_started(&config, &mut [&mut data_types])
        };

        // Definitions written before a failure stay written, as they would in the CMS.
        tracing::info!("saving CMS snapshot to {}", cms_path.display());
        service
            .save_at(&cms_path)
            .with_context(|| format!("failed to save CMS snapshot '{}'", cms_path.display()))?;
        let ran = outcome.with_context(|| {
            format!("sync failed for models in '{}'", self.models.display())
        })?;

        if !ran {
            println!("CMS is not installed (see ~/.jet/config.yaml); nothing synchronized.");
            return Ok(());
        }
        if !config.is_enabled(SchemaKind::DataTypes) {
            println!("Data type synchronization is disabled in ~/.jet/config.yaml.");
            return Ok(());
        }

        let definitions: Vec<_> = service.definitions().collect();
        println!(
            "✓ data types synced ({} definition(s), {} tracked id(s))",
            definitions.len(),
            repository.mappings().len()
        );
        for definition in definitions {
            println!(
                "  ·  {} [{}] {} — {}",
                definition.id, definition.editor, definition.name, definition.database_type
            );
        }
        Ok(())
    }
}
