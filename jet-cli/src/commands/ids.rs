//! `jet ids` — tracked stable id → storage id mappings.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use jet_core::id_store;
use jet_sync::MemoryDataTypeService;

use super::{default_cms_path, home};

/// Arguments for `jet ids`.
#[derive(Args, Debug)]
pub struct IdsArgs {
    /// CMS snapshot used to show current definition names.
    #[arg(long)]
    pub cms: Option<PathBuf>,

    /// Directory holding `.jet/` (config and id store). Defaults to $HOME.
    #[arg(long)]
    pub home: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct IdsReportJson {
    updated_at: String,
    definitions: Vec<IdRow>,
}

#[derive(Serialize, Tabled)]
struct IdRow {
    #[tabled(rename = "stable id")]
    stable_id: String,
    #[tabled(rename = "storage id")]
    storage_id: i64,
    #[tabled(rename = "name")]
    name: String,
}

impl IdsArgs {
    pub fn run(self) -> Result<()> {
        let home = home(self.home)?;
        tracing::info!("reading tracked ids under {}", home.display());
        let store = id_store::load_at(&home).context("failed to load .jet/ids.json")?;
        let cms_path = self.cms.unwrap_or_else(|| default_cms_path(&home));
        let service = MemoryDataTypeService::load_at(&cms_path)
            .with_context(|| format!("failed to load CMS snapshot '{}'", cms_path.display()))?;
        let names: BTreeMap<_, _> = service
            .definitions()
            .map(|d| (d.id, d.name.clone()))
            .collect();

        let rows: Vec<IdRow> = store
            .definitions
            .iter()
            .map(|(stable_id, storage_id)| IdRow {
                stable_id: stable_id.to_string(),
                storage_id: storage_id.0,
                name: names.get(storage_id).cloned().unwrap_or_else(|| "-".to_string()),
            })
            .collect();

        if self.json {
            let report = IdsReportJson {
                updated_at: store.updated_at.to_rfc3339(),
                definitions: rows,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        if rows.is_empty() {
            println!("No tracked ids. Run `jet sync` with models that declare an `id`.");
            return Ok(());
        }

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        println!(
            "Last updated {} ({} ago)",
            store.updated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            format_age(store.updated_at, Utc::now())
        );
        Ok(())
    }
}

/// Coarse age of `timestamp` at `now`: `42s`, `5m`, `3h`, `2d`.
fn format_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(timestamp).num_seconds().max(0);
    match seconds {
        s if s < 60 => format!("{s}s"),
        s if s < 60 * 60 => format!("{}m", s / 60),
        s if s < 60 * 60 * 24 => format!("{}h", s / (60 * 60)),
        s => format!("{}d", s / (60 * 60 * 24)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn age_uses_the_largest_whole_unit() {
        let now = Utc::now();
        assert_eq!(format_age(now - Duration::seconds(42), now), "42s");
        assert_eq!(format_age(now - Duration::minutes(5), now), "5m");
        assert_eq!(format_age(now - Duration::hours(3), now), "3h");
        assert_eq!(format_age(now - Duration::days(2), now), "2d");
    }

    #[test]
    fn future_timestamps_read_as_now() {
        let now = Utc::now();
        assert_eq!(format_age(now + Duration::minutes(1), now), "0s");
    }
}
