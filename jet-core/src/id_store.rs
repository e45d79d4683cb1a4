//! Id store — the stable id → storage id mapping that lets a renamed model
//! find its definition again.
//!
//! Persists an [`IdStoreFile`] JSON document at `<home>/.jet/ids.json`.
//! Writes use the same atomic `.tmp` + rename pattern as the config file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};
use crate::fs::{jet_dir_at, write_atomic};
use crate::types::{StableId, StorageId};

/// In-memory id map.
pub type IdMap = BTreeMap<StableId, StorageId>;

/// On-disk id store payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdStoreFile {
    pub updated_at: DateTime<Utc>,
    pub definitions: IdMap,
}

impl Default for IdStoreFile {
    fn default() -> Self {
        Self {
            updated_at: Utc::now(),
            definitions: IdMap::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdStoreCompat {
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    definitions: IdMap,
}

/// `<home>/.jet/ids.json` — pure, no I/O.
pub fn store_path_at(home: &Path) -> PathBuf {
    jet_dir_at(home).join("ids.json")
}

/// Load the id store.
///
/// Returns an empty store if the file does not yet exist.
pub fn load_at(home: &Path) -> Result<IdStoreFile, CoreError> {
    let path = store_path_at(home);
    if !path.exists() {
        return Ok(IdStoreFile::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    let store: IdStoreCompat = serde_json::from_str(&contents)
        .map_err(|source| CoreError::IdStoreParse { path, source })?;
    Ok(IdStoreFile {
        updated_at: store.updated_at.unwrap_or_else(Utc::now),
        definitions: store.definitions,
    })
}

/// Save the id store atomically.
pub fn save_at(home: &Path, store: &IdStoreFile) -> Result<(), CoreError> {
    let json = serde_json::to_string_pretty(store)?;
    write_atomic(&store_path_at(home), json.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use uuid::Uuid;

    #[test]
    fn empty_store_when_file_missing() {
        let home = TempDir::new().unwrap();
        let store = load_at(home.path()).unwrap();
        assert!(store.definitions.is_empty());
    }

    #[test]
    fn roundtrip_save_load() {
        let home = TempDir::new().unwrap();
        let mut store = IdStoreFile::default();
        store
            .definitions
            .insert(StableId(Uuid::new_v4()), StorageId(1042));
        save_at(home.path(), &store).unwrap();

        let loaded = load_at(home.path()).unwrap();
        assert_eq!(loaded.definitions, store.definitions);
    }

    #[test]
    fn load_without_updated_at_sets_timestamp() {
        let home = TempDir::new().unwrap();
        let path = store_path_at(home.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"{"definitions":{"8a4cbd3f-8f5e-4c07-9c52-2c3f0f2f6a10":7}}"#,
        )
        .unwrap();

        let before = Utc::now();
        let loaded = load_at(home.path()).unwrap();
        let after = Utc::now();

        assert_eq!(loaded.definitions.len(), 1);
        assert!(loaded.updated_at >= before && loaded.updated_at <= after);
    }

    #[test]
    fn corrupt_store_reports_path() {
        let home = TempDir::new().unwrap();
        let path = store_path_at(home.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_at(home.path()).unwrap_err();
        assert!(matches!(err, CoreError::IdStoreParse { .. }));
        assert!(err.to_string().contains("ids.json"));
    }
}
