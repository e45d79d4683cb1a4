//! [`TypeRepository`] implementations.

use std::path::{Path, PathBuf};

use chrono::Utc;

use jet_core::id_store::{self, IdMap, IdStoreFile};
use jet_core::{StableId, StorageId};

use crate::service::TypeRepository;
use crate::SyncError;

/// Id tracking kept in memory only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTypeRepository {
    definitions: IdMap,
}

impl MemoryTypeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping(mut self, id: StableId, storage_id: StorageId) -> Self {
        self.definitions.insert(id, storage_id);
        self
    }

    pub fn mappings(&self) -> &IdMap {
        &self.definitions
    }
}

impl TypeRepository for MemoryTypeRepository {
    fn definition_id(&self, id: &StableId) -> Option<StorageId> {
        self.definitions.get(id).copied()
    }

    fn set_definition_id(&mut self, id: StableId, storage_id: StorageId) -> Result<(), SyncError> {
        self.definitions.insert(id, storage_id);
        Ok(())
    }
}

/// Id tracking backed by `<home>/.jet/ids.json`.
///
/// The store is read once on open and written back after every
/// [`TypeRepository::set_definition_id`].
#[derive(Debug, Clone)]
pub struct FileTypeRepository {
    home: PathBuf,
    store: IdStoreFile,
}

impl FileTypeRepository {
    pub fn open_at(home: &Path) -> Result<Self, SyncError> {
        Ok(Self {
            home: home.to_path_buf(),
            store: id_store::load_at(home)?,
        })
    }

    pub fn mappings(&self) -> &IdMap {
        &self.store.definitions
    }
}

impl TypeRepository for FileTypeRepository {
    fn definition_id(&self, id: &StableId) -> Option<StorageId> {
        self.store.definitions.get(id).copied()
    }

    fn set_definition_id(&mut self, id: StableId, storage_id: StorageId) -> Result<(), SyncError> {
        self.store.definitions.insert(id, storage_id);
        self.store.updated_at = Utc::now();
        id_store::save_at(&self.home, &self.store)?;
        Ok(())
    }
}
