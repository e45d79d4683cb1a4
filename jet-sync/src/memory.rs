//! In-memory [`DataTypeService`] with a JSON snapshot on disk.
//!
//! Behaves like the CMS where it matters to synchronization: names are
//! unique, storage ids are assigned on create, and saving pre-values assigns
//! entry ids and sort order the caller did not send. Every service call is
//! recorded in [`MemoryDataTypeService::calls`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use jet_core::fs::write_atomic;
use jet_core::{
    DataTypeDefinition, NewDataTypeDefinition, PreValue, PreValueCollection, PreValueMap,
    StorageId,
};

use crate::error::io_err;
use crate::service::DataTypeService;
use crate::SyncError;

/// One recorded call on a [`MemoryDataTypeService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    AllDefinitions,
    Create { name: String },
    Update { id: StorageId },
    DefinitionByName { name: String },
    PreValues { id: StorageId },
    SavePreValues { id: StorageId },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryDataTypeService {
    #[serde(default)]
    definitions: BTreeMap<StorageId, DataTypeDefinition>,
    #[serde(default)]
    pre_values: BTreeMap<StorageId, PreValueCollection>,
    #[serde(default)]
    last_id: i64,
    #[serde(default)]
    last_pre_value_id: i64,
    #[serde(skip)]
    calls: RefCell<Vec<ServiceCall>>,
}

impl MemoryDataTypeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot from `path`; a missing file is an empty service.
    pub fn load_at(path: &Path) -> Result<Self, SyncError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save a snapshot to `path` atomically, readable by the owner only.
    pub fn save_at(&self, path: &Path) -> Result<(), SyncError> {
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(path, json.as_bytes())?;
        Ok(())
    }

    /// Seed a definition directly, bypassing call recording.
    pub fn insert(&mut self, definition: NewDataTypeDefinition) -> DataTypeDefinition {
        self.last_id += 1;
        let definition = DataTypeDefinition {
            id: StorageId(self.last_id),
            name: definition.name,
            editor: definition.editor,
            database_type: definition.database_type,
        };
        self.definitions.insert(definition.id, definition.clone());
        definition
    }

    /// Seed pre-values directly, e.g. a legacy positional list.
    pub fn set_pre_values(&mut self, id: StorageId, pre_values: PreValueCollection) {
        self.pre_values.insert(id, pre_values);
    }

    pub fn definitions(&self) -> impl Iterator<Item = &DataTypeDefinition> {
        self.definitions.values()
    }

    /// Stored pre-values without recording a call.
    pub fn stored_pre_values(&self, id: StorageId) -> Option<&PreValueCollection> {
        self.pre_values.get(&id)
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: ServiceCall) {
        self.calls.borrow_mut().push(call);
    }

    fn ensure_unique_name(&self, name: &str, except: Option<StorageId>) -> Result<(), SyncError> {
        let taken = self
            .definitions
            .values()
            .any(|d| d.name == name && Some(d.id) != except);
        if taken {
            return Err(SyncError::Service(format!(
                "a data type named '{name}' already exists"
            )));
        }
        Ok(())
    }
}

impl DataTypeService for MemoryDataTypeService {
    fn all_definitions(&self) -> Result<Vec<DataTypeDefinition>, SyncError> {
        self.record(ServiceCall::AllDefinitions);
        Ok(self.definitions.values().cloned().collect())
    }

    fn create(
        &mut self,
        definition: NewDataTypeDefinition,
    ) -> Result<DataTypeDefinition, SyncError> {
        self.record(ServiceCall::Create {
            name: definition.name.clone(),
        });
        self.ensure_unique_name(&definition.name, None)?;
        Ok(self.insert(definition))
    }

    fn update(&mut self, definition: DataTypeDefinition) -> Result<DataTypeDefinition, SyncError> {
        self.record(ServiceCall::Update { id: definition.id });
        if !self.definitions.contains_key(&definition.id) {
            return Err(SyncError::Service(format!(
                "no data type with id {}",
                definition.id
            )));
        }
        self.ensure_unique_name(&definition.name, Some(definition.id))?;
        self.definitions.insert(definition.id, definition.clone());
        Ok(definition)
    }

    fn definition_by_name(&self, name: &str) -> Result<Option<DataTypeDefinition>, SyncError> {
        self.record(ServiceCall::DefinitionByName {
            name: name.to_owned(),
        });
        Ok(self.definitions.values().find(|d| d.name == name).cloned())
    }

    fn pre_values(&self, id: StorageId) -> Result<PreValueCollection, SyncError> {
        self.record(ServiceCall::PreValues { id });
        Ok(self.pre_values.get(&id).cloned().unwrap_or_default())
    }

    fn save_pre_values(&mut self, id: StorageId, pre_values: PreValueMap) -> Result<(), SyncError> {
        self.record(ServiceCall::SavePreValues { id });
        if !self.definitions.contains_key(&id) {
            return Err(SyncError::Service(format!("no data type with id {id}")));
        }
        let mut stored = PreValueMap::new();
        for (sort_order, (key, pre_value)) in pre_values.into_iter().enumerate() {
            let entry_id = match pre_value.id {
                Some(existing) => existing,
                None => {
                    self.last_pre_value_id += 1;
                    self.last_pre_value_id
                }
            };
            stored.insert(
                key,
                PreValue {
                    id: Some(entry_id),
                    value: pre_value.value,
                    sort_order: i32::try_from(sort_order).unwrap_or(i32::MAX),
                },
            );
        }
        self.pre_values
            .insert(id, PreValueCollection::Dictionary(stored));
        Ok(())
    }
}
