//! Collaborator interfaces the synchronizer is built from.

use jet_core::{
    DataTypeDefinition, DataTypeModel, NewDataTypeDefinition, PreValueCollection, PreValueMap,
    StableId, StorageId,
};
use jet_discovery::ManifestSource;

use crate::SyncError;

/// The CMS's data type persistence.
///
/// Implementations own their storage; errors surface unchanged through
/// [`crate::DataTypeSynchronizer::run`].
pub trait DataTypeService {
    fn all_definitions(&self) -> Result<Vec<DataTypeDefinition>, SyncError>;

    /// Persist a new definition and return it with its assigned storage id.
    fn create(&mut self, definition: NewDataTypeDefinition)
        -> Result<DataTypeDefinition, SyncError>;

    fn update(&mut self, definition: DataTypeDefinition) -> Result<DataTypeDefinition, SyncError>;

    fn definition_by_name(&self, name: &str) -> Result<Option<DataTypeDefinition>, SyncError>;

    fn pre_values(&self, id: StorageId) -> Result<PreValueCollection, SyncError>;

    /// Replace every pre-value of the definition with `pre_values`.
    fn save_pre_values(&mut self, id: StorageId, pre_values: PreValueMap)
        -> Result<(), SyncError>;
}

/// Where data type models come from. Called once per run.
pub trait ModelSource {
    fn data_types(&self) -> Result<Vec<DataTypeModel>, SyncError>;
}

impl ModelSource for Vec<DataTypeModel> {
    fn data_types(&self) -> Result<Vec<DataTypeModel>, SyncError> {
        Ok(self.clone())
    }
}

impl ModelSource for ManifestSource {
    fn data_types(&self) -> Result<Vec<DataTypeModel>, SyncError> {
        Ok(self.discover()?)
    }
}

/// Stable id → storage id tracking.
pub trait TypeRepository {
    fn definition_id(&self, id: &StableId) -> Option<StorageId>;

    /// Record (or overwrite) the storage id a stable id maps to.
    fn set_definition_id(&mut self, id: StableId, storage_id: StorageId) -> Result<(), SyncError>;
}
