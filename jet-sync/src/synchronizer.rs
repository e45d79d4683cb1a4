//! Data type synchronization.
//!
//! ## `run` — per batch
//!
//! 1. Pull models from the source; an empty batch makes no service calls.
//! 2. Validate the whole batch; a failure aborts before any write.
//! 3. Fetch every existing definition once.
//! 4. Per model: match, create or update, fetch back by name, reconcile
//!    pre-values, track the stable id.
//!
//! The snapshot is not refreshed between models, so each definition a model
//! resolves to is claimed for the rest of the run. A later model matching a
//! claimed definition is an error rather than a second owner.
//!
//! A failing model aborts the remaining ones; definitions already written stay
//! written.

use std::collections::BTreeMap;

use jet_core::{DataTypeDefinition, DataTypeModel, NewDataTypeDefinition, SchemaKind, StorageId};

use crate::finder::DataTypeFinder;
use crate::prevalues::{self, PreValueOutcome};
use crate::service::{DataTypeService, ModelSource, TypeRepository};
use crate::validate::validate;
use crate::SyncError;

/// A startup synchronizer for one kind of schema record.
pub trait Synchronizer {
    fn kind(&self) -> SchemaKind;

    fn run(&mut self) -> Result<(), SyncError>;
}

/// Synchronizes data type models with the CMS's data type definitions.
pub struct DataTypeSynchronizer<'a> {
    service: &'a mut dyn DataTypeService,
    source: &'a dyn ModelSource,
    repository: &'a mut dyn TypeRepository,
}

impl<'a> DataTypeSynchronizer<'a> {
    pub fn new(
        service: &'a mut dyn DataTypeService,
        source: &'a dyn ModelSource,
        repository: &'a mut dyn TypeRepository,
    ) -> Self {
        Self {
            service,
            source,
            repository,
        }
    }

    pub fn builder() -> SynchronizerBuilder<'a> {
        SynchronizerBuilder::default()
    }

    /// Synchronize every model the source declares.
    pub fn run(&mut self) -> Result<(), SyncError> {
        let models = self.source.data_types()?;
        if models.is_empty() {
            tracing::debug!("no data type models declared; nothing to synchronize");
            return Ok(());
        }

        validate(&models)?;

        let definitions = self.service.all_definitions()?;
        tracing::info!(
            "synchronizing {} data type model(s) against {} existing definition(s)",
            models.len(),
            definitions.len()
        );

        let mut claimed: BTreeMap<StorageId, String> = BTreeMap::new();
        for model in &models {
            let id = self.synchronize(&definitions, &claimed, model)?;
            claimed.insert(id, model.name.clone());
        }
        Ok(())
    }

    fn synchronize(
        &mut self,
        definitions: &[DataTypeDefinition],
        claimed: &BTreeMap<StorageId, String>,
        model: &DataTypeModel,
    ) -> Result<StorageId, SyncError> {
        let existing = DataTypeFinder::new(&*self.repository)
            .find(model, definitions)?
            .cloned();
        if let Some(found) = &existing {
            if let Some(owner) = claimed.get(&found.id) {
                return Err(SyncError::DefinitionClaimed {
                    id: found.id,
                    name: model.name.clone(),
                    claimed_by: owner.clone(),
                });
            }
        }
        let created = existing.is_none();

        match existing {
            None => {
                self.service.create(create_definition(model))?;
                tracing::info!("created data type '{}' ({})", model.name, model.editor);
            }
            Some(mut definition) => {
                update_definition(&mut definition, model);
                self.service.update(definition)?;
                tracing::info!("updated data type '{}' ({})", model.name, model.editor);
            }
        }

        // The service may fill in defaults on save; work from what it stored.
        let definition = self
            .service
            .definition_by_name(&model.name)?
            .ok_or_else(|| SyncError::DefinitionNotFound {
                name: model.name.clone(),
            })?;

        let outcome = if created {
            prevalues::initial(&mut *self.service, definition.id, model.pre_values.as_ref())?
        } else {
            prevalues::merge(&mut *self.service, definition.id, model.pre_values.as_ref())?
        };
        if outcome != PreValueOutcome::Untouched {
            tracing::debug!("pre-values of '{}': {outcome:?}", model.name);
        }

        if let Some(id) = model.id {
            self.repository.set_definition_id(id, definition.id)?;
        }
        Ok(definition.id)
    }
}

impl Synchronizer for DataTypeSynchronizer<'_> {
    fn kind(&self) -> SchemaKind {
        SchemaKind::DataTypes
    }

    fn run(&mut self) -> Result<(), SyncError> {
        DataTypeSynchronizer::run(self)
    }
}

/// A new, unsaved definition for `model`.
pub fn create_definition(model: &DataTypeModel) -> NewDataTypeDefinition {
    NewDataTypeDefinition {
        name: model.name.clone(),
        editor: model.editor.clone(),
        database_type: model.database_type(),
    }
}

/// Overwrite the model-owned fields of an existing definition.
pub fn update_definition(definition: &mut DataTypeDefinition, model: &DataTypeModel) {
    definition.name = model.name.clone();
    definition.editor = model.editor.clone();
    definition.database_type = model.database_type();
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Assembles a [`DataTypeSynchronizer`] from collaborators supplied one by one.
#[derive(Default)]
pub struct SynchronizerBuilder<'a> {
    service: Option<&'a mut dyn DataTypeService>,
    source: Option<&'a dyn ModelSource>,
    repository: Option<&'a mut dyn TypeRepository>,
}

impl<'a> SynchronizerBuilder<'a> {
    pub fn service(mut self, service: &'a mut dyn DataTypeService) -> Self {
        self.service = Some(service);
        self
    }

    pub fn source(mut self, source: &'a dyn ModelSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn repository(mut self, repository: &'a mut dyn TypeRepository) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Returns [`SyncError::MissingCollaborator`] naming the first one absent.
    pub fn build(self) -> Result<DataTypeSynchronizer<'a>, SyncError> {
        Ok(DataTypeSynchronizer {
            service: self
                .service
                .ok_or(SyncError::MissingCollaborator("data type service"))?,
            source: self
                .source
                .ok_or(SyncError::MissingCollaborator("model source"))?,
            repository: self
                .repository
                .ok_or(SyncError::MissingCollaborator("type repository"))?,
        })
    }
}
