//! Matching a model to the definition it already has in the CMS.
//!
//! Match precedence:
//! 1. Tracked stable id whose storage id is still among the definitions
//! 2. Exact (case-sensitive) name and editor alias
//!
//! Step 2 must yield at most one definition; more is a configuration conflict.

use jet_core::{DataTypeDefinition, DataTypeModel};

use crate::service::TypeRepository;
use crate::SyncError;

/// Finds the existing definition for a model.
pub struct DataTypeFinder<'a> {
    repository: &'a dyn TypeRepository,
}

impl<'a> DataTypeFinder<'a> {
    pub fn new(repository: &'a dyn TypeRepository) -> Self {
        Self { repository }
    }

    /// Return the definition `model` corresponds to, if any.
    ///
    /// Returns [`SyncError::AmbiguousMatch`] when several definitions share the
    /// model's name and editor and no tracked id disambiguates them.
    pub fn find<'d>(
        &self,
        model: &DataTypeModel,
        definitions: &'d [DataTypeDefinition],
    ) -> Result<Option<&'d DataTypeDefinition>, SyncError> {
        if let Some(stable_id) = model.id {
            if let Some(storage_id) = self.repository.definition_id(&stable_id) {
                if let Some(found) = definitions.iter().find(|d| d.id == storage_id) {
                    tracing::debug!(
                        "matched '{}' by id {stable_id} to definition {storage_id}",
                        model.name
                    );
                    return Ok(Some(found));
                }
                tracing::debug!(
                    "tracked definition {storage_id} for '{}' no longer exists; matching by name",
                    model.name
                );
            }
        }

        let mut candidates = definitions
            .iter()
            .filter(|d| d.name == model.name && d.editor == model.editor);
        let first = candidates.next();
        let others = candidates.count();
        if others > 0 {
            return Err(SyncError::AmbiguousMatch {
                name: model.name.clone(),
                editor: model.editor.clone(),
                count: others + 1,
            });
        }
        if let Some(found) = first {
            tracing::debug!("matched '{}' by name to definition {}", model.name, found.id);
        }
        Ok(first)
    }
}
