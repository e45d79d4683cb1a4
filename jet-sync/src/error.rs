//! Error types for jet-sync.

use std::path::PathBuf;

use thiserror::Error;

use jet_core::{CoreError, EditorAlias, StorageId};
use jet_discovery::DiscoveryError;

use crate::validate::ValidationErrors;

/// All errors that can arise from synchronization.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from core types, the config file or the id store.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// An error while discovering models.
    #[error("discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error (CMS snapshot).
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The model batch failed validation; nothing was written.
    #[error("invalid data type models: {0}")]
    Validation(#[from] ValidationErrors),

    /// More than one existing definition shares the model's name and editor.
    #[error("ambiguous match: {count} data types named '{name}' use editor '{editor}'")]
    AmbiguousMatch {
        name: String,
        editor: EditorAlias,
        count: usize,
    },

    /// Two models of one run resolved to the same existing definition.
    #[error("data types '{claimed_by}' and '{name}' both resolve to definition {id}")]
    DefinitionClaimed {
        id: StorageId,
        name: String,
        claimed_by: String,
    },

    /// The definition could not be fetched back by name after saving it.
    #[error("data type '{name}' not found after save")]
    DefinitionNotFound { name: String },

    /// A synchronizer was built without one of its collaborators.
    #[error("synchronizer is missing its {0}")]
    MissingCollaborator(&'static str),

    /// The data type service rejected an operation.
    #[error("data type service error: {0}")]
    Service(String),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
