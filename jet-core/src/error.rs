//! Error types for jet-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from core types, configuration and the id store.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error (save path).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file exists but is not valid YAML for [`crate::JetConfig`].
    #[error("failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Id store exists but is not valid JSON.
    #[error("failed to parse id store at {path}: {source}")]
    IdStoreParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.jet/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// A model descriptor was declared without a name.
    #[error("data type name must not be empty")]
    EmptyName,

    /// A model descriptor was declared without a property editor alias.
    #[error("data type '{name}' has no editor alias")]
    EmptyEditor { name: String },

    /// A stable id string is not a UUID.
    #[error("invalid stable id '{value}': {source}")]
    InvalidStableId {
        value: String,
        #[source]
        source: uuid::Error,
    },
}

/// Convenience constructor for [`CoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
