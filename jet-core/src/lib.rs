//! Jet core library — domain types, configuration, id store, errors.
//!
//! Public API surface:
//! - [`types`] — model descriptors, persisted definitions, pre-values
//! - [`config`] — `~/.jet/config.yaml` load / save
//! - [`id_store`] — `~/.jet/ids.json` stable id → storage id mapping
//! - [`error`] — [`CoreError`]
//! - [`fs`] — home directory lookup and atomic writes

pub mod config;
pub mod error;
pub mod fs;
pub mod id_store;
pub mod types;

pub use config::{JetConfig, SchemaKind, SyncMode};
pub use error::CoreError;
pub use types::{
    DataTypeDefinition, DataTypeModel, DatabaseType, EditorAlias, NewDataTypeDefinition,
    PreValue, PreValueCollection, PreValueMap, StableId, StorageId, ValueType,
};
