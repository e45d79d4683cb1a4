//! Model discovery for `jet-discovery`.
//!
//! [`discover_at`] reads every manifest file (`*.yaml`, `*.yml`, `*.json`) in a
//! models directory and returns the data type descriptors they declare. A file
//! holds either one data type or a `data_types:` list. Files are visited in
//! name order so repeated runs see the same sequence.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use jet_core::{CoreError, DataTypeModel, StableId, ValueType};
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Errors from model discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("models directory '{path}' does not exist")]
    DirectoryNotFound { path: PathBuf },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid data type in {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: CoreError,
    },
}

/// A directory of manifest files, re-read on every [`ManifestSource::discover`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSource {
    dir: PathBuf,
}

impl ManifestSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn discover(&self) -> Result<Vec<DataTypeModel>, DiscoveryError> {
        discover_at(&self.dir)
    }
}

// ---------------------------------------------------------------------------
// Manifest format
// ---------------------------------------------------------------------------

/// Key that marks a manifest holding a list of data types.
const LIST_KEY: &str = "data_types";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestList {
    data_types: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestEntry {
    name: String,
    editor: String,
    #[serde(default, rename = "type")]
    value_type: ValueType,
    #[serde(default)]
    id: Option<StableId>,
    /// Absent means "leave pre-values alone"; `{}` means "clear them".
    #[serde(default)]
    pre_values: Option<BTreeMap<String, String>>,
}

impl ManifestEntry {
    fn into_model(self) -> Result<DataTypeModel, CoreError> {
        let mut model = DataTypeModel::new(self.name, self.editor, self.value_type)?;
        model.id = self.id;
        model.pre_values = self.pre_values;
        Ok(model)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Discover all data type descriptors declared under `dir`.
///
/// Returns `DiscoveryError::DirectoryNotFound` if `dir` is missing. Files with
/// other extensions and subdirectories are ignored.
pub fn discover_at(dir: &Path) -> Result<Vec<DataTypeModel>, DiscoveryError> {
    if !dir.is_dir() {
        return Err(DiscoveryError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files: Vec<(PathBuf, Format)> = fs::read_dir(dir)
        .map_err(|source| DiscoveryError::Io {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|e| {
            let path = e.path();
            manifest_format(&path).map(|format| (path, format))
        })
        .collect();
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut models = Vec::new();
    for (path, format) in files {
        let parsed = read_manifest(&path, format)?;
        tracing::debug!("discovered {} data type(s) in {}", parsed.len(), path.display());
        models.extend(parsed);
    }
    Ok(models)
}

fn parse_yaml(content: &str) -> Result<Vec<ManifestEntry>, String> {
    let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    if value.get(LIST_KEY).is_some() {
        serde_yaml::from_value::<ManifestList>(value).map(|list| list.data_types)
    } else {
        serde_yaml::from_value::<ManifestEntry>(value).map(|entry| vec![entry])
    }
    .map_err(|e| e.to_string())
}

fn parse_json(content: &str) -> Result<Vec<ManifestEntry>, String> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    if value.get(LIST_KEY).is_some() {
        serde_json::from_value::<ManifestList>(value).map(|list| list.data_types)
    } else {
        serde_json::from_value::<ManifestEntry>(value).map(|entry| vec![entry])
    }
    .map_err(|e| e.to_string())
}

fn manifest_format(path: &Path) -> Option<Format> {
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "yaml" | "yml" => Some(Format::Yaml),
        "json" => Some(Format::Json),
        _ => None,
    }
}

fn read_manifest(path: &Path, format: Format) -> Result<Vec<DataTypeModel>, DiscoveryError> {
    let content = fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(vec![]);
    }

    // The shape is chosen by the list key up front so a mistake inside an
    // entry is reported as that entry's error.
    let entries = match format {
        Format::Yaml => parse_yaml(&content),
        Format::Json => parse_json(&content),
    }
    .map_err(|message| DiscoveryError::Parse {
        path: path.to_path_buf(),
        message,
    })?;

    entries
        .into_iter()
        .map(|entry| {
            entry.into_model().map_err(|source| DiscoveryError::Invalid {
                path: path.to_path_buf(),
                source,
            })
        })
        .collect()
}
