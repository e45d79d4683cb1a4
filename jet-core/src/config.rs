//! `~/.jet/config.yaml` — which schema kinds are synchronized at startup.
//!
//! Every function takes the home directory explicitly; callers resolve it with
//! [`crate::fs::home`] or pass a `TempDir` in tests.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};
use crate::fs::{jet_dir_at, write_atomic};

/// A kind of schema record the CMS keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    DataTypes,
    DocumentTypes,
    MediaTypes,
    MemberTypes,
}

impl SchemaKind {
    pub fn all() -> &'static [SchemaKind] {
        &[
            SchemaKind::DataTypes,
            SchemaKind::DocumentTypes,
            SchemaKind::MediaTypes,
            SchemaKind::MemberTypes,
        ]
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::DataTypes => write!(f, "data types"),
            SchemaKind::DocumentTypes => write!(f, "document types"),
            SchemaKind::MediaTypes => write!(f, "media types"),
            SchemaKind::MemberTypes => write!(f, "member types"),
        }
    }
}

/// One entry of the `synchronize` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    None,
    DataTypes,
    DocumentTypes,
    MediaTypes,
    MemberTypes,
    All,
}

impl SyncMode {
    pub fn covers(self, kind: SchemaKind) -> bool {
        match self {
            SyncMode::None => false,
            SyncMode::All => true,
            SyncMode::DataTypes => kind == SchemaKind::DataTypes,
            SyncMode::DocumentTypes => kind == SchemaKind::DocumentTypes,
            SyncMode::MediaTypes => kind == SchemaKind::MediaTypes,
            SyncMode::MemberTypes => kind == SchemaKind::MemberTypes,
        }
    }
}

/// Root of `config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JetConfig {
    /// `false` until the CMS itself is installed; nothing is synchronized then.
    #[serde(default = "default_installed")]
    pub installed: bool,
    #[serde(default = "default_synchronize")]
    pub synchronize: Vec<SyncMode>,
}

fn default_installed() -> bool {
    true
}

fn default_synchronize() -> Vec<SyncMode> {
    vec![SyncMode::All]
}

impl Default for JetConfig {
    fn default() -> Self {
        Self {
            installed: default_installed(),
            synchronize: default_synchronize(),
        }
    }
}

impl JetConfig {
    pub fn is_enabled(&self, kind: SchemaKind) -> bool {
        self.synchronize.iter().any(|mode| mode.covers(kind))
    }
}

/// `<home>/.jet/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    jet_dir_at(home).join("config.yaml")
}

/// Load the configuration, falling back to [`JetConfig::default`] when the
/// file does not exist.
///
/// Returns `CoreError::ConfigParse` (with path) if the YAML is malformed.
pub fn load_at(home: &Path) -> Result<JetConfig, CoreError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(JetConfig::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    if contents.trim().is_empty() {
        return Ok(JetConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| CoreError::ConfigParse { path, source })
}

/// Atomically save the configuration.
pub fn save_at(home: &Path, config: &JetConfig) -> Result<(), CoreError> {
    let yaml = serde_yaml::to_string(config)?;
    write_atomic(&config_path_at(home), yaml.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_enables_every_kind() {
        let config = JetConfig::default();
        assert!(config.installed);
        for kind in SchemaKind::all() {
            assert!(config.is_enabled(*kind), "{kind} should be enabled");
        }
    }

    #[test]
    fn missing_file_yields_default() {
        let home = TempDir::new().unwrap();
        assert_eq!(load_at(home.path()).unwrap(), JetConfig::default());
    }

    #[test]
    fn none_mode_disables_everything() {
        let config = JetConfig {
            installed: true,
            synchronize: vec![SyncMode::None],
        };
        assert!(SchemaKind::all().iter().all(|k| !config.is_enabled(*k)));
    }

    #[test]
    fn single_mode_enables_only_its_kind() {
        let config = JetConfig {
            installed: true,
            synchronize: vec![SyncMode::DataTypes],
        };
        assert!(config.is_enabled(SchemaKind::DataTypes));
        assert!(!config.is_enabled(SchemaKind::MediaTypes));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let home = TempDir::new().unwrap();
        let config = JetConfig {
            installed: false,
            synchronize: vec![SyncMode::DataTypes, SyncMode::MemberTypes],
        };
        save_at(home.path(), &config).unwrap();
        assert_eq!(load_at(home.path()).unwrap(), config);
    }
}
