pub mod ids;
pub mod sync;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;

/// `--home` when given, otherwise the user's home directory.
pub(crate) fn home(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir),
        None => Ok(jet_core::fs::home()?),
    }
}

/// `~/.jet/cms.json` — where the CMS snapshot lives unless `--cms` says otherwise.
pub(crate) fn default_cms_path(home: &Path) -> PathBuf {
    home.join(".jet").join("cms.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_home_wins() {
        let dir = PathBuf::from("/tmp/jet-home");
        assert_eq!(home(Some(dir.clone())).unwrap(), dir);
        assert_eq!(
            default_cms_path(&dir),
            PathBuf::from("/tmp/jet-home/.jet/cms.json")
        );
    }

    #[test]
    fn default_home_comes_from_the_environment() {
        match jet_core::fs::home() {
            Ok(expected) => assert_eq!(home(None).unwrap(), expected),
            Err(err) => assert!(home(None).unwrap_err().to_string().contains(&err.to_string())),
        }
    }
}
