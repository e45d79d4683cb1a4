//! Filesystem helpers shared by the config file, the id store and the CMS
//! snapshot.
//!
//! ```text
//! ~/.jet/
//!   config.yaml   (mode 0600)
//!   ids.json      (mode 0600)
//!   cms.json      (mode 0600)
//! ```

use std::path::{Path, PathBuf};

use crate::error::{io_err, CoreError};

/// `<home>/.jet/` — pure, no I/O.
pub(crate) fn jet_dir_at(home: &Path) -> PathBuf {
    home.join(".jet")
}

/// The user's home directory, or [`CoreError::HomeNotFound`].
pub fn home() -> Result<PathBuf, CoreError> {
    dirs::home_dir().ok_or(CoreError::HomeNotFound)
}

/// Write `contents` to `path` through a `.tmp` sibling and a rename.
///
/// The parent directory is created (mode `0700`) when missing. The `.tmp` file
/// lives next to the target so the rename never crosses filesystems.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), CoreError> {
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("path has no parent")));
    };
    // A bare file name has an empty parent: the working directory.
    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
        set_dir_permissions(dir)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, contents).map_err(|e| io_err(&tmp, e))?;
    set_file_permissions(&tmp)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), CoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), CoreError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), CoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), CoreError> {
    Ok(())
}
