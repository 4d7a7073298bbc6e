//! Filesystem helpers for files under `~/.ssh`.
//!
//! Every failure is mapped to [`KeymuxError::Filesystem`] carrying the path.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::{KeymuxError, Result};

/// Create a directory (and parents). On unix a newly created leaf gets `0700`.
pub fn ensure_private_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(dir).map_err(|e| KeymuxError::filesystem(dir, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))
            .map_err(|e| KeymuxError::filesystem(dir, e))?;
    }

    tracing::debug!(dir = %dir.display(), "Created directory");
    Ok(())
}

/// Append text to a file, creating it if missing.
pub fn append(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| KeymuxError::filesystem(path, e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| KeymuxError::filesystem(path, e))
}

/// Write a file readable only by its owner, replacing any previous content.
pub fn write_private(path: &Path, contents: &str) -> Result<()> {
    let mut options = OpenOptions::new();
    options.create(true).write(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .map_err(|e| KeymuxError::filesystem(path, e))?;

    // `mode` only applies on creation; tighten a pre-existing file too.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| KeymuxError::filesystem(path, e))?;
    }

    file.write_all(contents.as_bytes())
        .map_err(|e| KeymuxError::filesystem(path, e))
}
