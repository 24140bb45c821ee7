//! Owner-only file and directory helpers
//!
//! Every file this crate provisions holds credentials or points at them,
//! so directories are created `0700` and files `0400` on Unix.

use std::fs::{self, DirBuilder, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::error::HostError;

/// Mode for provisioned directories
pub const PRIVATE_DIR_MODE: u32 = 0o700;

/// Mode for provisioned key, cert and config files
pub const READ_ONLY_FILE_MODE: u32 = 0o400;

/// Create `path` (and missing parents) restricted to the owner
///
/// Directories that already exist keep their mode.
pub fn create_private_dir(path: &Path) -> Result<(), HostError> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(PRIVATE_DIR_MODE);
    }

    builder.create(path).map_err(|e| {
        HostError::Io(format!(
            "Failed to create directory {}: {}",
            path.display(),
            e
        ))
    })
}

/// Write `contents` to a new file readable only by the owner
///
/// A file left over from an earlier attempt is replaced.
pub fn write_read_only_file(path: &Path, contents: &[u8]) -> Result<(), HostError> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| {
            HostError::Io(format!("Failed to replace {}: {}", path.display(), e))
        })?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(READ_ONLY_FILE_MODE);
    }

    let mut file = options
        .open(path)
        .map_err(|e| HostError::Io(format!("Failed to create {}: {}", path.display(), e)))?;

    file.write_all(contents)
        .map_err(|e| HostError::Io(format!("Failed to write {}: {}", path.display(), e)))?;

    Ok(())
}

#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> Result<(), HostError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| {
        HostError::Io(format!(
            "Failed to set permissions on {}: {}",
            path.display(),
            e
        ))
    })
}

#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) -> Result<(), HostError> {
    Ok(())
}
