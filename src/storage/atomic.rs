//! Whole-file write and copy primitives.
//!
//! Writes go to a temporary file in the destination directory which is then
//! renamed over the target, so a reader never observes a half-written document.

use crate::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Permissions for documents written by the stores (Unix: 0644).
#[cfg(unix)]
pub const DOCUMENT_FILE_MODE: u32 = 0o644;

/// Atomically replace `path` with `bytes`, creating the parent directory if needed.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| Error::Other(format!("{} has no parent directory", path.display())))?;
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(DOCUMENT_FILE_MODE))?;
    }

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Copy a whole file, overwriting the destination.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64> {
    Ok(fs::copy(src, dst)?)
}
