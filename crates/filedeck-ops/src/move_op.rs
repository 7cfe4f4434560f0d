//! Rename-based move.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use filedeck_core::path::contains_on_disk;
use filedeck_core::{FsError, FsResult};

/// Move `source` into `dest_dir` with a single rename.
///
/// Only same-volume moves succeed; there is no copy-and-delete fallback.
/// An existing entry of the same name in `dest_dir` is never replaced.
pub fn move_entry(source: &Path, dest_dir: &Path) -> FsResult<PathBuf> {
    let name = source
        .file_name()
        .ok_or_else(|| FsError::invalid(format!("{} has no file name", source.display())))?;
    let target = dest_dir.join(name);

    let failed = |kind: io::ErrorKind, message: &str| FsError::MoveFailed {
        path: source.to_path_buf(),
        source: io::Error::new(kind, message.to_string()),
    };

    if target == source {
        return Ok(target);
    }
    if contains_on_disk(source, dest_dir) {
        return Err(failed(
            io::ErrorKind::InvalidInput,
            "cannot move a directory into itself",
        ));
    }
    if fs::symlink_metadata(&target).is_ok() {
        return Err(failed(
            io::ErrorKind::AlreadyExists,
            "destination already exists",
        ));
    }

    fs::rename(source, &target).map_err(|e| FsError::MoveFailed {
        path: source.to_path_buf(),
        source: e,
    })?;

    debug!(from = %source.display(), to = %target.display(), "moved");
    Ok(target)
}
