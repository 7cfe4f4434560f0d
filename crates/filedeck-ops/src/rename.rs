//! In-place rename and filename validation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filedeck_core::path::eq_ignore_case;
use filedeck_core::{FsError, FsResult};

/// Rename `source` to `new_name` within its own directory.
///
/// Fails without touching the filesystem if the name is invalid, the source
/// is gone, or another entry already holds the name. A case-only change of
/// the same entry is allowed.
pub fn rename_path(source: &Path, new_name: &str) -> FsResult<PathBuf> {
    validate_filename(new_name)?;

    let parent = source
        .parent()
        .ok_or_else(|| FsError::invalid(format!("{} has no parent", source.display())))?;
    let new_path = parent.join(new_name);

    fs::symlink_metadata(source).map_err(|e| FsError::io(source, e))?;

    if fs::symlink_metadata(&new_path).is_ok() && !eq_ignore_case(source, &new_path) {
        return Err(FsError::Io {
            path: new_path,
            source: io::Error::new(io::ErrorKind::AlreadyExists, "name already taken"),
        });
    }

    fs::rename(source, &new_path).map_err(|e| FsError::io(source, e))?;
    Ok(new_path)
}

/// Validate a single path component for use as a file or folder name.
pub fn validate_filename(name: &str) -> FsResult<()> {
    if name.is_empty() {
        return Err(FsError::invalid("Name cannot be empty"));
    }

    if name.len() > 255 {
        return Err(FsError::invalid("Name is too long (max 255 bytes)"));
    }

    // Check for invalid characters
    if let Some(c) = name.chars().find(|&c| c == '\0' || std::path::is_separator(c)) {
        return Err(FsError::invalid(format!("Name cannot contain {c:?}")));
    }

    #[cfg(target_os = "windows")]
    {
        let windows_invalid = [':', '*', '?', '"', '<', '>', '|'];
        if let Some(c) = name.chars().find(|c| windows_invalid.contains(c)) {
            return Err(FsError::invalid(format!("Name cannot contain '{c}'")));
        }

        let reserved = [
            "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
            "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
        ];
        let upper_name = name.to_uppercase();
        let base_name = upper_name.split('.').next().unwrap_or("");
        if reserved.contains(&base_name) {
            return Err(FsError::invalid("Reserved filename"));
        }
    }

    if name == "." || name == ".." {
        return Err(FsError::invalid("'.' and '..' are reserved names"));
    }

    Ok(())
}
