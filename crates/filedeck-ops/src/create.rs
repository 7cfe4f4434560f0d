//! Folder creation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use filedeck_core::{FsError, FsResult};

use crate::rename::validate_filename;

/// Create the folder `name` inside `parent`.
///
/// Fails if anything already exists at that path or if `parent` is missing.
pub fn create_folder(parent: &Path, name: &str) -> FsResult<PathBuf> {
    validate_filename(name)?;
    let path = parent.join(name);
    fs::create_dir(&path).map_err(|e| FsError::io(&path, e))?;
    debug!(path = %path.display(), "created folder");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_folder() {
        let temp = TempDir::new().unwrap();
        let path = create_folder(temp.path(), "photos").unwrap();
        assert!(path.is_dir());
    }

    #[test]
    fn test_create_folder_existing_fails() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("taken"), "x").unwrap();
        assert!(create_folder(temp.path(), "taken").is_err());
        assert!(temp.path().join("taken").is_file());
    }

    #[test]
    fn test_create_folder_invalid_name() {
        let temp = TempDir::new().unwrap();
        let err = create_folder(temp.path(), "a/b").unwrap_err();
        assert!(matches!(err, FsError::InvalidArgument { .. }));
        assert!(create_folder(&temp.path().join("missing"), "x").is_err());
    }
}
