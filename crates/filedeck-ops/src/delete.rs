//! Recursive, children-first delete.

use std::fs;
use std::path::Path;

use tracing::debug;

use filedeck_core::FsError;
use filedeck_scan::EntityScanner;

use crate::operation::{record, OperationError};

/// Delete `path`, removing a directory's listed children before the directory.
///
/// Symbolic links are removed as links. A child the scanner does not list
/// is left alone, in which case removing its parent fails and is recorded.
/// Returns the number of file bytes removed.
pub(crate) fn delete_entry(
    scanner: &EntityScanner,
    path: &Path,
    errors: &mut Vec<OperationError>,
) -> u64 {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) => {
            record(errors, path, FsError::io(path, e));
            return 0;
        }
    };

    if !metadata.is_dir() {
        return match fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "deleted file");
                metadata.len()
            }
            Err(e) => {
                record(errors, path, FsError::DeleteFailed {
                    path: path.to_path_buf(),
                    source: e,
                });
                0
            }
        };
    }

    let freed = match scanner.scan_children(path) {
        Ok(children) => children
            .iter()
            .map(|child| delete_entry(scanner, &child.path, errors))
            .sum(),
        Err(e) => {
            record(errors, path, e);
            return 0;
        }
    };

    match fs::remove_dir(path) {
        Ok(()) => debug!(path = %path.display(), "deleted directory"),
        Err(e) => record(errors, path, FsError::DeleteFailed {
            path: path.to_path_buf(),
            source: e,
        }),
    }
    freed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn everything() -> EntityScanner {
        let scanner = EntityScanner::default();
        scanner.with_policy(scanner.policy().including_hidden())
    }

    #[test]
    fn test_delete_tree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("d");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("f1"), "12").unwrap();
        fs::write(root.join("sub/f2"), "345").unwrap();
        fs::write(root.join(".dot"), "6").unwrap();

        let mut errors = Vec::new();
        let freed = delete_entry(&everything(), &root, &mut errors);
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(freed, 6);
        assert!(!root.exists());
    }

    #[test]
    fn test_unlisted_child_blocks_parent_removal() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("d");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("keep.tmp"), "x").unwrap();
        fs::write(root.join("drop.txt"), "x").unwrap();

        let filter = filedeck_core::NameFilter::new(&["*.tmp".to_string()]).unwrap();
        let scanner = EntityScanner::new(filter, everything().policy().clone());

        let mut errors = Vec::new();
        delete_entry(&scanner, &root, &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, root);
        assert!(root.join("keep.tmp").exists());
        assert!(!root.join("drop.txt").exists());
    }

    #[test]
    fn test_delete_missing_is_recorded() {
        let temp = TempDir::new().unwrap();
        let mut errors = Vec::new();
        delete_entry(&everything(), &temp.path().join("gone"), &mut errors);
        assert_eq!(errors.len(), 1);
    }
}
