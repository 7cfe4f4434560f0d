//! File entry snapshots.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::path::split_extension;

/// A point-in-time snapshot of one filesystem entry.
///
/// Entries are never live handles: every mutating operation re-resolves
/// `path` against the filesystem, so a stale snapshot shows up as a
/// per-entry failure rather than undefined behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File/directory name (not full path).
    pub name: CompactString,

    /// Absolute path at scan time.
    pub path: PathBuf,

    /// Size in bytes. Only meaningful for non-directories.
    pub size: u64,

    /// Whether the entry was a directory when scanned.
    pub is_dir: bool,

    /// Number of visible children (directories only).
    pub child_count: u64,

    /// Last modification time.
    pub modified: SystemTime,

    pub readable: bool,
    pub writable: bool,
    pub hidden: bool,

    /// Presentation-layer selection flag; the engine ignores it.
    #[serde(default)]
    pub selected: bool,

    /// Row id when the entry comes from a persisted bookmark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_id: Option<i64>,
}

impl FileEntry {
    /// Create a regular file entry.
    pub fn new_file(path: impl Into<PathBuf>, size: u64, modified: SystemTime) -> Self {
        let path = path.into();
        Self {
            name: name_of(&path),
            path,
            size,
            is_dir: false,
            child_count: 0,
            modified,
            readable: true,
            writable: true,
            hidden: false,
            selected: false,
            persistent_id: None,
        }
    }

    /// Create a directory entry.
    pub fn new_directory(path: impl Into<PathBuf>, child_count: u64, modified: SystemTime) -> Self {
        let path = path.into();
        Self {
            name: name_of(&path),
            path,
            size: 0,
            is_dir: true,
            child_count,
            modified,
            readable: true,
            writable: true,
            hidden: false,
            selected: false,
            persistent_id: None,
        }
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// The name without its extension, following [`split_extension`].
    pub fn stem(&self) -> &str {
        split_extension(&self.name).0
    }

    /// The extension after the last `.`, or `""`.
    pub fn extension(&self) -> &str {
        split_extension(&self.name).1
    }

    /// The directory containing this entry.
    pub fn parent(&self) -> Option<&Path> {
        self.path.parent()
    }
}

/// The final component. A filesystem root is named by its full path; any
/// other path without a final name (such as one ending in `..`) gets `""`.
fn name_of(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None if path.parent().is_none() => CompactString::new(path.to_string_lossy()),
        None => CompactString::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_entry_creation() {
        let entry = FileEntry::new_file("/data/notes.txt", 1024, SystemTime::UNIX_EPOCH);
        assert_eq!(entry.name, "notes.txt");
        assert!(!entry.is_dir());
        assert_eq!(entry.size, 1024);
        assert_eq!(entry.stem(), "notes");
        assert_eq!(entry.extension(), "txt");
        assert_eq!(entry.parent(), Some(Path::new("/data")));
    }

    #[test]
    fn test_directory_entry_creation() {
        let entry = FileEntry::new_directory("/data/photos", 3, SystemTime::UNIX_EPOCH);
        assert!(entry.is_dir());
        assert_eq!(entry.child_count, 3);
        assert_eq!(entry.size, 0);
        assert_eq!(entry.name, "photos");
    }

    #[test]
    fn test_root_entry_uses_full_path_as_name() {
        let entry = FileEntry::new_directory("/", 0, SystemTime::UNIX_EPOCH);
        assert_eq!(entry.name, "/");
    }

    #[test]
    fn test_unresolved_parent_dir_has_no_name() {
        let entry = FileEntry::new_directory("/data/src/..", 0, SystemTime::UNIX_EPOCH);
        assert_eq!(entry.name, "");
    }
}
