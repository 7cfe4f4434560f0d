//! Entry scanning for single paths and directory children.

use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use itertools::Itertools;
use tracing::debug;

use filedeck_core::path::resolve_entry;
use filedeck_core::{
    comparator, FileEntry, FsError, FsResult, ListingConfig, NameFilter, SortKey, VisibilityPolicy,
};

/// Builds [`FileEntry`] snapshots under a name filter and hidden-file policy.
#[derive(Debug, Clone, Default)]
pub struct EntityScanner {
    pub(crate) filter: NameFilter,
    pub(crate) policy: VisibilityPolicy,
}

impl EntityScanner {
    /// Create a scanner with an explicit filter and policy.
    pub fn new(filter: NameFilter, policy: VisibilityPolicy) -> Self {
        Self { filter, policy }
    }

    /// Create a scanner from a listing config.
    pub fn from_config(config: &ListingConfig) -> FsResult<Self> {
        Ok(Self::new(config.filter()?, config.visibility()))
    }

    pub fn filter(&self) -> &NameFilter {
        &self.filter
    }

    pub fn policy(&self) -> &VisibilityPolicy {
        &self.policy
    }

    /// The same scanner with a different visibility policy.
    pub fn with_policy(&self, policy: VisibilityPolicy) -> Self {
        Self {
            filter: self.filter.clone(),
            policy,
        }
    }

    /// Whether a child at `path` would be listed by [`scan_children`](Self::scan_children).
    pub fn admits(&self, path: &Path, hidden: bool) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        self.filter.accepts(&name) && self.policy.is_visible(path, hidden)
    }

    /// Stat a single path.
    ///
    /// The entry's path is absolute with `..` and parent symlinks resolved.
    /// Fails with [`FsError::NotFound`] when nothing exists at `path`.
    pub fn scan_one(&self, path: &Path) -> FsResult<FileEntry> {
        let path = resolve_entry(path).map_err(|e| FsError::io(path, e))?;
        let metadata = fs::metadata(&path).map_err(|e| FsError::io(&path, e))?;
        Ok(self.entry_from_metadata(path, &metadata))
    }

    /// List the immediate children of `path` that pass the filter and policy.
    ///
    /// An unlistable directory fails with [`FsError::AccessDenied`]; an empty
    /// one returns an empty vector.
    pub fn scan_children(&self, path: &Path) -> FsResult<Vec<FileEntry>> {
        let dir = resolve_entry(path).map_err(|e| FsError::io(path, e))?;
        let read_dir = match fs::read_dir(&dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FsError::NotFound { path: dir });
            }
            Err(e) => {
                debug!(path = %dir.display(), error = %e, "directory not listable");
                return Err(FsError::AccessDenied { path: dir });
            }
        };

        let mut entries = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = match dir_entry {
                Ok(e) => e,
                Err(e) => {
                    debug!(path = %dir.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            let name = dir_entry.file_name();
            if !self.filter.accepts(&name.to_string_lossy()) {
                continue;
            }

            let child = dir_entry.path();
            // Broken symlinks still get listed through their own metadata.
            let metadata = match fs::metadata(&child).or_else(|_| dir_entry.metadata()) {
                Ok(m) => m,
                Err(e) => {
                    debug!(path = %child.display(), error = %e, "entry vanished during scan");
                    continue;
                }
            };

            if !self.policy.is_visible(&child, is_hidden(&child, &metadata)) {
                continue;
            }

            entries.push(self.entry_from_metadata(child, &metadata));
        }

        Ok(entries)
    }

    /// Scan the children of `path` and order them for display.
    pub fn list_directory(
        &self,
        path: &Path,
        sort_key: SortKey,
        directories_first: bool,
    ) -> FsResult<Vec<FileEntry>> {
        let entries = self.scan_children(path)?;
        Ok(entries
            .into_iter()
            .sorted_by(comparator(sort_key, directories_first))
            .collect())
    }

    fn entry_from_metadata(&self, path: PathBuf, metadata: &Metadata) -> FileEntry {
        let modified = metadata.modified().unwrap_or(UNIX_EPOCH);
        let hidden = is_hidden(&path, metadata);

        let mut entry = if metadata.is_dir() {
            let count = self.count_children(&path);
            FileEntry::new_directory(path, count, modified)
        } else {
            FileEntry::new_file(path, metadata.len(), modified)
        };
        entry.readable = is_readable(metadata);
        entry.writable = !metadata.permissions().readonly();
        entry.hidden = hidden;
        entry
    }

    /// Count visible children; an unlistable directory counts as empty.
    fn count_children(&self, dir: &Path) -> u64 {
        let Ok(read_dir) = fs::read_dir(dir) else {
            return 0;
        };

        read_dir
            .flatten()
            .filter(|child| {
                let path = child.path();
                let hidden = child
                    .metadata()
                    .map(|m| is_hidden(&path, &m))
                    .unwrap_or_else(|_| dot_name(&path));
                self.admits(&path, hidden)
            })
            .count() as u64
    }
}

fn dot_name(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'))
}

// Cross-platform metadata helpers

/// Check the OS hidden flag.
#[cfg(windows)]
fn is_hidden(path: &Path, metadata: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0 || dot_name(path)
}

#[cfg(not(windows))]
fn is_hidden(path: &Path, _metadata: &Metadata) -> bool {
    dot_name(path)
}

/// Check if any read bit is set (Unix).
#[cfg(unix)]
fn is_readable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o444 != 0
}

#[cfg(not(unix))]
fn is_readable(_metadata: &Metadata) -> bool {
    true
}
