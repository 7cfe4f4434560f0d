//! Bookmark storage interface.
//!
//! The operation engine never touches bookmarks; this is the contract a
//! presentation layer programs against, with an in-memory implementation.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::entry::FileEntry;
use crate::path::eq_ignore_case;

/// A persisted bookmark row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub name: CompactString,
    pub path: PathBuf,
}

/// Change notification sent to the store's listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkEvent {
    Added(Bookmark),
    Removed { id: i64 },
}

/// Keyed bookmark storage.
pub trait BookmarkStore {
    /// Whether some bookmark points at `path`.
    fn is_bookmarked(&self, path: &Path) -> bool;

    /// Add a bookmark and return its id.
    fn add(&mut self, name: &str, path: &Path) -> i64;

    /// Remove by id. Returns `true` if a row was removed.
    fn remove_by_id(&mut self, id: i64) -> bool;

    /// Remove every bookmark pointing at `path`. Returns `true` if any row was removed.
    fn remove_by_path(&mut self, path: &Path) -> bool;
}

type Listener = Box<dyn Fn(&BookmarkEvent) + Send + Sync>;

/// Bookmark store kept in memory.
#[derive(Default)]
pub struct MemoryBookmarks {
    rows: Vec<Bookmark>,
    next_id: i64,
    listener: Option<Listener>,
}

impl MemoryBookmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the listener notified after every change.
    pub fn with_listener(
        mut self,
        listener: impl Fn(&BookmarkEvent) + Send + Sync + 'static,
    ) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// All bookmarks, in insertion order.
    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.rows
    }

    /// Bookmarks as entries carrying their row id in `persistent_id`.
    ///
    /// Metadata fields are placeholders; callers rescan the path for live values.
    pub fn entries(&self) -> Vec<FileEntry> {
        self.rows
            .iter()
            .map(|row| {
                let mut entry = FileEntry::new_directory(&row.path, 0, std::time::UNIX_EPOCH);
                entry.name = row.name.clone();
                entry.persistent_id = Some(row.id);
                entry
            })
            .collect()
    }

    fn notify(&self, event: BookmarkEvent) {
        if let Some(listener) = &self.listener {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for MemoryBookmarks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBookmarks")
            .field("rows", &self.rows)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl BookmarkStore for MemoryBookmarks {
    fn is_bookmarked(&self, path: &Path) -> bool {
        self.rows.iter().any(|row| eq_ignore_case(&row.path, path))
    }

    fn add(&mut self, name: &str, path: &Path) -> i64 {
        self.next_id += 1;
        let row = Bookmark {
            id: self.next_id,
            name: name.into(),
            path: path.to_path_buf(),
        };
        self.rows.push(row.clone());
        self.notify(BookmarkEvent::Added(row));
        self.next_id
    }

    fn remove_by_id(&mut self, id: i64) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        let removed = self.rows.len() != before;
        if removed {
            self.notify(BookmarkEvent::Removed { id });
        }
        removed
    }

    fn remove_by_path(&mut self, path: &Path) -> bool {
        let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.rows)
            .into_iter()
            .partition(|row| eq_ignore_case(&row.path, path));
        self.rows = kept;
        for row in &gone {
            self.notify(BookmarkEvent::Removed { id: row.id });
        }
        !gone.is_empty()
    }
}
