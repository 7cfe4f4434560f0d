//! The staged selection buffer.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use filedeck_core::path::{eq_ignore_case, is_ancestor_or_equal};
use filedeck_core::FileEntry;

#[derive(Debug, Default)]
struct Staging {
    entries: Vec<FileEntry>,
    moving: bool,
    /// Bumped on every change to `entries`.
    generation: u64,
}

impl Staging {
    fn replace(&mut self, entries: Vec<FileEntry>) -> u64 {
        self.entries = entries;
        self.generation += 1;
        self.generation
    }
}

/// Entries set aside by a copy, move or delete, shared between the caller
/// and the background worker.
///
/// Every method takes the lock once and releases it before returning, so
/// each call is atomic with respect to the others.
#[derive(Debug, Default)]
pub struct StagedSelection {
    inner: Mutex<Staging>,
}

impl StagedSelection {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Staging> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the staged list. Returns the new generation.
    pub fn replace(&self, entries: &[FileEntry]) -> u64 {
        self.lock().replace(entries.to_vec())
    }

    /// Enter move mode with `entries`, unless a move is already staged.
    pub fn begin_move(&self, entries: &[FileEntry]) -> bool {
        let mut staging = self.lock();
        if staging.moving {
            return false;
        }
        staging.moving = true;
        staging.replace(entries.to_vec());
        true
    }

    /// Leave move mode. Returns whether a move was staged.
    pub fn end_move(&self) -> bool {
        std::mem::replace(&mut self.lock().moving, false)
    }

    /// Leave move mode and drop the staged list.
    pub fn cancel_move(&self) {
        let mut staging = self.lock();
        staging.moving = false;
        staging.replace(Vec::new());
    }

    pub fn is_moving(&self) -> bool {
        self.lock().moving
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// A copy of the staged list and its generation.
    pub fn snapshot(&self) -> (Vec<FileEntry>, u64) {
        let staging = self.lock();
        (staging.entries.clone(), staging.generation)
    }

    /// Drop the staged list. The move flag is left as it is.
    pub fn clear(&self) {
        self.lock().replace(Vec::new());
    }

    /// Drop the staged list only if nothing restaged it since `generation`.
    pub fn clear_if_unchanged(&self, generation: u64) -> bool {
        let mut staging = self.lock();
        if staging.generation != generation {
            return false;
        }
        staging.replace(Vec::new());
        true
    }

    /// Whether some staged entry has `path`, ignoring case.
    pub fn contains_path(&self, path: &Path) -> bool {
        self.lock()
            .entries
            .iter()
            .any(|entry| eq_ignore_case(&entry.path, path))
    }

    /// Whether `dest` is a staged directory or lies beneath one.
    pub fn any_dir_contains(&self, dest: &Path) -> bool {
        self.lock()
            .entries
            .iter()
            .any(|entry| entry.is_dir && is_ancestor_or_equal(&entry.path, dest))
    }
}
