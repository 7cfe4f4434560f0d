//! The file operation engine.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use filedeck_core::{FileEntry, FsResult, ListingConfig};
use filedeck_scan::EntityScanner;

use crate::create;
use crate::executor::{Batch, Job, Worker};
use crate::progress::EngineEvent;
use crate::rename::rename_path;
use crate::staging::StagedSelection;

/// Stages entries and applies copy, move and delete to them on a single
/// background worker.
///
/// Bulk calls return at once. Their outcome arrives on the event receiver
/// handed out by [`new`](Self::new): zero or more [`EngineEvent::Progress`],
/// one [`EngineEvent::PathChanged`] for the affected directory, then exactly
/// one [`EngineEvent::Finished`]. Jobs run one at a time in submission order.
///
/// Callers should not restage while a job is pending; a queued paste or move
/// works on whatever is staged when it starts.
#[derive(Debug)]
pub struct FileOperationEngine {
    staging: Arc<StagedSelection>,
    jobs: mpsc::UnboundedSender<Job>,
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl FileOperationEngine {
    /// Create an engine and start its worker.
    ///
    /// Must be called from within a Tokio runtime. Dropping the engine lets
    /// the worker finish queued jobs and then stop.
    pub fn new(config: &ListingConfig) -> FsResult<(Self, mpsc::UnboundedReceiver<EngineEvent>)> {
        let scanner = EntityScanner::from_config(config)?;
        let delete_scanner = scanner.with_policy(scanner.policy().including_hidden());
        let (events, receiver) = mpsc::unbounded_channel();
        let staging = Arc::new(StagedSelection::new());

        let batch = Batch {
            scanner,
            delete_scanner,
            buffer_size: config.copy_buffer_size,
            events: events.clone(),
        };
        let jobs = Worker::new(Arc::clone(&staging), batch).spawn();

        Ok((
            Self {
                staging,
                jobs,
                events,
            },
            receiver,
        ))
    }

    fn submit(&self, job: Job) -> bool {
        debug!(?job, "job queued");
        self.jobs.send(job).is_ok()
    }

    /// Pin a relative destination to the current directory at submit time.
    fn destination(dest: &Path) -> Option<PathBuf> {
        match std::path::absolute(dest) {
            Ok(dest) => Some(dest),
            Err(e) => {
                warn!(dest = %dest.display(), error = %e, "cannot resolve destination");
                None
            }
        }
    }

    fn notify(&self, path: PathBuf) {
        let _ = self.events.send(EngineEvent::PathChanged(path));
    }

    /// Stage `entries` for a later paste. The move flag is untouched.
    pub fn stage_for_copy(&self, entries: &[FileEntry]) {
        self.staging.replace(entries);
    }

    /// Whether anything is staged.
    pub fn can_paste(&self) -> bool {
        !self.staging.is_empty()
    }

    /// Queue a recursive copy of the staged entries into `dest`.
    ///
    /// Returns `false` without queueing anything when nothing is staged.
    /// A relative `dest` is taken against the current directory now.
    pub fn paste_to(&self, dest: &Path) -> bool {
        if self.staging.is_empty() {
            return false;
        }
        let Some(dest) = Self::destination(dest) else {
            return false;
        };
        self.submit(Job::Paste { dest })
    }

    /// Stage `entries` for a move. Rejected while another move is staged.
    pub fn begin_move(&self, entries: &[FileEntry]) -> bool {
        self.staging.begin_move(entries)
    }

    pub fn is_move_in_progress(&self) -> bool {
        self.staging.is_moving()
    }

    /// Whether `dest` is outside every staged directory.
    pub fn can_move_into(&self, dest: &Path) -> bool {
        !self.staging.any_dir_contains(dest)
    }

    /// Queue a rename of every staged entry into `dest` and leave move mode.
    ///
    /// Returns `false` when no move is staged or `dest` is empty.
    pub fn complete_move(&self, dest: &Path) -> bool {
        if dest.as_os_str().is_empty() {
            return false;
        }
        let Some(dest) = Self::destination(dest) else {
            return false;
        };
        if !self.staging.end_move() {
            return false;
        }
        self.submit(Job::Move { dest })
    }

    /// Drop the staged list. Does not leave move mode and does not affect queued jobs.
    pub fn clear_staged(&self) {
        self.staging.clear();
    }

    /// Drop the staged list and leave move mode.
    pub fn cancel_move(&self) {
        self.staging.cancel_move();
    }

    /// Stage `entries` and queue their recursive deletion.
    pub fn delete_entries(&self, entries: &[FileEntry]) -> bool {
        let generation = self.staging.replace(entries);
        self.submit(Job::Delete {
            entries: entries.to_vec(),
            generation,
        });
        true
    }

    /// Rename `entry` in place. Runs on the calling thread.
    ///
    /// On success notifies the old path (regular files only) and then the new one.
    pub fn rename_entry(&self, entry: &FileEntry, new_name: &str) -> bool {
        match self.try_rename(entry, new_name) {
            Ok(_) => true,
            Err(e) => {
                warn!(path = %entry.path.display(), new_name, error = %e, "rename failed");
                false
            }
        }
    }

    /// [`rename_entry`](Self::rename_entry) with the failure reason.
    pub fn try_rename(&self, entry: &FileEntry, new_name: &str) -> FsResult<PathBuf> {
        let was_file = fs::symlink_metadata(&entry.path).is_ok_and(|m| m.is_file());
        let new_path = rename_path(&entry.path, new_name)?;
        if was_file {
            self.notify(entry.path.clone());
        }
        self.notify(new_path.clone());
        Ok(new_path)
    }

    /// Create `name` inside `parent`. Runs on the calling thread.
    ///
    /// Returns `false` if the folder already exists or cannot be created.
    pub fn create_folder(&self, parent: &Path, name: &str) -> bool {
        match create::create_folder(parent, name) {
            Ok(path) => {
                self.notify(path);
                true
            }
            Err(e) => {
                warn!(parent = %parent.display(), name, error = %e, "create folder failed");
                false
            }
        }
    }

    /// Whether `path` is staged, ignoring case.
    pub fn is_selected(&self, path: &Path) -> bool {
        self.staging.contains_path(path)
    }

    /// A copy of the staged entries.
    pub fn staged(&self) -> Vec<FileEntry> {
        self.staging.snapshot().0
    }
}
