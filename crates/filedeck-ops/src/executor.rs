//! The single background worker that runs bulk jobs in submission order.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use filedeck_core::FileEntry;
use filedeck_scan::EntityScanner;

use crate::copy::copy_entry;
use crate::delete::delete_entry;
use crate::move_op::move_entry;
use crate::operation::{record, OperationError};
use crate::progress::{EngineEvent, OperationComplete, OperationProgress, OperationType};
use crate::staging::StagedSelection;

/// A queued bulk operation.
#[derive(Debug)]
pub(crate) enum Job {
    /// Copy whatever is staged when the job starts into `dest`.
    Paste { dest: PathBuf },
    /// Rename whatever is staged when the job starts into `dest`.
    Move { dest: PathBuf },
    /// Delete `entries`, which were staged as `generation` at submit time.
    Delete {
        entries: Vec<FileEntry>,
        generation: u64,
    },
}

impl Job {
    fn operation_type(&self) -> OperationType {
        match self {
            Self::Paste { .. } => OperationType::Copy,
            Self::Move { .. } => OperationType::Move,
            Self::Delete { .. } => OperationType::Delete,
        }
    }
}

/// Everything a job needs on the blocking pool.
#[derive(Debug, Clone)]
pub(crate) struct Batch {
    /// Walks copies with the listing filter and hidden-file policy.
    pub scanner: EntityScanner,
    /// Walks deletes; hidden entries included so directories can empty out.
    pub delete_scanner: EntityScanner,
    pub buffer_size: usize,
    pub events: mpsc::UnboundedSender<EngineEvent>,
}

impl Batch {
    fn execute(&self, job: &Job, entries: &[FileEntry]) -> OperationComplete {
        let kind = job.operation_type();
        let bytes_total = match job {
            Job::Paste { .. } => entries
                .iter()
                .map(|entry| self.scanner.measure_tree(&entry.path).bytes)
                .sum(),
            _ => 0,
        };

        info!(operation = %kind, entries = entries.len(), "batch started");
        let mut progress = OperationProgress::new(kind, entries.len(), bytes_total);
        let mut complete = OperationComplete::empty(kind);

        for entry in entries {
            debug!(operation = %kind, path = %entry.path.display(), "processing");
            let failures_before = complete.errors.len();

            let bytes = match job {
                Job::Paste { dest } => copy_entry(
                    &self.scanner,
                    &entry.path,
                    dest,
                    self.buffer_size,
                    &mut complete.errors,
                ),
                Job::Move { dest } => {
                    if let Err(e) = move_entry(&entry.path, dest) {
                        record(&mut complete.errors, &entry.path, e);
                    }
                    0
                }
                Job::Delete { .. } => {
                    delete_entry(&self.delete_scanner, &entry.path, &mut complete.errors)
                }
            };

            if complete.errors.len() == failures_before {
                complete.succeeded += 1;
            } else {
                complete.failed += 1;
            }
            complete.bytes_processed += bytes;

            progress.set_current_file(Some(entry.path.clone()));
            progress.complete_file(bytes);
            progress.error_count = complete.errors.len();
            let _ = self.events.send(EngineEvent::Progress(progress.clone()));
        }

        info!(operation = %kind, summary = %complete.summary(), "batch finished");
        complete
    }
}

/// Owns the job queue's receiving end.
pub(crate) struct Worker {
    staging: Arc<StagedSelection>,
    batch: Batch,
}

impl Worker {
    pub fn new(staging: Arc<StagedSelection>, batch: Batch) -> Self {
        Self { staging, batch }
    }

    /// Start the worker on the current Tokio runtime and return its queue.
    ///
    /// The worker drains every queued job, then exits once all senders are gone.
    pub fn spawn(self) -> mpsc::UnboundedSender<Job> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                self.run(job).await;
            }
            debug!("operation worker stopped");
        });
        tx
    }

    async fn run(&self, job: Job) {
        let kind = job.operation_type();
        let (entries, generation) = match &job {
            Job::Paste { .. } | Job::Move { .. } => self.staging.snapshot(),
            Job::Delete {
                entries,
                generation,
            } => (entries.clone(), *generation),
        };
        let changed_root = match &job {
            Job::Paste { dest } | Job::Move { dest } => Some(dest.clone()),
            Job::Delete { entries, .. } => entries
                .first()
                .and_then(|entry| entry.parent())
                .map(|parent| parent.to_path_buf()),
        };
        let total = entries.len();

        let batch = self.batch.clone();
        let result = tokio::task::spawn_blocking(move || batch.execute(&job, &entries)).await;

        let complete = result.unwrap_or_else(|e| {
            error!(operation = %kind, error = %e, "batch task failed");
            let mut complete = OperationComplete::empty(kind);
            complete.failed = total;
            complete.errors.push(OperationError::new(
                changed_root.clone().unwrap_or_default(),
                format!("Task failed: {e}"),
            ));
            complete
        });

        if let Some(root) = changed_root {
            let _ = self.batch.events.send(EngineEvent::PathChanged(root));
        }
        self.staging.clear_if_unchanged(generation);
        let _ = self.batch.events.send(EngineEvent::Finished(complete));
    }
}
