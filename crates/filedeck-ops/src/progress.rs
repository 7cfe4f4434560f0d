//! Progress and completion reporting for bulk operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::OperationError;

/// The kind of bulk operation a job performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Copy,
    Move,
    Delete,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copy => write!(f, "Copy"),
            Self::Move => write!(f, "Move"),
            Self::Delete => write!(f, "Delete"),
        }
    }
}

/// Progress of a running job, reported after each top-level entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationProgress {
    /// The type of operation.
    pub operation_type: OperationType,
    /// Number of top-level entries finished, successfully or not.
    pub files_completed: usize,
    /// Number of top-level entries in the job.
    pub files_total: usize,
    /// Number of bytes processed so far.
    pub bytes_processed: u64,
    /// Total bytes to process (0 if unknown).
    pub bytes_total: u64,
    /// The entry most recently processed.
    pub current_file: Option<PathBuf>,
    /// Number of per-entry failures so far.
    pub error_count: usize,
}

impl OperationProgress {
    /// Create a new progress tracker for an operation.
    pub fn new(operation_type: OperationType, files_total: usize, bytes_total: u64) -> Self {
        Self {
            operation_type,
            files_completed: 0,
            files_total,
            bytes_processed: 0,
            bytes_total,
            current_file: None,
            error_count: 0,
        }
    }

    /// Get the progress as a percentage (0.0 to 100.0).
    pub fn percentage(&self) -> f64 {
        if self.bytes_total > 0 {
            (self.bytes_processed as f64 / self.bytes_total as f64) * 100.0
        } else if self.files_total > 0 {
            (self.files_completed as f64 / self.files_total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Update the current file being processed.
    pub fn set_current_file(&mut self, path: Option<PathBuf>) {
        self.current_file = path;
    }

    /// Increment the completed count and add bytes.
    pub fn complete_file(&mut self, bytes: u64) {
        self.files_completed += 1;
        self.bytes_processed += bytes;
    }
}

/// Result of a finished job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationComplete {
    /// The type of operation.
    pub operation_type: OperationType,
    /// Number of top-level entries fully processed.
    pub succeeded: usize,
    /// Number of top-level entries with at least one failure.
    pub failed: usize,
    /// Total bytes processed.
    pub bytes_processed: u64,
    /// Every per-entry failure, in the order it happened.
    pub errors: Vec<OperationError>,
}

impl OperationComplete {
    /// An empty report for `operation_type`.
    pub fn empty(operation_type: OperationType) -> Self {
        Self {
            operation_type,
            succeeded: 0,
            failed: 0,
            bytes_processed: 0,
            errors: Vec::new(),
        }
    }

    /// Check if the operation was fully successful.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Get a human-readable summary of the operation.
    pub fn summary(&self) -> String {
        let action = match self.operation_type {
            OperationType::Copy => "Copied",
            OperationType::Move => "Moved",
            OperationType::Delete => "Deleted",
        };

        if self.failed == 0 {
            format!("{} {} items", action, self.succeeded)
        } else {
            format!(
                "{} {} items, {} failed",
                action, self.succeeded, self.failed
            )
        }
    }
}

/// Notifications sent from the engine to its owner.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Cached listings rooted at or above this path are stale.
    PathChanged(PathBuf),
    /// A job finished another top-level entry.
    Progress(OperationProgress),
    /// A job is done. Sent exactly once per accepted job.
    Finished(OperationComplete),
}
