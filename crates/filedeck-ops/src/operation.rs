//! Per-entry failure records.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use filedeck_core::FsError;

/// A failure recorded for one entry of a batch. The batch itself keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    /// The path that caused the error.
    pub path: PathBuf,
    /// A human-readable error message.
    pub message: String,
}

impl OperationError {
    /// Create a new operation error.
    pub fn new(path: PathBuf, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Record `error` against `fallback` when the error carries no path of its own.
    pub fn from_fs(fallback: &Path, error: &FsError) -> Self {
        let path = error.path().unwrap_or(fallback).to_path_buf();
        Self::new(path, error.to_string())
    }
}

/// Log a swallowed per-entry failure and keep it for the completion report.
pub(crate) fn record(errors: &mut Vec<OperationError>, fallback: &Path, error: FsError) {
    warn!(path = %fallback.display(), error = %error, "entry failed");
    errors.push(OperationError::from_fs(fallback, &error));
}

impl std::fmt::Display for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}
