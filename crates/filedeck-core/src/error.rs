//! Error types for filesystem operations.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias used across filedeck crates.
pub type FsResult<T> = Result<T, FsError>;

/// Errors that can occur while scanning or mutating the filesystem.
#[derive(Debug, Error)]
pub enum FsError {
    /// The target of a scan does not exist.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// A directory could not be listed, or an operation was refused by permissions.
    #[error("Access denied: {path}")]
    AccessDenied { path: PathBuf },

    /// The destination directory of a copy could not be created.
    #[error("Cannot create destination {path}: {source}")]
    CannotCreateDestination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing failed in the middle of a copy.
    #[error("Copy failed for {path}: {source}")]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A rename-based move was rejected.
    #[error("Move failed for {path}: {source}")]
    MoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file or directory could not be removed.
    #[error("Delete failed for {path}: {source}")]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A caller passed a missing or malformed argument.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::AccessDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an invalid argument error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// The path this error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound { path }
            | Self::AccessDenied { path }
            | Self::CannotCreateDestination { path, .. }
            | Self::CopyFailed { path, .. }
            | Self::MoveFailed { path, .. }
            | Self::DeleteFailed { path, .. }
            | Self::Io { path, .. } => Some(path),
            Self::InvalidArgument { .. } => None,
        }
    }
}
