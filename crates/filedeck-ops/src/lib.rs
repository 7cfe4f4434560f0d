//! File operation engine for filedeck.
//!
//! This crate stages entries for copy, move or delete and applies them on a
//! single background worker, reporting progress, changed paths and a final
//! per-job summary over a channel. The collision-safe copy primitive and the
//! synchronous rename and folder creation helpers are exposed as well.

mod conflict;
mod copy;
mod create;
mod delete;
mod engine;
mod executor;
mod move_op;
mod operation;
mod progress;
mod rename;
mod staging;

pub use conflict::{create_unique_dir, create_unique_file, numbered_name};
pub use copy::copy_file;
pub use create::create_folder;
pub use engine::FileOperationEngine;
pub use move_op::move_entry;
pub use operation::OperationError;
pub use progress::{EngineEvent, OperationComplete, OperationProgress, OperationType};
pub use rename::{rename_path, validate_filename};
pub use staging::StagedSelection;
