//! Core types and utilities for filedeck.
//!
//! This crate provides the data model shared by the scanner and the
//! operation engine: file entry snapshots, path helpers, the listing
//! comparator, listing configuration and the filesystem error taxonomy.

mod bookmark;
mod config;
mod entry;
mod error;
pub mod path;
mod sort;

pub use bookmark::{Bookmark, BookmarkEvent, BookmarkStore, MemoryBookmarks};
pub use config::{
    ListingConfig, ListingConfigBuilder, NameFilter, VisibilityPolicy, DEFAULT_COPY_BUFFER_SIZE,
    SYSTEM_DENY_LIST,
};
pub use entry::FileEntry;
pub use error::{FsError, FsResult};
pub use sort::{comparator, sort_entries, SortKey};
