//! Directory listing for filedeck.
//!
//! `filedeck-scan` turns live filesystem paths into [`FileEntry`] snapshots.
//! Every scan honors a [`NameFilter`] and a [`VisibilityPolicy`]:
//!
//! - **Single entries** via [`EntityScanner::scan_one`]
//! - **Immediate children** via [`EntityScanner::scan_children`]
//! - **Sorted listings** via [`EntityScanner::list_directory`]
//! - **Recursive totals** via [`EntityScanner::measure_tree`], walked with jwalk
//!
//! # Example
//!
//! ```rust,no_run
//! use filedeck_scan::{EntityScanner, ListingConfig};
//!
//! let config = ListingConfig::default();
//! let scanner = EntityScanner::from_config(&config).unwrap();
//! let listing = scanner
//!     .list_directory("/tmp".as_ref(), config.sort_key, config.directories_first)
//!     .unwrap();
//! for entry in listing {
//!     println!("{} ({} bytes)", entry.name, entry.size);
//! }
//! ```

mod measure;
mod scanner;

pub use measure::TreeTotals;
pub use scanner::EntityScanner;

// Re-export core types for convenience
pub use filedeck_core::{
    FileEntry, FsError, FsResult, ListingConfig, NameFilter, SortKey, VisibilityPolicy,
};
