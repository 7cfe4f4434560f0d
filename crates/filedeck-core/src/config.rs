//! Listing configuration: name filter, hidden-file policy and ordering.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{FsError, FsResult};
use crate::sort::SortKey;

/// System cache subpaths, relative to the storage root, that are never
/// listed whatever the hidden-file policy says.
pub const SYSTEM_DENY_LIST: &[&str] = &[".android_secure", "miren_browser/imagecaches"];

/// Streaming buffer used by the copy primitive.
pub const DEFAULT_COPY_BUFFER_SIZE: usize = 100 * 1024;

/// Configuration for listings and bulk operations.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ListingConfig {
    /// Show dot-prefixed and OS-hidden entries.
    #[builder(default = "false")]
    #[serde(default)]
    pub show_hidden: bool,

    /// Glob patterns for names to exclude.
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Root the deny-list entries are resolved against.
    #[builder(default = "PathBuf::from(\"/\")")]
    #[serde(default = "default_storage_root")]
    pub storage_root: PathBuf,

    /// Subpaths of `storage_root` that are never shown.
    #[builder(default = "default_deny_list()")]
    #[serde(default = "default_deny_list")]
    pub deny_list: Vec<String>,

    /// Active sort key.
    #[builder(default)]
    #[serde(default)]
    pub sort_key: SortKey,

    /// List directories before files.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub directories_first: bool,

    /// Chunk size for streaming copies.
    #[builder(default = "DEFAULT_COPY_BUFFER_SIZE")]
    #[serde(default = "default_copy_buffer_size")]
    pub copy_buffer_size: usize,
}

fn default_true() -> bool {
    true
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("/")
}

fn default_deny_list() -> Vec<String> {
    SYSTEM_DENY_LIST.iter().map(|s| s.to_string()).collect()
}

fn default_copy_buffer_size() -> usize {
    DEFAULT_COPY_BUFFER_SIZE
}

impl ListingConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.copy_buffer_size == Some(0) {
            return Err("Copy buffer size must be greater than zero".to_string());
        }
        if let Some(ref patterns) = self.ignore_patterns {
            for pattern in patterns {
                Glob::new(pattern).map_err(|e| format!("Invalid ignore pattern '{pattern}': {e}"))?;
            }
        }
        Ok(())
    }
}

impl ListingConfig {
    /// Create a new listing config builder.
    pub fn builder() -> ListingConfigBuilder {
        ListingConfigBuilder::default()
    }

    /// The hidden-file policy described by this config.
    pub fn visibility(&self) -> VisibilityPolicy {
        VisibilityPolicy {
            show_hidden: self.show_hidden,
            storage_root: self.storage_root.clone(),
            deny_list: self.deny_list.clone(),
        }
    }

    /// Compile the ignore patterns into a name filter.
    pub fn filter(&self) -> FsResult<NameFilter> {
        NameFilter::new(&self.ignore_patterns)
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            show_hidden: false,
            ignore_patterns: Vec::new(),
            storage_root: default_storage_root(),
            deny_list: default_deny_list(),
            sort_key: SortKey::default(),
            directories_first: true,
            copy_buffer_size: DEFAULT_COPY_BUFFER_SIZE,
        }
    }
}

/// Decides whether an entry is shown in listings and walked by bulk operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityPolicy {
    pub show_hidden: bool,
    pub storage_root: PathBuf,
    pub deny_list: Vec<String>,
}

impl VisibilityPolicy {
    /// The same policy with hidden entries included. The deny-list still applies.
    pub fn including_hidden(&self) -> Self {
        Self {
            show_hidden: true,
            ..self.clone()
        }
    }

    /// Whether `path` lies on the deny-list.
    pub fn is_denied(&self, path: &Path) -> bool {
        self.deny_list
            .iter()
            .any(|sub| path.starts_with(self.storage_root.join(sub)))
    }

    /// Whether an entry at `path` is visible. `hidden` is the OS hidden flag.
    pub fn is_visible(&self, path: &Path, hidden: bool) -> bool {
        if self.is_denied(path) {
            return false;
        }
        if self.show_hidden {
            return true;
        }
        let dot_name = path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with('.'));
        !hidden && !dot_name
    }
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        ListingConfig::default().visibility()
    }
}

/// Excludes entries whose name matches any of a set of glob patterns.
#[derive(Debug, Clone)]
pub struct NameFilter {
    exclude: GlobSet,
}

impl NameFilter {
    /// Compile `patterns` into a filter.
    pub fn new(patterns: &[String]) -> FsResult<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .map_err(|e| FsError::invalid(format!("bad pattern '{pattern}': {e}")))?;
            builder.add(glob);
        }
        let exclude = builder
            .build()
            .map_err(|e| FsError::invalid(format!("bad pattern set: {e}")))?;
        Ok(Self { exclude })
    }

    /// A filter that accepts every name.
    pub fn accept_all() -> Self {
        Self {
            exclude: GlobSet::empty(),
        }
    }

    /// Whether `name` passes the filter.
    pub fn accepts(&self, name: &str) -> bool {
        !self.exclude.is_match(name)
    }
}

impl Default for NameFilter {
    fn default() -> Self {
        Self::accept_all()
    }
}
