//! Persistent user settings.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, Result};
use serde::{Deserialize, Serialize};

use filedeck_core::{ListingConfig, SortKey, DEFAULT_COPY_BUFFER_SIZE};

/// Settings read from `settings.toml` in the user config directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Show hidden files by default.
    pub show_hidden: bool,
    /// Default sort key.
    pub sort_key: SortKey,
    /// List directories before files.
    pub directories_first: bool,
    /// Glob patterns never listed or copied.
    pub ignore_patterns: Vec<String>,
    /// Root the system deny-list is resolved against.
    pub storage_root: PathBuf,
    /// Streaming copy chunk size in bytes.
    pub copy_buffer_size: usize,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            show_hidden: false,
            sort_key: SortKey::Name,
            directories_first: true,
            ignore_patterns: Vec::new(),
            storage_root: PathBuf::from("/"),
            copy_buffer_size: DEFAULT_COPY_BUFFER_SIZE,
        }
    }
}

impl UserSettings {
    /// Get the config file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("filedeck").join("settings.toml"))
    }

    /// Load settings from disk, or return defaults.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from `path`. A missing or malformed file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Save settings to the default location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path().ok_or_else(|| eyre!("No config directory"))?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to `path`, creating its parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Build the listing config these settings describe.
    pub fn to_listing_config(&self) -> Result<ListingConfig> {
        ListingConfig::builder()
            .show_hidden(self.show_hidden)
            .sort_key(self.sort_key)
            .directories_first(self.directories_first)
            .ignore_patterns(self.ignore_patterns.clone())
            .storage_root(self.storage_root.clone())
            .copy_buffer_size(self.copy_buffer_size)
            .build()
            .map_err(|e| eyre!("Invalid settings: {e}"))
    }
}
