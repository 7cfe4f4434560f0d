//! Recursive tree totals using jwalk.

use std::fs;
use std::path::Path;

use jwalk::WalkDir;
use tracing::debug;

use crate::scanner::EntityScanner;

/// File, directory and byte totals for a subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeTotals {
    pub files: u64,
    pub dirs: u64,
    pub bytes: u64,
}

impl EntityScanner {
    /// Measure everything below `root` that this scanner would list.
    ///
    /// A regular file measures as itself. Unreadable subtrees are skipped,
    /// so the result is a lower bound rather than an error.
    pub fn measure_tree(&self, root: &Path) -> TreeTotals {
        let metadata = match fs::metadata(root) {
            Ok(m) => m,
            Err(e) => {
                debug!(path = %root.display(), error = %e, "cannot measure");
                return TreeTotals::default();
            }
        };

        if !metadata.is_dir() {
            return TreeTotals {
                files: 1,
                dirs: 0,
                bytes: metadata.len(),
            };
        }

        let filter = self.filter.clone();
        let policy = self.policy.clone();

        let walker = WalkDir::new(root)
            .skip_hidden(false)
            .follow_links(false)
            .min_depth(1)
            .process_read_dir(move |_depth, _path, _state, children| {
                children.retain(|child| match child {
                    Ok(entry) => {
                        filter.accepts(&entry.file_name().to_string_lossy())
                            && policy.is_visible(&entry.path(), false)
                    }
                    Err(_) => true,
                });
            });

        let mut totals = TreeTotals::default();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    debug!(error = %err, "skipping unreadable subtree");
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                totals.dirs += 1;
            } else if file_type.is_file() {
                totals.files += 1;
                totals.bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
            }
        }

        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filedeck_core::ListingConfig;
    use tempfile::TempDir;

    #[test]
    fn test_measure_tree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("top.txt"), "12345").unwrap();
        fs::write(root.join("a/mid.txt"), "123").unwrap();
        fs::write(root.join("a/b/deep.txt"), "1").unwrap();
        fs::write(root.join("a/.skip"), "123456789").unwrap();

        let scanner = EntityScanner::default();
        let totals = scanner.measure_tree(root);
        assert_eq!(
            totals,
            TreeTotals {
                files: 3,
                dirs: 2,
                bytes: 9
            }
        );
    }

    #[test]
    fn test_measure_respects_ignore_patterns() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "x".repeat(100)).unwrap();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();

        let config = ListingConfig::builder()
            .ignore_patterns(vec!["node_modules".to_string()])
            .build()
            .unwrap();
        let scanner = EntityScanner::from_config(&config).unwrap();
        let totals = scanner.measure_tree(root);
        assert_eq!(totals.files, 1);
        assert_eq!(totals.dirs, 0);
        assert_eq!(totals.bytes, 12);
    }

    #[test]
    fn test_measure_single_file_and_missing_path() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("one.bin");
        fs::write(&file, [0u8; 64]).unwrap();

        let scanner = EntityScanner::default();
        assert_eq!(scanner.measure_tree(&file).bytes, 64);
        assert_eq!(scanner.measure_tree(&temp.path().join("gone")), TreeTotals::default());
    }
}
