//! Path helpers.
//!
//! Paths stay case-preserving everywhere; only the equality checks made
//! inside the engine ([`is_ancestor_or_equal`], [`eq_ignore_case`]) fold case.
//! [`resolve_entry`], [`resolve_dir`] and [`contains_on_disk`] consult the
//! filesystem and compare exactly.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{is_separator, Path, PathBuf, MAIN_SEPARATOR_STR};

/// Join `child` onto `base` with exactly one separator between them.
///
/// Leading separators on `child` are ignored so the result always stays
/// under `base`.
pub fn join(base: &Path, child: &str) -> PathBuf {
    base.join(child.trim_start_matches(is_separator))
}

/// Check whether `candidate` is `path` itself or one of its ancestors.
///
/// Walks the parent chain of `path` up to the filesystem root, comparing
/// each step case-insensitively against `candidate`.
pub fn is_ancestor_or_equal(candidate: &Path, path: &Path) -> bool {
    let candidate = trimmed(candidate);
    path.ancestors()
        .any(|ancestor| eq_str_ignore_case(trimmed(ancestor).as_ref(), candidate.as_ref()))
}

/// Case-insensitive path equality, ignoring trailing separators.
pub fn eq_ignore_case(a: &Path, b: &Path) -> bool {
    eq_str_ignore_case(trimmed(a).as_ref(), trimmed(b).as_ref())
}

/// Split a file name into `(stem, extension)` at the last `.`.
///
/// Both halves are empty when the name has no `.` at all, so `"README"`
/// yields `("", "")`.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) => (&name[..dot], &name[dot + 1..]),
        None => ("", ""),
    }
}

/// The final component of a separator-delimited path, or `""` without a separator.
pub fn basename(path: &str) -> &str {
    match path.rfind(is_separator) {
        Some(pos) => &path[pos + 1..],
        None => "",
    }
}

/// Everything before the last separator, or `""` without a separator.
pub fn dirname(path: &str) -> &str {
    match path.rfind(is_separator) {
        Some(pos) => &path[..pos],
        None => "",
    }
}

/// Case-insensitive lexicographic comparison without allocating.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Make `path` absolute and resolve `..` and symlinks in its parent chain.
///
/// The final component is kept as written, so a symlink stays the link and
/// not its target. A path ending in `..` is resolved in full.
pub fn resolve_entry(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    Ok(match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => canonical_prefix(parent).join(name),
        _ => canonical_prefix(&absolute),
    })
}

/// Make `path` absolute and resolve it in full, including a trailing symlink.
///
/// Components that do not exist yet are appended unresolved.
pub fn resolve_dir(path: &Path) -> io::Result<PathBuf> {
    Ok(canonical_prefix(&std::path::absolute(path)?))
}

/// Whether `path` is `dir` or lies inside it once both are resolved on disk.
///
/// Compares whole components exactly, unlike [`is_ancestor_or_equal`].
pub fn contains_on_disk(dir: &Path, path: &Path) -> bool {
    match (resolve_entry(dir), resolve_dir(path)) {
        (Ok(dir), Ok(path)) => path.starts_with(dir),
        _ => path.starts_with(dir),
    }
}

/// Canonicalize the longest existing prefix of an absolute path.
fn canonical_prefix(path: &Path) -> PathBuf {
    let mut tail = Vec::new();
    let mut current = path;
    loop {
        if let Ok(canonical) = fs::canonicalize(current) {
            return tail.iter().rev().fold(canonical, |acc, name| acc.join(name));
        }
        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name);
                current = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}

fn eq_str_ignore_case(a: &str, b: &str) -> bool {
    cmp_ignore_case(a, b) == Ordering::Equal
}

fn trimmed(path: &Path) -> std::borrow::Cow<'_, str> {
    let raw = path.to_string_lossy();
    let trimmed = raw.trim_end_matches(is_separator);
    if trimmed.len() == raw.len() {
        raw
    } else if trimmed.is_empty() && !raw.is_empty() {
        MAIN_SEPARATOR_STR.into()
    } else {
        trimmed.to_string().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_single_separator() {
        assert_eq!(join(Path::new("/a/b"), "c"), PathBuf::from("/a/b/c"));
        assert_eq!(join(Path::new("/a/b/"), "c"), PathBuf::from("/a/b/c"));
        assert_eq!(join(Path::new("/a/b"), "/c"), PathBuf::from("/a/b/c"));
    }

    #[test]
    fn test_ancestor_or_equal() {
        assert!(is_ancestor_or_equal(Path::new("/x/y"), Path::new("/x/y")));
        assert!(is_ancestor_or_equal(Path::new("/x/y"), Path::new("/x/y/z")));
        assert!(is_ancestor_or_equal(Path::new("/X/Y"), Path::new("/x/y/z")));
        assert!(is_ancestor_or_equal(Path::new("/x/y/"), Path::new("/x/y/z")));
        assert!(!is_ancestor_or_equal(Path::new("/x/y"), Path::new("/x/z")));
        assert!(!is_ancestor_or_equal(Path::new("/x/y"), Path::new("/x/yz")));
        assert!(!is_ancestor_or_equal(Path::new("/x/y/z"), Path::new("/x/y")));
    }

    #[test]
    fn test_root_is_ancestor_of_everything() {
        assert!(is_ancestor_or_equal(Path::new("/"), Path::new("/x/y")));
    }

    #[test]
    fn test_resolve_entry_collapses_parent_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("src/sub")).unwrap();
        let root = fs::canonicalize(temp.path()).unwrap();

        let resolved = resolve_entry(&temp.path().join("src/sub/..")).unwrap();
        assert_eq!(resolved, root.join("src"));
        assert_eq!(resolved.file_name().unwrap(), "src");

        let resolved = resolve_entry(&temp.path().join("src/sub/../missing.txt")).unwrap();
        assert_eq!(resolved, root.join("src/missing.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_entry_keeps_final_symlink() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::create_dir(temp.path().join("target")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("target"), temp.path().join("link")).unwrap();
        let root = fs::canonicalize(temp.path()).unwrap();

        assert_eq!(resolve_entry(&temp.path().join("link")).unwrap(), root.join("link"));
        assert_eq!(resolve_dir(&temp.path().join("link")).unwrap(), root.join("target"));
    }

    #[test]
    fn test_contains_on_disk_is_exact() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("photos/x")).unwrap();
        let dir = temp.path().join("photos");

        assert!(contains_on_disk(&dir, &dir));
        assert!(contains_on_disk(&dir, &temp.path().join("photos/x/new")));
        assert!(contains_on_disk(&dir, &temp.path().join("photos/x/../x")));
        assert!(!contains_on_disk(&temp.path().join("Photos"), &temp.path().join("photos/x")));
        assert!(!contains_on_disk(&dir, &temp.path().join("photos2")));
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("photo.JPG"), ("photo", "JPG"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", "gz"));
        assert_eq!(split_extension(".bashrc"), ("", "bashrc"));
    }

    #[test]
    fn test_split_extension_without_dot_yields_empty_stem() {
        assert_eq!(split_extension("README"), ("", ""));
    }

    #[test]
    fn test_basename_dirname() {
        assert_eq!(basename("/a/b/c.txt"), "c.txt");
        assert_eq!(dirname("/a/b/c.txt"), "/a/b");
        assert_eq!(basename("c.txt"), "");
        assert_eq!(dirname("c.txt"), "");
    }

    #[test]
    fn test_cmp_ignore_case() {
        assert_eq!(cmp_ignore_case("abc", "ABC"), Ordering::Equal);
        assert_eq!(cmp_ignore_case("a", "B"), Ordering::Less);
        assert_eq!(cmp_ignore_case("Zed", "apple"), Ordering::Greater);
    }
}
