use filedeck_core::path::{basename, dirname, is_ancestor_or_equal, join, split_extension};
use filedeck_core::{comparator, sort_entries, FileEntry, ListingConfig, NameFilter, SortKey};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

fn file(name: &str, size: u64, secs: u64) -> FileEntry {
    FileEntry::new_file(
        format!("/data/{name}"),
        size,
        UNIX_EPOCH + Duration::from_secs(secs),
    )
}

fn dir(name: &str) -> FileEntry {
    FileEntry::new_directory(format!("/data/{name}"), 0, UNIX_EPOCH)
}

#[test]
fn test_directory_sorts_before_file_regardless_of_name() {
    let cmp = comparator(SortKey::Name, true);
    let b = file("B", 0, 0);
    let a = dir("a");
    assert_eq!(cmp(&a, &b), Ordering::Less);
    assert_eq!(cmp(&b, &a), Ordering::Greater);

    // Same outcome for every key.
    for key in [SortKey::Size, SortKey::Date, SortKey::Type] {
        assert_eq!(comparator(key, true)(&dir("zzz"), &file("aaa", 0, 0)), Ordering::Less);
    }
}

#[test]
fn test_listing_with_mixed_keys() {
    let mut entries = vec![
        file("small.txt", 10, 300),
        dir("docs"),
        file("large.bin", 5000, 100),
        file("medium.md", 500, 200),
        dir("Archive"),
    ];

    sort_entries(&mut entries, SortKey::Size, true);
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    // Directories are equal under size so they keep insertion order (stable sort).
    assert_eq!(names, ["docs", "Archive", "small.txt", "medium.md", "large.bin"]);

    sort_entries(&mut entries, SortKey::Date, false);
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(&names[..3], ["small.txt", "medium.md", "large.bin"]);

    sort_entries(&mut entries, SortKey::Name, true);
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Archive", "docs", "large.bin", "medium.md", "small.txt"]);
}

#[test]
fn test_can_move_into_style_checks() {
    let staged = Path::new("/x/y");
    assert!(is_ancestor_or_equal(staged, Path::new("/x/y")));
    assert!(is_ancestor_or_equal(staged, Path::new("/x/y/z")));
    assert!(!is_ancestor_or_equal(staged, Path::new("/x/z")));
}

#[test]
fn test_path_helpers() {
    assert_eq!(join(Path::new("/a/"), "b"), PathBuf::from("/a/b"));
    assert_eq!(basename("/a/b.txt"), "b.txt");
    assert_eq!(dirname("/a/b.txt"), "/a");
    assert_eq!(split_extension("b.txt"), ("b", "txt"));
    assert_eq!(split_extension("Makefile"), ("", ""));
}

#[test]
fn test_config_produces_filter_and_policy() {
    let config = ListingConfig::builder()
        .ignore_patterns(vec!["*.tmp".to_string()])
        .storage_root("/storage")
        .build()
        .unwrap();

    let filter = config.filter().unwrap();
    assert!(!filter.accepts("cache.tmp"));
    assert!(filter.accepts("notes.txt"));

    let policy = config.visibility();
    assert!(!policy.is_visible(Path::new("/storage/.android_secure"), false));
    assert!(!policy.is_visible(Path::new("/storage/.cache"), false));
    assert!(policy.is_visible(Path::new("/storage/music"), false));
}

#[test]
fn test_invalid_filter_pattern_is_rejected() {
    assert!(NameFilter::new(&["a[".to_string()]).is_err());
}
