//! Listing order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::entry::FileEntry;
use crate::path::cmp_ignore_case;

/// Key used to order a directory listing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortKey {
    /// Case-insensitive name (A-Z).
    #[default]
    Name,
    /// Size ascending (smallest first).
    Size,
    /// Modified date descending (newest first).
    Date,
    /// Extension, then stem, case-insensitive.
    Type,
}

impl SortKey {
    /// Compare two entries of the same kind (both files or both directories).
    fn compare(self, a: &FileEntry, b: &FileEntry) -> Ordering {
        match self {
            Self::Name => cmp_ignore_case(&a.name, &b.name),
            Self::Size => a.size.cmp(&b.size),
            Self::Date => b.modified.cmp(&a.modified),
            Self::Type => cmp_ignore_case(a.extension(), b.extension())
                .then_with(|| cmp_ignore_case(a.stem(), b.stem())),
        }
    }
}

/// Build a comparator for `key`.
///
/// When exactly one operand is a directory, it sorts before the file if
/// `directories_first` is set and after it otherwise; `key` only decides
/// between entries of the same kind.
pub fn comparator(
    key: SortKey,
    directories_first: bool,
) -> impl Fn(&FileEntry, &FileEntry) -> Ordering + Copy + Send + Sync {
    move |a, b| match (a.is_dir, b.is_dir) {
        (true, false) if directories_first => Ordering::Less,
        (true, false) => Ordering::Greater,
        (false, true) if directories_first => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => key.compare(a, b),
    }
}

/// Sort `entries` in place (stable).
pub fn sort_entries(entries: &mut [FileEntry], key: SortKey, directories_first: bool) {
    entries.sort_by(comparator(key, directories_first));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    fn file(name: &str) -> FileEntry {
        FileEntry::new_file(format!("/t/{name}"), 0, UNIX_EPOCH)
    }

    fn dir(name: &str) -> FileEntry {
        FileEntry::new_directory(format!("/t/{name}"), 0, UNIX_EPOCH)
    }

    fn at(name: &str, secs: u64) -> FileEntry {
        let mut e = file(name);
        e.modified = UNIX_EPOCH + Duration::from_secs(secs);
        e
    }

    fn names(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_directory_first_beats_name() {
        let mut entries = vec![file("B"), dir("a")];
        sort_entries(&mut entries, SortKey::Name, true);
        assert_eq!(names(&entries), ["a", "B"]);

        let mut entries = vec![file("a"), dir("z")];
        sort_entries(&mut entries, SortKey::Name, true);
        assert_eq!(names(&entries), ["z", "a"]);
    }

    #[test]
    fn test_files_first_when_flag_off() {
        let mut entries = vec![dir("a"), file("z")];
        sort_entries(&mut entries, SortKey::Name, false);
        assert_eq!(names(&entries), ["z", "a"]);
    }

    #[test]
    fn test_name_is_case_insensitive() {
        let mut entries = vec![file("beta"), file("Alpha"), file("CHARLIE")];
        sort_entries(&mut entries, SortKey::Name, true);
        assert_eq!(names(&entries), ["Alpha", "beta", "CHARLIE"]);
    }

    #[test]
    fn test_date_is_descending() {
        let mut entries = vec![at("old", 100), at("new", 200)];
        sort_entries(&mut entries, SortKey::Date, true);
        assert_eq!(names(&entries), ["new", "old"]);
    }

    #[test]
    fn test_size_extremes_do_not_overflow() {
        let mut big = file("big");
        big.size = u64::MAX;
        let small = file("small");
        let cmp = comparator(SortKey::Size, true);
        assert_eq!(cmp(&small, &big), Ordering::Less);
        assert_eq!(cmp(&big, &small), Ordering::Greater);
    }

    #[test]
    fn test_size_treats_directories_as_equal() {
        let cmp = comparator(SortKey::Size, true);
        assert_eq!(cmp(&dir("a"), &dir("b")), Ordering::Equal);
    }

    #[test]
    fn test_type_orders_by_extension_then_stem() {
        let mut entries = vec![file("b.txt"), file("a.TXT"), file("c.md"), file("README")];
        sort_entries(&mut entries, SortKey::Type, true);
        assert_eq!(names(&entries), ["README", "c.md", "a.TXT", "b.txt"]);
    }

    #[test]
    fn test_sort_key_parse_and_display() {
        assert_eq!("date".parse::<SortKey>().ok(), Some(SortKey::Date));
        assert_eq!("TYPE".parse::<SortKey>().ok(), Some(SortKey::Type));
        assert_eq!(SortKey::Size.to_string(), "size");
    }

    #[test]
    fn test_same_time_compares_equal() {
        let now = SystemTime::now();
        let mut a = file("a");
        let mut b = file("b");
        a.modified = now;
        b.modified = now;
        assert_eq!(comparator(SortKey::Date, true)(&a, &b), Ordering::Equal);
    }
}
