//! Streaming file copy and recursive entry copy.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use filedeck_core::path::contains_on_disk;
use filedeck_core::{FsError, FsResult};
use filedeck_scan::EntityScanner;

use crate::conflict::{create_unique_dir, create_unique_file};
use crate::operation::{record, OperationError};

/// Copy the regular file at `source` into `dest_dir`.
///
/// `dest_dir` is created if missing. The copy never overwrites: a taken
/// name is suffixed as `stem (n).ext`. Bytes are streamed through a buffer
/// of `buffer_size` bytes. A failure mid-stream leaves the partial
/// destination file in place.
///
/// Returns the path that was written.
pub fn copy_file(source: &Path, dest_dir: &Path, buffer_size: usize) -> FsResult<PathBuf> {
    stream_copy(source, dest_dir, buffer_size).map(|(path, _)| path)
}

/// [`copy_file`], also returning the number of bytes written.
pub(crate) fn stream_copy(
    source: &Path,
    dest_dir: &Path,
    buffer_size: usize,
) -> FsResult<(PathBuf, u64)> {
    let metadata = fs::metadata(source).map_err(|e| FsError::io(source, e))?;
    if metadata.is_dir() {
        return Err(FsError::invalid(format!(
            "{} is a directory",
            source.display()
        )));
    }
    let name = source
        .file_name()
        .ok_or_else(|| FsError::invalid(format!("{} has no file name", source.display())))?;

    fs::create_dir_all(dest_dir).map_err(|e| FsError::CannotCreateDestination {
        path: dest_dir.to_path_buf(),
        source: e,
    })?;

    let mut reader = File::open(source).map_err(|e| FsError::CopyFailed {
        path: source.to_path_buf(),
        source: e,
    })?;
    let (mut writer, dest) =
        create_unique_file(dest_dir, &name.to_string_lossy()).map_err(|e| {
            FsError::CopyFailed {
                path: dest_dir.join(name),
                source: e,
            }
        })?;

    let copied = pump(&mut reader, &mut writer, buffer_size.max(1)).map_err(|e| {
        FsError::CopyFailed {
            path: dest.clone(),
            source: e,
        }
    })?;

    debug!(from = %source.display(), to = %dest.display(), bytes = copied, "copied file");
    Ok((dest, copied))
}

fn pump(reader: &mut impl Read, writer: &mut impl Write, buffer_size: usize) -> io::Result<u64> {
    let mut buffer = vec![0u8; buffer_size];
    let mut total = 0u64;
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..n])?;
        total += n as u64;
    }
    writer.flush()?;
    Ok(total)
}

/// Copy `source` into `dest_dir`, recursing into directories.
///
/// A directory gets a collision-resolved counterpart in `dest_dir`, then its
/// listed children are copied into that. Failures anywhere in the subtree
/// are pushed onto `errors` and the walk continues. Returns bytes written.
pub(crate) fn copy_entry(
    scanner: &EntityScanner,
    source: &Path,
    dest_dir: &Path,
    buffer_size: usize,
    errors: &mut Vec<OperationError>,
) -> u64 {
    let metadata = match fs::symlink_metadata(source) {
        Ok(m) => m,
        Err(e) => {
            record(errors, source, FsError::io(source, e));
            return 0;
        }
    };

    let is_dir = if metadata.file_type().is_symlink() {
        // Links to files are copied as their contents; links to directories are not walked.
        if fs::metadata(source).is_ok_and(|m| m.is_dir()) {
            let err = io::Error::new(io::ErrorKind::Unsupported, "directory symlink not followed");
            record(errors, source, FsError::CopyFailed {
                path: source.to_path_buf(),
                source: err,
            });
            return 0;
        }
        false
    } else {
        metadata.is_dir()
    };

    if !is_dir {
        return match stream_copy(source, dest_dir, buffer_size) {
            Ok((_, bytes)) => bytes,
            Err(e) => {
                record(errors, source, e);
                0
            }
        };
    }

    let Some(name) = source.file_name() else {
        let message = format!("{} has no file name", source.display());
        record(errors, source, FsError::invalid(message));
        return 0;
    };
    if contains_on_disk(source, dest_dir) {
        let err = io::Error::new(
            io::ErrorKind::InvalidInput,
            "cannot copy a directory into itself",
        );
        record(errors, source, FsError::CopyFailed {
            path: source.to_path_buf(),
            source: err,
        });
        return 0;
    }

    let created = fs::create_dir_all(dest_dir)
        .and_then(|()| create_unique_dir(dest_dir, &name.to_string_lossy()));
    let target = match created {
        Ok(path) => path,
        Err(e) => {
            record(errors, source, FsError::CannotCreateDestination {
                path: dest_dir.to_path_buf(),
                source: e,
            });
            return 0;
        }
    };
    debug!(from = %source.display(), to = %target.display(), "copying directory");

    let children = match scanner.scan_children(source) {
        Ok(children) => children,
        Err(e) => {
            record(errors, source, e);
            return 0;
        }
    };

    children
        .iter()
        .map(|child| copy_entry(scanner, &child.path, &target, buffer_size, errors))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_file_streams_all_bytes() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("data.bin");
        let payload: Vec<u8> = (0..250_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&source, &payload).unwrap();

        // Small buffer forces many chunks.
        let dest = copy_file(&source, &temp.path().join("out"), 4096).unwrap();
        assert_eq!(dest, temp.path().join("out/data.bin"));
        assert_eq!(fs::read(&dest).unwrap(), payload);
    }

    #[test]
    fn test_copy_file_never_overwrites() {
        let temp = TempDir::new().unwrap();
        let src_dir = temp.path().join("src");
        let dest_dir = temp.path().join("dest");
        fs::create_dir_all(&src_dir).unwrap();
        fs::create_dir_all(&dest_dir).unwrap();
        fs::write(src_dir.join("a.txt"), "new").unwrap();
        fs::write(dest_dir.join("a.txt"), "old").unwrap();

        let first = copy_file(&src_dir.join("a.txt"), &dest_dir, 1024).unwrap();
        let second = copy_file(&src_dir.join("a.txt"), &dest_dir, 1024).unwrap();
        assert_eq!(first, dest_dir.join("a (1).txt"));
        assert_eq!(second, dest_dir.join("a (2).txt"));
        assert_eq!(fs::read_to_string(dest_dir.join("a.txt")).unwrap(), "old");
    }

    #[test]
    fn test_copy_file_rejects_directories_and_missing_sources() {
        let temp = TempDir::new().unwrap();
        let err = copy_file(temp.path(), &temp.path().join("out"), 1024).unwrap_err();
        assert!(matches!(err, FsError::InvalidArgument { .. }));

        let err = copy_file(&temp.path().join("gone"), temp.path(), 1024).unwrap_err();
        assert!(matches!(err, FsError::NotFound { .. }));
    }

    #[test]
    fn test_copy_file_cannot_create_destination() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "x").unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a dir").unwrap();

        let err = copy_file(&source, &blocker.join("sub"), 1024).unwrap_err();
        assert!(matches!(err, FsError::CannotCreateDestination { .. }));
    }

    #[test]
    fn test_copy_entry_recurses_with_policy() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("project");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("main.rs"), "fn main() {}").unwrap();
        fs::write(src.join("nested/lib.rs"), "// lib").unwrap();
        fs::write(src.join(".secret"), "hidden").unwrap();
        let dest = temp.path().join("dest");
        fs::create_dir(&dest).unwrap();
        fs::create_dir(dest.join("project")).unwrap();

        let mut errors = Vec::new();
        let bytes = copy_entry(&EntityScanner::default(), &src, &dest, 1024, &mut errors);

        assert!(errors.is_empty());
        assert_eq!(bytes, 18);
        let copied = dest.join("project (1)");
        assert!(copied.join("main.rs").is_file());
        assert!(copied.join("nested/lib.rs").is_file());
        assert!(!copied.join(".secret").exists());
    }

    #[test]
    fn test_copy_entry_without_file_name_fails() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("src/sub")).unwrap();
        let dest = temp.path().join("dest");

        let mut errors = Vec::new();
        let source = temp.path().join("src/sub/..");
        copy_entry(&EntityScanner::default(), &source, &dest, 1024, &mut errors);

        assert_eq!(errors.len(), 1);
        assert_eq!(fs::read_dir(temp.path().join("src/sub")).unwrap().count(), 0);
    }

    #[test]
    fn test_copy_entry_into_differently_cased_sibling() {
        let temp = TempDir::new().unwrap();
        let upper = temp.path().join("Photos");
        let lower = temp.path().join("photos");
        fs::create_dir(&upper).unwrap();
        fs::write(upper.join("a.jpg"), "jpg").unwrap();
        // Case-insensitive filesystems fold both names onto one directory.
        if fs::create_dir(&lower).is_err() {
            return;
        }

        let mut errors = Vec::new();
        copy_entry(&EntityScanner::default(), &upper, &lower.join("x"), 1024, &mut errors);
        assert!(errors.is_empty());
        assert!(lower.join("x/Photos/a.jpg").is_file());
    }

    #[test]
    fn test_copy_entry_into_own_subtree_fails() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("loop");
        fs::create_dir_all(src.join("inner")).unwrap();

        let mut errors = Vec::new();
        copy_entry(&EntityScanner::default(), &src, &src.join("inner"), 1024, &mut errors);
        assert_eq!(errors.len(), 1);
        assert!(!src.join("inner/loop").exists());
    }
}
