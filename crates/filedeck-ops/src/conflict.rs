//! Collision-resolved destination naming.
//!
//! Copies never overwrite. A taken name `a.txt` becomes `a (1).txt`, then
//! `a (2).txt`, and so on. Candidates are claimed with `create_new` /
//! `create_dir` so two writers cannot end up with the same name.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Give up on numbered candidates after this many and fall back to a timestamp.
const MAX_SUFFIX: u32 = 9999;

/// The name to try for attempt `n`, where 0 is the original name.
///
/// Files keep their extension after the counter. Names without a dot, or
/// whose only dot is the leading one, get the counter at the end.
pub fn numbered_name(name: &str, n: u32, is_dir: bool) -> String {
    if n == 0 {
        return name.to_string();
    }
    match name.rfind('.') {
        Some(dot) if dot > 0 && !is_dir => {
            format!("{} ({}).{}", &name[..dot], n, &name[dot + 1..])
        }
        _ => format!("{name} ({n})"),
    }
}

/// Create a new, empty file in `dir` named after `name`, suffixing on collision.
///
/// Returns the open handle along with the path that was claimed.
pub fn create_unique_file(dir: &Path, name: &str) -> io::Result<(File, PathBuf)> {
    claim(dir, name, false, |path| {
        OpenOptions::new().write(true).create_new(true).open(path)
    })
}

/// Create a new directory in `dir` named after `name`, suffixing on collision.
pub fn create_unique_dir(dir: &Path, name: &str) -> io::Result<PathBuf> {
    claim(dir, name, true, |path| fs::create_dir(path)).map(|((), path)| path)
}

fn claim<T>(
    dir: &Path,
    name: &str,
    is_dir: bool,
    mut create: impl FnMut(&Path) -> io::Result<T>,
) -> io::Result<(T, PathBuf)> {
    for n in 0..=MAX_SUFFIX {
        let candidate = dir.join(numbered_name(name, n, is_dir));
        match create(&candidate) {
            Ok(value) => return Ok((value, candidate)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    // Fallback: use timestamp
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let candidate = dir.join(format!("{name}_{timestamp}"));
    create(&candidate).map(|value| (value, candidate))
}
