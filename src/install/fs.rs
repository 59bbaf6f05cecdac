//! Filesystem primitives with the installer's tolerance rules.
//!
//! Each helper tolerates exactly the condition that makes it idempotent
//! (an existing directory for `mkdir -p`, an absent path for unlink) and maps
//! every other failure to [`InstallError::Filesystem`].
use std::fs::{self, File, FileTimes};
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{FsOp, InstallError};

/// Create `path` and any missing ancestors.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, or if something that
/// is not a directory already occupies `path`.
pub fn ensure_dir(path: &Path) -> Result<(), InstallError> {
    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(InstallError::fs(FsOp::CreateDir, path, e)),
    }
}

/// Remove the file or symlink at `path`, including broken symlinks.
///
/// Returns `true` if something was removed and `false` if `path` was
/// already absent.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed (for example
/// because it is a directory).
pub fn remove_existing(path: &Path) -> Result<bool, InstallError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(InstallError::fs(FsOp::Remove, path, e)),
    }
}

/// Whether `path` itself is a symlink (the link is not followed).
#[must_use]
pub fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata()
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Copy the contents, permissions and timestamps of `src` to `dst`.
///
/// # Errors
///
/// Returns an error if `src` cannot be read, or `dst` cannot be written or
/// have its timestamps set.
pub fn copy_with_metadata(src: &Path, dst: &Path) -> Result<(), InstallError> {
    fs::copy(src, dst).map_err(|e| InstallError::fs(FsOp::Copy, src, e))?;

    let meta = fs::metadata(src).map_err(|e| InstallError::fs(FsOp::Read, src, e))?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }

    times_handle(dst)
        .and_then(|file| file.set_times(times))
        .map_err(|e| InstallError::fs(FsOp::Write, dst, e))
}

/// Open a handle that may update timestamps without needing write access to
/// the contents (the copied permissions may be read-only).
#[cfg(unix)]
fn times_handle(path: &Path) -> std::io::Result<File> {
    File::open(path)
}

#[cfg(not(unix))]
fn times_handle(path: &Path) -> std::io::Result<File> {
    File::options().write(true).open(path)
}

/// Create a symlink at `link` whose value is `target`.
///
/// # Errors
///
/// Returns an error if the link cannot be created.
pub fn symlink(target: &Path, link: &Path) -> Result<(), InstallError> {
    #[cfg(unix)]
    let result = std::os::unix::fs::symlink(target, link);
    #[cfg(windows)]
    let result = std::os::windows::fs::symlink_file(target, link);

    result.map_err(|e| InstallError::fs(FsOp::Symlink, link, e))
}

/// Remove `start` and then each parent directory while it is empty.
///
/// Stops at the first directory that is not empty or has already gone, and
/// never removes `boundary` or anything outside it. Returns the number of
/// directories removed.
///
/// # Errors
///
/// Returns an error for any removal failure other than "not empty" or
/// "not found".
pub fn remove_empty_dirs(start: &Path, boundary: &Path) -> Result<usize, InstallError> {
    let mut removed = 0;
    let mut current = start;
    while current.starts_with(boundary) && current != boundary {
        match fs::remove_dir(current) {
            Ok(()) => removed += 1,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::DirectoryNotEmpty) => {
                break;
            }
            Err(e) => return Err(InstallError::fs(FsOp::RemoveDir, current, e)),
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    Ok(removed)
}
