//! Iteration over the files of a source tree.
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{FsOp, InstallError};

/// A file found under a [`SourceTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    /// Path relative to the tree root.
    pub relative: PathBuf,
    /// Path including the tree root.
    pub absolute: PathBuf,
}

/// A directory tree whose files are installed as a unit.
///
/// Directories whose name matches the exclusion predicate are pruned along
/// with everything below them. The tree root itself is never excluded.
#[derive(Debug, Clone)]
pub struct SourceTree<F> {
    root: PathBuf,
    exclude: F,
}

impl SourceTree<fn(&OsStr) -> bool> {
    /// A tree rooted at `root` with nothing excluded.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude: |_| false,
        }
    }
}

impl<F> SourceTree<F>
where
    F: Fn(&OsStr) -> bool,
{
    /// Replace the directory exclusion predicate.
    pub fn exclude<G>(self, exclude: G) -> SourceTree<G>
    where
        G: Fn(&OsStr) -> bool,
    {
        SourceTree {
            root: self.root,
            exclude,
        }
    }

    /// Every non-directory entry, sorted by file name within each directory.
    ///
    /// Links are not followed: a symlink to a directory is neither yielded
    /// nor descended into.
    pub fn files(self) -> impl Iterator<Item = Result<TreeFile, InstallError>> {
        let Self { root, exclude } = self;
        WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                !(entry.depth() > 0 && entry.file_type().is_dir() && exclude(entry.file_name()))
            })
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_dir() => None,
                Ok(entry) if entry.path_is_symlink() && entry.path().is_dir() => None,
                Ok(entry) => {
                    let absolute = entry.into_path();
                    let relative = absolute
                        .strip_prefix(&root)
                        .map_or_else(|_| absolute.clone(), Path::to_path_buf);
                    Some(Ok(TreeFile { relative, absolute }))
                }
                Err(err) => Some(Err(walk_error(err))),
            })
    }
}

fn walk_error(err: walkdir::Error) -> InstallError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other(message));
    InstallError::fs(FsOp::Walk, path, source)
}
