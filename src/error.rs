//! Domain-specific error types for the build tools.
//!
//! Library modules return typed errors ([`ConfigError`], [`InstallError`],
//! [`ScanError`]); the command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error domains
//!
//! ```text
//! ConfigError   config.gypi loading, root resolution
//! InstallError  manifest actions, filesystem failures
//! ScanError     preprocessor and parser failures
//! ```

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from loading `config.gypi` and resolving install roots.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The generated configuration file does not exist.
    #[error("configuration file not found: {} (run ./configure first)", path.display())]
    NotFound {
        /// Expected location of the file.
        path: PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("IO error reading config file {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The configuration file is not valid once normalised to JSON.
    #[error("malformed configuration in {}: {source}", path.display())]
    Malformed {
        /// Path to the offending file.
        path: PathBuf,
        /// Parser error, carrying line and column.
        source: serde_json::Error,
    },

    /// An install root from the configuration is not an absolute path.
    #[error("{key} must be an absolute path, got '{value}'")]
    RelativeRoot {
        /// Configuration key holding the value.
        key: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Filesystem operation that failed, used in [`InstallError::Filesystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    /// `mkdir -p`
    CreateDir,
    /// unlink of a file or symlink
    Remove,
    /// rmdir during upward cleanup
    RemoveDir,
    /// copy of contents and metadata
    Copy,
    /// symlink creation
    Symlink,
    /// file read
    Read,
    /// file write
    Write,
    /// directory tree walk
    Walk,
}

impl fmt::Display for FsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::CreateDir => "create directory",
            Self::Remove => "remove",
            Self::RemoveDir => "remove directory",
            Self::Copy => "copy",
            Self::Symlink => "create symlink",
            Self::Read => "read",
            Self::Write => "write",
            Self::Walk => "walk",
        };
        f.write_str(verb)
    }
}

/// Errors that arise while applying the install manifest.
#[derive(Error, Debug)]
pub enum InstallError {
    /// The action argument is neither `install` nor `uninstall`.
    #[error("Bad command: {0}")]
    BadCommand(String),

    /// A filesystem call failed with an error that is not tolerated.
    #[error("failed to {op} {}: {source}", path.display())]
    Filesystem {
        /// The operation that failed.
        op: FsOp,
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A manifest target would escape its install root.
    #[error("unsafe install target '{}': {reason}", target.display())]
    UnsafeTarget {
        /// The rejected target path.
        target: PathBuf,
        /// Why the target was rejected.
        reason: &'static str,
    },
}

impl InstallError {
    /// Build a [`InstallError::Filesystem`] from an operation, path and cause.
    pub fn fs(op: FsOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            op,
            path: path.into(),
            source,
        }
    }
}

/// Errors that arise from the header scan pipeline.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The preprocessor program could not be located.
    #[error("preprocessor '{0}' not found on PATH")]
    PreprocessorNotFound(String),

    /// The preprocessor wrote diagnostics or exited unsuccessfully.
    #[error("preprocessor failed: {0}")]
    Preprocess(String),

    /// The preprocessed source does not parse as C.
    #[error("parse error at line {line}, column {column}")]
    Parse {
        /// 1-based line of the first syntax error.
        line: usize,
        /// 1-based column of the first syntax error.
        column: usize,
    },

    /// The C grammar is incompatible with the linked tree-sitter runtime.
    #[error("failed to load C grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    /// Spawning or talking to the preprocessor failed.
    #[error("IO error running preprocessor: {0}")]
    Io(#[from] io::Error),
}
