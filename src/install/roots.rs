//! Install roots and destination rules.
//!
//! Every path the installer touches is built here. A destination is always
//! `destdir + root + target`, where the root is absolute and the target is a
//! relative path whose file-vs-directory meaning is carried by [`Target`]
//! instead of a trailing slash.
use std::path::{Component, Path, PathBuf};

use crate::config::Config;
use crate::error::{ConfigError, InstallError};

/// Default install prefix when `node_prefix` is unset.
pub const DEFAULT_PREFIX: &str = "/usr/local";

/// Which resolved root a destination rule is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKey {
    /// `node_prefix`
    Prefix,
    /// `node_libdir`
    Libdir,
}

/// A destination path relative to a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Install to exactly this path (rename semantics).
    File(PathBuf),
    /// Install into this directory under the source's base name.
    Dir(PathBuf),
}

impl Target {
    /// Rename target.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Copy-into target.
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self::Dir(path.into())
    }

    /// The relative path carried by either variant.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::File(p) | Self::Dir(p) => p,
        }
    }
}

/// A `(root, target)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Root the target is relative to.
    pub root: RootKey,
    /// Relative destination.
    pub target: Target,
}

impl Rule {
    /// Create a rule.
    #[must_use]
    pub const fn new(root: RootKey, target: Target) -> Self {
        Self { root, target }
    }
}

/// The resolved install roots for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    prefix: PathBuf,
    libdir: PathBuf,
    destdir: Option<PathBuf>,
}

impl Roots {
    /// Build roots from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RelativeRoot`] if `prefix` or `libdir` is not
    /// absolute.
    pub fn new(
        prefix: impl Into<PathBuf>,
        libdir: impl Into<PathBuf>,
        destdir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let prefix = absolute_root("node_prefix", prefix.into())?;
        let libdir = absolute_root("node_libdir", libdir.into())?;
        Ok(Self {
            prefix,
            libdir,
            destdir: destdir.map(|d| normalize(&d)),
        })
    }

    /// Derive roots from the configuration and the optional destdir argument.
    ///
    /// A relative `destdir` is made absolute against `base` (the build root);
    /// an empty one is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RelativeRoot`] if the configured prefix or
    /// libdir is relative.
    pub fn resolve(
        config: &Config,
        destdir: Option<&Path>,
        base: &Path,
    ) -> Result<Self, ConfigError> {
        let prefix = PathBuf::from(config.string("node_prefix").unwrap_or(DEFAULT_PREFIX));
        let libdir = config
            .string("node_libdir")
            .map_or_else(|| prefix.join("lib"), PathBuf::from);
        let destdir = destdir
            .filter(|d| !d.as_os_str().is_empty())
            .map(|d| base.join(d));
        Self::new(prefix, libdir, destdir)
    }

    /// Install prefix as seen at runtime (without destdir).
    #[must_use]
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// Library directory as seen at runtime (without destdir).
    #[must_use]
    pub fn libdir(&self) -> &Path {
        &self.libdir
    }

    /// Staging directory, if any.
    #[must_use]
    pub fn destdir(&self) -> Option<&Path> {
        self.destdir.as_deref()
    }

    /// Runtime location of a root.
    #[must_use]
    pub fn unstaged(&self, key: RootKey) -> &Path {
        match key {
            RootKey::Prefix => &self.prefix,
            RootKey::Libdir => &self.libdir,
        }
    }

    /// On-disk location of a root (destdir applied).
    #[must_use]
    pub fn root(&self, key: RootKey) -> PathBuf {
        self.stage(self.unstaged(key))
    }

    /// Map an absolute runtime path to its on-disk location under destdir.
    #[must_use]
    pub fn stage(&self, path: &Path) -> PathBuf {
        let path = normalize(path);
        match &self.destdir {
            Some(destdir) => {
                let mut staged = destdir.clone();
                staged.extend(path.components().filter_map(|c| match c {
                    Component::Normal(part) => Some(part),
                    _ => None,
                }));
                staged
            }
            None => path,
        }
    }

    /// On-disk destination of `source` under `rule`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::UnsafeTarget`] if the target is absolute or
    /// climbs out of its root, or if a directory target is paired with a
    /// source that has no file name.
    pub fn locate(&self, source: &Path, rule: &Rule) -> Result<PathBuf, InstallError> {
        let relative = rule.target.path();
        check_relative(relative)?;
        let base = self.root(rule.root).join(relative);
        match &rule.target {
            Target::File(_) => Ok(base),
            Target::Dir(_) => {
                let name = source.file_name().ok_or_else(|| InstallError::UnsafeTarget {
                    target: relative.to_path_buf(),
                    reason: "source has no file name",
                })?;
                Ok(base.join(name))
            }
        }
    }
}

fn absolute_root(key: &'static str, path: PathBuf) -> Result<PathBuf, ConfigError> {
    if path.has_root() {
        Ok(normalize(&path))
    } else {
        Err(ConfigError::RelativeRoot {
            key,
            value: path.display().to_string(),
        })
    }
}

fn check_relative(path: &Path) -> Result<(), InstallError> {
    let reason = path.components().find_map(|c| match c {
        Component::Prefix(_) | Component::RootDir => Some("target must be relative"),
        Component::ParentDir => Some("target must not contain '..'"),
        Component::CurDir | Component::Normal(_) => None,
    });
    reason.map_or(Ok(()), |reason| {
        Err(InstallError::UnsafeTarget {
            target: path.to_path_buf(),
            reason,
        })
    })
}

/// Lexically normalise a path: drop `.`, resolve `..` against the preceding
/// component, never climbing above the root.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if out.file_name().is_some() {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
