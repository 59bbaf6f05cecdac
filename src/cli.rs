use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::Parser;

/// Command line of `node-install`.
#[derive(Parser, Debug)]
#[command(
    name = "node-install",
    about = "Install or uninstall node build artefacts",
    version = crate::VERSION
)]
pub struct InstallCli {
    /// `install` or `uninstall` (default: install)
    pub action: Option<String>,

    /// Staging directory prepended to every install path (packagers' DESTDIR)
    pub destdir: Option<OsString>,

    /// Build tree containing config.gypi (default: current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl InstallCli {
    /// Requested action, before validation.
    #[must_use]
    pub fn action(&self) -> &str {
        self.action.as_deref().unwrap_or("install")
    }

    /// Staging directory, with an empty argument treated as absent.
    #[must_use]
    pub fn destdir(&self) -> Option<&Path> {
        self.destdir
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(Path::new)
    }
}

/// Command line of `openssl-scan`.
#[derive(Parser, Debug)]
#[command(
    name = "openssl-scan",
    about = "List the functions declared by the bundled OpenSSL headers",
    version = crate::VERSION
)]
pub struct ScanCli {
    /// OpenSSL source root
    #[arg(long, default_value = "deps/openssl")]
    pub root: PathBuf,

    /// C preprocessor to run
    #[arg(long, default_value = "cpp")]
    pub cpp: String,

    /// Write the numbered, preprocessed source to stderr before parsing
    #[arg(long)]
    pub dump: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
