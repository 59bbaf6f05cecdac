//! Host platform detection.
use std::fmt;

/// Detected operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Linux distributions.
    Linux,
    /// macOS.
    MacOs,
    /// FreeBSD.
    FreeBsd,
    /// OpenBSD.
    OpenBsd,
    /// Windows.
    Windows,
    /// Any other target.
    Other,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::FreeBsd => "freebsd",
            Self::OpenBsd => "openbsd",
            Self::Windows => "windows",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Operating system family.
    pub os: Os,
}

impl Platform {
    /// Detect the current platform from the compilation target.
    #[must_use]
    pub const fn detect() -> Self {
        Self {
            os: Self::detect_os(),
        }
    }

    /// Create a platform with an explicit OS.
    #[must_use]
    pub const fn new(os: Os) -> Self {
        Self { os }
    }

    /// The BSDs keep manual pages at `<prefix>/man` rather than
    /// `<prefix>/share/man`.
    #[must_use]
    pub const fn man_dir(&self) -> &'static str {
        match self.os {
            Os::FreeBsd | Os::OpenBsd => "man/man1",
            _ => "share/man/man1",
        }
    }

    const fn detect_os() -> Os {
        if cfg!(target_os = "linux") {
            Os::Linux
        } else if cfg!(target_os = "macos") {
            Os::MacOs
        } else if cfg!(target_os = "freebsd") {
            Os::FreeBsd
        } else if cfg!(target_os = "openbsd") {
            Os::OpenBsd
        } else if cfg!(target_os = "windows") {
            Os::Windows
        } else {
            Os::Other
        }
    }
}
