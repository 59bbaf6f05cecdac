//! The C preprocessor seam.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::headers::HeaderSet;
use crate::error::ScanError;
use crate::exec;

/// Expands an `#include` blob into plain C.
#[cfg_attr(test, mockall::automock)]
pub trait Preprocess {
    /// Run the preprocessor over `source` and return the expanded text.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if the preprocessor cannot run, reports
    /// diagnostics or exits unsuccessfully.
    fn preprocess(&self, source: &str) -> Result<String, ScanError>;
}

/// An external `cpp` invocation.
#[derive(Debug, Clone)]
pub struct Cpp {
    program: PathBuf,
    args: Vec<OsString>,
}

impl Cpp {
    /// Locate `program` on `PATH` (or use it as given when it contains a
    /// path separator) and configure it for `headers`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::PreprocessorNotFound`] if the program cannot be
    /// found.
    pub fn locate(program: &str, headers: &HeaderSet) -> Result<Self, ScanError> {
        let resolved = which::which(program)
            .map_err(|_| ScanError::PreprocessorNotFound(program.to_string()))?;
        Ok(Self::with_args(resolved, headers.cpp_args()))
    }

    /// A preprocessor with an explicit argument list.
    pub fn with_args(program: impl Into<PathBuf>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Resolved program path.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Preprocess for Cpp {
    fn preprocess(&self, source: &str) -> Result<String, ScanError> {
        tracing::debug!("running {} with {} args", self.program.display(), self.args.len());
        let result = exec::run_with_input(&self.program, &self.args, source)?;
        if !result.stderr.is_empty() {
            return Err(ScanError::Preprocess(result.stderr.trim_end().to_string()));
        }
        if !result.success {
            let status = result
                .code
                .map_or_else(|| "killed by signal".to_string(), |c| format!("exit status {c}"));
            return Err(ScanError::Preprocess(status));
        }
        Ok(result.stdout)
    }
}
