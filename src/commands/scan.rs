//! Scan command implementation.
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::logging::Log;
use crate::scan::{self, Cpp, HeaderSet, Preprocess};

/// Options for `openssl-scan`.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// OpenSSL source root.
    pub root: PathBuf,
    /// Preprocessor program name or path.
    pub cpp: String,
    /// Write the numbered preprocessed source to stderr.
    pub dump: bool,
}

/// Run the scan against the real preprocessor, writing names to stdout.
///
/// # Errors
///
/// Returns an error if the root is missing, the preprocessor cannot be found
/// or fails, or the output does not parse.
pub fn run(opts: &ScanOptions, log: &dyn Log) -> Result<()> {
    let root = dunce::canonicalize(&opts.root)
        .with_context(|| format!("openssl root {} not found", opts.root.display()))?;
    let headers = HeaderSet::new(root);
    log.debug(&format!("openssl root: {}", headers.root().display()));
    let cpp = Cpp::locate(&opts.cpp, &headers)?;
    log.debug(&format!("preprocessor: {}", cpp.program().display()));

    execute(
        &headers,
        &cpp,
        opts.dump,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
        log,
    )
}

/// Scan `headers` through `cpp`, writing names to `out` and the optional
/// source dump to `diag`.
///
/// # Errors
///
/// Propagates preprocessor, parse and write failures.
pub fn execute(
    headers: &HeaderSet,
    cpp: &dyn Preprocess,
    dump: bool,
    out: &mut impl Write,
    diag: &mut impl Write,
    log: &dyn Log,
) -> Result<()> {
    log.stage("Preprocessing headers");
    let source = scan::preprocess_headers(headers, cpp)?;
    if dump {
        scan::dump_source(diag, &source).context("failed to dump preprocessed source")?;
        writeln!(diag)?;
    }

    log.stage("Parsing");
    let names = scan::function_names(&source)?;
    log.info(&format!("found {} function(s)", names.len()));

    scan::write_names(out, &names).context("failed to write function names")
}
