//! OpenSSL header scanner.
//!
//! Preprocesses the fixed header set and lists every function declared with
//! a plain (non-pointer) return type.
pub mod headers;
pub mod preprocess;
pub mod visitor;

use std::io::{self, Write};

use crate::error::ScanError;

pub use headers::HeaderSet;
pub use preprocess::{Cpp, Preprocess};

/// Expand the `#include` blob for `headers`.
///
/// # Errors
///
/// Propagates preprocessor failures.
pub fn preprocess_headers(
    headers: &HeaderSet,
    cpp: &dyn Preprocess,
) -> Result<String, ScanError> {
    let blob = headers.include_blob();
    tracing::debug!("preprocessing {} headers", headers.headers().len());
    let source = cpp.preprocess(&blob)?;
    tracing::debug!("preprocessed source is {} lines", source.lines().count());
    Ok(source)
}

/// Function names declared in preprocessed C `source`, in document order.
///
/// # Errors
///
/// Returns [`ScanError::Parse`] if `source` is not valid C.
pub fn function_names(source: &str) -> Result<Vec<String>, ScanError> {
    let tree = visitor::parse(source)?;
    Ok(visitor::collect_names(&tree, source))
}

/// Preprocess and parse `headers`, returning the declared function names.
///
/// # Errors
///
/// Propagates preprocessor and parse failures.
pub fn scan(headers: &HeaderSet, cpp: &dyn Preprocess) -> Result<Vec<String>, ScanError> {
    let source = preprocess_headers(headers, cpp)?;
    function_names(&source)
}

/// Write names newline-separated, without a trailing newline.
///
/// # Errors
///
/// Propagates write errors.
pub fn write_names(out: &mut impl Write, names: &[String]) -> io::Result<()> {
    out.write_all(names.join("\n").as_bytes())?;
    out.flush()
}

/// Write `source` with 1-based line numbers: a sign space before the
/// number, the pair right-aligned to three columns, then two spaces.
///
/// # Errors
///
/// Propagates write errors.
pub fn dump_source(out: &mut impl Write, source: &str) -> io::Result<()> {
    let numbered: Vec<String> = source
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let number = format!(" {}", i + 1);
            format!("{number:>3}  {line}")
        })
        .collect();
    out.write_all(numbered.join("\n").as_bytes())?;
    out.flush()
}
