//! Child process execution.
use std::ffi::OsStr;
use std::io::{self, Write as _};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread;

/// Result of a command execution.
#[derive(Debug)]
pub struct ExecResult {
    /// Captured standard output, lossily decoded.
    pub stdout: String,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Run `program` with `args`, feed `input` to its stdin and collect its
/// output. Never fails because of the exit status; callers inspect
/// [`ExecResult::success`].
///
/// Stdin is written from a helper thread while the output pipes are drained,
/// so neither side can block the other. A child that exits without reading
/// all of its input is not an error.
///
/// # Errors
///
/// Returns an error if the process cannot be spawned or its pipes fail.
pub fn run_with_input<S: AsRef<OsStr>>(
    program: &Path,
    args: &[S],
    input: &str,
) -> io::Result<ExecResult> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("child stdin was not captured"))?;
    let input = input.to_owned();
    let writer = thread::spawn(move || match stdin.write_all(input.as_bytes()) {
        Err(e) if e.kind() != io::ErrorKind::BrokenPipe => Err(e),
        _ => Ok(()),
    });

    let output = child.wait_with_output()?;
    writer
        .join()
        .map_err(|_| io::Error::other("stdin writer thread panicked"))??;
    Ok(ExecResult::from(output))
}
