//! Core logging types: step entries, status, and the [`Log`] trait.
use std::fmt::Debug;

/// Manifest step result for summary reporting.
#[derive(Debug, Clone)]
pub struct StepEntry {
    /// Human-readable step name.
    pub name: String,
    /// Final status of the step.
    pub status: StepStatus,
    /// Optional detail message (file count, skip reason, error).
    pub message: Option<String>,
}

/// Status of a completed manifest step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step completed successfully.
    Ok,
    /// Step is gated off by configuration.
    NotApplicable,
    /// Step was deliberately skipped (e.g. developer symlink in place).
    Skipped,
    /// Step ran in dry-run mode; nothing was changed.
    DryRun,
    /// Step hit an error and aborted the run.
    Failed,
}

/// Abstraction over logging backends.
///
/// Manifest code logs through this trait so tests can substitute their own
/// recorder without installing a global subscriber.
pub trait Log: Send + Sync + Debug {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (suppressed on console unless verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a step result for the summary.
    fn record_step(&self, name: &str, status: StepStatus, message: Option<&str>);
}
