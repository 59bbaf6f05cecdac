//! Structured logger with dry-run awareness and summary collection.
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, StepEntry, StepStatus};

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger that emits [`tracing`] events and collects step results
/// for the end-of-run summary.
#[derive(Debug, Default)]
pub struct Logger {
    steps: Mutex<Vec<StepEntry>>,
}

impl Logger {
    /// Create a new logger with an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a clone of all recorded step entries.
    #[must_use]
    pub fn step_entries(&self) -> Vec<StepEntry> {
        self.steps.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a step result for the summary.
    pub fn record_step(&self, name: &str, status: StepStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.steps.lock() {
            guard.push(StepEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed steps.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.steps.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|s| s.status == StepStatus::Failed)
                .count()
        })
    }

    /// One-line tally of recorded steps by status.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let steps = self.step_entries();
        let count = |status: StepStatus| steps.iter().filter(|s| s.status == status).count();
        format!(
            "{} steps: {} ok, {} n/a, {} skipped, {} dry-run, {} failed",
            steps.len(),
            count(StepStatus::Ok),
            count(StepStatus::NotApplicable),
            count(StepStatus::Skipped),
            count(StepStatus::DryRun),
            count(StepStatus::Failed),
        )
    }

    /// Print the summary of all recorded steps.
    pub fn print_summary(&self) {
        let steps = self.step_entries();
        if steps.is_empty() {
            return;
        }

        self.stage("Summary");
        for step in &steps {
            let (icon, color) = match step.status {
                StepStatus::Ok => ("✓", "\x1b[32m"),
                StepStatus::NotApplicable => ("·", "\x1b[2m"),
                StepStatus::Skipped => ("○", "\x1b[33m"),
                StepStatus::DryRun => ("~", "\x1b[37m"),
                StepStatus::Failed => ("✗", "\x1b[31m"),
            };

            let suffix = step
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", step.name));
        }
        self.info(&self.summary_line());
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_step(&self, name: &str, status: StepStatus, message: Option<&str>) {
        self.record_step(name, status, message);
    }
}
