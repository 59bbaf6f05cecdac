//! The install manifest applier.
//!
//! The manifest is a fixed list of [`Step`]s. Each step is a group of
//! source → destination entries that is applied or reversed as a whole,
//! according to the run's [`Action`].
//!
//! - **[`roots`]**: resolved install roots and destination rules
//! - **[`manifest`]**: the static file groups
//! - **[`npm`]**: the bundled package manager (tree mirror + entry-point link)
//! - **[`applier`]**: per-entry install/uninstall
//! - **[`fs`]**: tolerant filesystem primitives
//! - **[`walk`]**: source tree iteration
pub mod applier;
pub mod fs;
pub mod manifest;
pub mod npm;
pub mod roots;
pub mod walk;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::config::Config;
use crate::error::InstallError;
use crate::logging::{Log, StepStatus};
use crate::platform::Platform;

pub use roots::{RootKey, Roots, Rule, Target};

/// What to do with the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// Copy every entry into place.
    #[default]
    Install,
    /// Remove every entry and prune emptied directories.
    Uninstall,
}

impl FromStr for Action {
    type Err = InstallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "install" => Ok(Self::Install),
            "uninstall" => Ok(Self::Uninstall),
            other => Err(InstallError::BadCommand(other.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => f.write_str("install"),
            Self::Uninstall => f.write_str("uninstall"),
        }
    }
}

/// Everything a step needs for one run. Built once, read-only afterwards.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Loaded `config.gypi`.
    pub config: &'a Config,
    /// Resolved roots.
    pub roots: &'a Roots,
    /// Directory that manifest source paths are relative to.
    pub build_root: &'a Path,
    /// Install or uninstall.
    pub action: Action,
    /// Log actions without touching the filesystem.
    pub dry_run: bool,
    /// Rewrite the npm entry point for a relocatable tree.
    pub portable: bool,
    /// Logging backend.
    pub log: &'a dyn Log,
}

/// Outcome of a step that ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// Step applied `files` entries.
    Ok {
        /// Number of entries processed.
        files: usize,
    },
    /// Step decided not to touch anything.
    Skipped(String),
    /// Step ran in dry-run mode.
    DryRun {
        /// Number of entries that would have been processed.
        files: usize,
    },
}

impl StepResult {
    /// `Ok` or `DryRun` depending on the context.
    #[must_use]
    pub const fn done(ctx: &Context<'_>, files: usize) -> Self {
        if ctx.dry_run {
            Self::DryRun { files }
        } else {
            Self::Ok { files }
        }
    }
}

/// A named group of manifest entries.
pub trait Step {
    /// Human-readable step name.
    fn name(&self) -> &str;

    /// Whether the configuration enables this step.
    fn should_run(&self, ctx: &Context<'_>) -> bool;

    /// Apply `ctx.action` to every entry of the step.
    ///
    /// # Errors
    ///
    /// Returns the first filesystem error; remaining entries are not touched.
    fn run(&self, ctx: &Context<'_>) -> Result<StepResult, InstallError>;
}

/// The complete manifest in application order.
///
/// `bin/node` is placed before the npm link that refers to it.
#[must_use]
pub fn all_steps(platform: &Platform) -> Vec<Box<dyn Step>> {
    vec![
        Box::new(manifest::headers()),
        Box::new(manifest::uv_private_headers()),
        Box::new(manifest::binary()),
        Box::new(manifest::dtrace()),
        Box::new(manifest::manpage(platform)),
        Box::new(manifest::waf()),
        Box::new(npm::NpmBundle),
    ]
}

/// Execute a step, recording the result in the logger.
///
/// # Errors
///
/// Propagates the step's error after recording it as failed.
pub fn execute(step: &dyn Step, ctx: &Context<'_>) -> Result<(), InstallError> {
    if !step.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping step: {} (not enabled)", step.name()));
        ctx.log
            .record_step(step.name(), StepStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(&format!("{} {}", ctx.action, step.name()));

    match step.run(ctx) {
        Ok(StepResult::Ok { files }) => {
            ctx.log.record_step(
                step.name(),
                StepStatus::Ok,
                Some(&format!("{files} file(s)")),
            );
            Ok(())
        }
        Ok(StepResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_step(step.name(), StepStatus::Skipped, Some(&reason));
            Ok(())
        }
        Ok(StepResult::DryRun { files }) => {
            ctx.log.record_step(
                step.name(),
                StepStatus::DryRun,
                Some(&format!("{files} file(s)")),
            );
            Ok(())
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e}", step.name()));
            ctx.log
                .record_step(step.name(), StepStatus::Failed, Some(&e.to_string()));
            Err(e)
        }
    }
}
