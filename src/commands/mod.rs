pub mod install;
pub mod scan;
pub mod uninstall;

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::config::Config;
use crate::install::{Action, Context, Roots, all_steps, execute};
use crate::logging::{Log, Logger};
use crate::platform::Platform;

/// Options shared by `install` and `uninstall`.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Build tree containing `config.gypi`; the current directory if unset.
    pub root: Option<PathBuf>,
    /// Staging directory, already filtered for emptiness.
    pub destdir: Option<PathBuf>,
    /// Preview changes without applying.
    pub dry_run: bool,
    /// Rewrite the npm entry point for a relocatable tree.
    pub portable: bool,
}

/// Shared state produced by the common command setup sequence.
///
/// Resolves the build root, loads `config.gypi` and derives the install roots
/// so that each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Directory manifest sources are relative to.
    pub build_root: PathBuf,
    /// Loaded configuration.
    pub config: Config,
    /// Resolved install roots.
    pub roots: Roots,
    /// Detected host platform.
    pub platform: Platform,
    dry_run: bool,
    portable: bool,
}

impl CommandSetup {
    /// Resolve the build root, load the configuration and derive the roots.
    ///
    /// # Errors
    ///
    /// Returns an error if the build root does not exist, `config.gypi`
    /// cannot be loaded, or a configured root is not absolute.
    pub fn init(opts: &InstallOptions, log: &dyn Log) -> Result<Self> {
        let cwd = std::env::current_dir().context("cannot determine current directory")?;
        let build_root = match &opts.root {
            Some(root) => dunce::canonicalize(root)
                .with_context(|| format!("build root {} not found", root.display()))?,
            None => cwd,
        };
        log.debug(&format!("build root: {}", build_root.display()));

        log.stage("Loading configuration");
        let config = Config::load(&build_root)?;
        // A relative destdir is taken relative to the build root, like the
        // manifest sources.
        let roots = Roots::resolve(&config, opts.destdir.as_deref(), &build_root)?;
        log.info(&format!("prefix: {}", roots.prefix().display()));
        log.info(&format!("libdir: {}", roots.libdir().display()));
        if let Some(destdir) = roots.destdir() {
            log.info(&format!("destdir: {}", destdir.display()));
        }

        Ok(Self {
            build_root,
            config,
            roots,
            platform: Platform::detect(),
            dry_run: opts.dry_run,
            portable: opts.portable,
        })
    }

    /// Borrow the setup as a step context.
    #[must_use]
    pub fn context<'a>(&'a self, action: Action, log: &'a dyn Log) -> Context<'a> {
        Context {
            config: &self.config,
            roots: &self.roots,
            build_root: &self.build_root,
            action,
            dry_run: self.dry_run,
            portable: self.portable,
            log,
        }
    }
}

/// Execute every manifest step in order, print the summary, and fail with the
/// first step error.
///
/// # Errors
///
/// Returns an error if a step failed; later steps are not run.
pub fn run_steps(setup: &CommandSetup, action: Action, log: &Logger) -> Result<()> {
    let ctx = setup.context(action, log);
    let steps = all_steps(&setup.platform);
    let result = steps
        .iter()
        .try_for_each(|step| execute(step.as_ref(), &ctx));

    log.print_summary();
    result.with_context(|| format!("{action} failed"))
}
