//! Uninstall command implementation.
use anyhow::Result;

use super::{CommandSetup, InstallOptions};
use crate::install::Action;
use crate::logging::Logger;

/// Run the uninstall command.
///
/// # Errors
///
/// Returns an error if configuration loading or any manifest step fails.
pub fn run(opts: &InstallOptions, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(opts, log)?;
    super::run_steps(&setup, Action::Uninstall, log)
}
