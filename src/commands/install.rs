use anyhow::Result;

use super::{CommandSetup, InstallOptions};
use crate::install::Action;
use crate::logging::Logger;

/// Run the install command.
///
/// # Errors
///
/// Returns an error if configuration loading or any manifest step fails.
pub fn run(opts: &InstallOptions, log: &Logger) -> Result<()> {
    log.info(&format!("node-install {}", crate::VERSION));
    let setup = CommandSetup::init(opts, log)?;
    super::run_steps(&setup, Action::Install, log)
}
