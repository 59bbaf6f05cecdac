//! `node-install`: apply or reverse the install manifest of a node build tree.
use anyhow::Result;
use clap::Parser;

use node_tools::cli::InstallCli;
use node_tools::commands::{self, InstallOptions};
use node_tools::install::Action;
use node_tools::logging::{self, Console, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = InstallCli::parse();
    logging::init_subscriber(args.verbose, Console::Split);

    // Validate before anything touches the filesystem.
    let action: Action = args.action().parse()?;

    let opts = InstallOptions {
        root: args.root.clone(),
        destdir: args.destdir().map(Into::into),
        dry_run: args.dry_run,
        portable: std::env::var_os("PORTABLE").is_some_and(|v| !v.is_empty()),
    };
    let log = Logger::new();

    match action {
        Action::Install => commands::install::run(&opts, &log),
        Action::Uninstall => commands::uninstall::run(&opts, &log),
    }
}
