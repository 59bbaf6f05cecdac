//! `openssl-scan`: list the functions declared by the bundled OpenSSL headers.
use anyhow::Result;
use clap::Parser;

use node_tools::cli::ScanCli;
use node_tools::commands::scan::{self, ScanOptions};
use node_tools::logging::{self, Console, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = ScanCli::parse();
    // stdout carries only the function names.
    logging::init_subscriber(args.verbose, Console::Stderr);

    let opts = ScanOptions {
        root: args.root,
        cpp: args.cpp,
        dump: args.dump,
    };
    scan::run(&opts, &Logger::new())
}
