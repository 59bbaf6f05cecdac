//! Build-tree tooling for the node runtime.
//!
//! Two independent tools share this crate's ambient stack (errors, logging,
//! command-line conventions):
//!
//! - **[`install`]**: applies or reverses the static install manifest under
//!   roots derived from the generated `config.gypi`
//! - **[`scan`]**: preprocesses the bundled OpenSSL headers and lists the
//!   functions they declare
//!
//! Supporting layers:
//!
//! - **[`config`]**: `config.gypi` loading
//! - **[`commands`]**: top-level orchestration for each binary
//! - **[`logging`]**: `tracing`-based console output and run summary
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod install;
pub mod logging;
pub mod platform;
pub mod scan;

/// Version reported by both binaries: the release tag or `git describe`
/// output when available, the package version otherwise.
pub const VERSION: &str = match option_env!("NODE_TOOLS_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
