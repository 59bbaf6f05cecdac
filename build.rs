//! Stamps both binaries with a version string.
//!
//! `NODE_TOOLS_VERSION` from the environment wins (release builds set it);
//! otherwise the output of `git describe` is used when the source tree is a
//! checkout. With neither, the crate falls back to `CARGO_PKG_VERSION`.
use std::process::Command;

const VERSION_VAR: &str = "NODE_TOOLS_VERSION";

fn git_describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let version = String::from_utf8(output.stdout).ok()?;
    let version = version.trim();
    (!version.is_empty()).then(|| version.to_string())
}

fn main() {
    let version = std::env::var(VERSION_VAR).ok().or_else(git_describe);
    if let Some(version) = version {
        println!("cargo:rustc-env={VERSION_VAR}={version}");
    }

    println!("cargo:rerun-if-env-changed={VERSION_VAR}");
    for path in [".git/HEAD", ".git/refs/tags"] {
        println!("cargo:rerun-if-changed={path}");
    }
}
