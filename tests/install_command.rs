#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `install` command.
//!
//! These tests run the full manifest against a staged build tree and check
//! file placement, idempotence, bundle gating, the npm entry point and the
//! dry-run and bad-command guarantees.

mod common;

use std::path::Path;
use std::process::Command;

use common::{BuildTreeBuilder, NPM_CLI};
use node_tools::commands::InstallOptions;
use node_tools::install;
use node_tools::logging::StepStatus;
use node_tools::platform::Platform;

// ---------------------------------------------------------------------------
// Snapshot: manifest step list
// ---------------------------------------------------------------------------

/// Snapshot of all manifest step names in application order.
///
/// Any addition, removal, or rename of a step will cause it to fail,
/// prompting a deliberate snapshot update.
#[test]
fn install_step_names() {
    let steps = install::all_steps(&Platform::detect());
    let names: Vec<&str> = steps.iter().map(|s| s.name()).collect();
    insta::assert_snapshot!("install_step_names", names.join("\n"));
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

#[test]
fn install_places_files_under_destdir() {
    let tree = BuildTreeBuilder::new().build();
    tree.install().unwrap();

    assert_eq!(
        std::fs::read_to_string(tree.staged("/usr/local/bin/node")).unwrap(),
        "out/Release/node"
    );
    assert!(tree.staged("/usr/local/include/node/node.h").is_file());
    assert!(tree.staged("/usr/local/include/node/v8.h").is_file());
    assert!(tree.staged("/usr/local/include/node/uv-private/ngx-queue.h").is_file());
    assert!(tree.staged("/usr/local/lib/dtrace/node.d").is_file());

    let man = Path::new("/usr/local")
        .join(Platform::detect().man_dir())
        .join("node.1");
    assert!(tree.staged(&man.to_string_lossy()).is_file());
}

#[test]
fn every_staged_file_lives_under_destdir_prefix() {
    let tree = BuildTreeBuilder::new().with_bundles().build();
    tree.install().unwrap();

    let listing = tree.stage_listing();
    assert!(!listing.is_empty());
    for path in listing.keys() {
        assert!(
            path == "usr" || path == "usr/local" || path.starts_with("usr/local/"),
            "unexpected staged path {path}"
        );
    }
}

#[test]
fn custom_prefix_and_libdir_are_honoured() {
    let tree = BuildTreeBuilder::new()
        .with_variable("node_prefix", "/opt/node")
        .with_variable("node_libdir", "/opt/node/lib64")
        .build();
    tree.install().unwrap();

    assert!(tree.staged("/opt/node/bin/node").is_file());
    assert!(tree.staged("/opt/node/lib64/dtrace/node.d").is_file());
    assert!(!tree.staged("/usr/local").exists());
}

#[test]
fn install_twice_is_idempotent() {
    let tree = BuildTreeBuilder::new().with_bundles().build();
    tree.install().unwrap();
    let first = tree.stage_listing();

    tree.install().unwrap();
    assert_eq!(tree.stage_listing(), first);
}

#[test]
fn summary_counts_files_per_step() {
    let tree = BuildTreeBuilder::new().build();
    let log = tree.install().unwrap();

    let steps = log.step_entries();
    let headers = steps.iter().find(|s| s.name == "headers").unwrap();
    assert_eq!(headers.status, StepStatus::Ok);
    assert_eq!(headers.message.as_deref(), Some("15 file(s)"));
    let waf = steps.iter().find(|s| s.name == "waf").unwrap();
    assert_eq!(waf.status, StepStatus::NotApplicable);
}

// ---------------------------------------------------------------------------
// Bundle gating
// ---------------------------------------------------------------------------

#[test]
fn bundles_are_skipped_unless_enabled() {
    let tree = BuildTreeBuilder::new()
        .with_variable("node_install_waf", "false")
        .build();
    tree.install().unwrap();

    assert!(!tree.staged("/usr/local/bin/node-waf").exists());
    assert!(!tree.staged("/usr/local/lib/node").exists());
    assert!(!tree.staged("/usr/local/lib/node_modules").exists());
    assert!(!tree.staged("/usr/local/bin/npm").exists());
}

#[test]
fn waf_installs_tool_tree() {
    let tree = BuildTreeBuilder::new()
        .with_variable("node_install_waf", "true")
        .build();
    tree.install().unwrap();

    assert!(tree.staged("/usr/local/bin/node-waf").is_file());
    assert!(tree.staged("/usr/local/lib/node/wafadmin/Build.py").is_file());
    assert!(tree.staged("/usr/local/lib/node/wafadmin/Tools/node_addon.py").is_file());
}

// ---------------------------------------------------------------------------
// npm
// ---------------------------------------------------------------------------

#[test]
fn npm_tree_is_mirrored_without_tests() {
    let tree = BuildTreeBuilder::new().with_bundles().build();
    tree.install().unwrap();

    let npm = tree.staged("/usr/local/lib/node_modules/npm");
    assert!(npm.join("package.json").is_file());
    assert!(npm.join("lib/npm.js").is_file());
    assert!(npm.join("node_modules/nopt/lib/nopt.js").is_file());
    assert!(!npm.join("test").exists());
    assert!(!npm.join("node_modules/nopt/test").exists());
}

#[cfg(unix)]
#[test]
fn npm_link_points_at_runtime_location() {
    let tree = BuildTreeBuilder::new().with_bundles().build();
    tree.install().unwrap();

    let link = tree.staged("/usr/local/bin/npm");
    assert_eq!(
        std::fs::read_link(link).unwrap(),
        Path::new("/usr/local/lib/node_modules/npm/bin/npm-cli.js")
    );
}

#[test]
fn npm_shebang_points_at_installed_node() {
    let tree = BuildTreeBuilder::new().with_bundles().build();
    tree.install().unwrap();

    let script =
        std::fs::read_to_string(tree.staged("/usr/local/lib/node_modules/npm/bin/npm-cli.js"))
            .unwrap();
    let (_, body) = NPM_CLI.split_once('\n').unwrap();
    assert_eq!(script, format!("#!/usr/local/bin/node\n{body}"));
}

#[test]
fn portable_shebang_execs_sibling_node() {
    let tree = BuildTreeBuilder::new().with_bundles().portable().build();
    tree.install().unwrap();

    let script =
        std::fs::read_to_string(tree.staged("/usr/local/lib/node_modules/npm/bin/npm-cli.js"))
            .unwrap();
    assert!(
        script.starts_with("#!/bin/sh\n// 2>/dev/null; exec \"`dirname \"$0\"`/node\" \"$0\" \"$@\"\n"),
        "{script}"
    );
    assert!(script.ends_with("require('../lib/npm.js') })()\n"));
}

#[cfg(unix)]
#[test]
fn npm_symlinked_bundle_is_left_alone() {
    let tree = BuildTreeBuilder::new().with_bundles().build();
    let dev_checkout = tree.dir.path().join("npm-dev");
    std::fs::create_dir_all(&dev_checkout).unwrap();
    let bundle = tree.staged("/usr/local/lib/node_modules/npm");
    std::fs::create_dir_all(bundle.parent().unwrap()).unwrap();
    std::os::unix::fs::symlink(&dev_checkout, &bundle).unwrap();

    let log = tree.install().unwrap();

    assert!(!tree.staged("/usr/local/bin/npm").exists());
    assert_eq!(std::fs::read_dir(&dev_checkout).unwrap().count(), 0);
    let npm = log.step_entries().into_iter().find(|s| s.name == "npm").unwrap();
    assert_eq!(npm.status, StepStatus::Skipped);
}

#[cfg(unix)]
#[test]
fn npm_symlinked_directory_is_not_mirrored() {
    let tree = BuildTreeBuilder::new().with_bundles().build();
    std::os::unix::fs::symlink("lib", tree.root().join("deps/npm/libalias")).unwrap();

    tree.install().unwrap();

    let npm = tree.staged("/usr/local/lib/node_modules/npm");
    assert!(npm.join("lib/npm.js").is_file());
    assert!(npm.join("libalias").symlink_metadata().is_err());
}

#[test]
fn missing_npm_sources_fail_the_run() {
    let tree = BuildTreeBuilder::new()
        .with_bundles()
        .without_npm_tree()
        .build();
    let err = tree.install().unwrap_err();
    assert!(format!("{err:#}").contains("deps/npm"), "{err:#}");
}

// ---------------------------------------------------------------------------
// Guarantees
// ---------------------------------------------------------------------------

#[test]
fn dry_run_changes_nothing() {
    let tree = BuildTreeBuilder::new().with_bundles().build();
    let opts = InstallOptions {
        dry_run: true,
        ..tree.options()
    };
    let log = tree.install_with(&opts).unwrap();

    assert!(!tree.stage().exists());
    assert!(
        log.step_entries()
            .iter()
            .all(|s| matches!(s.status, StepStatus::DryRun | StepStatus::NotApplicable))
    );
}

#[test]
fn missing_config_is_reported() {
    let tree = BuildTreeBuilder::new().build();
    std::fs::remove_file(tree.root().join("config.gypi")).unwrap();

    let err = tree.install().unwrap_err();
    assert!(format!("{err:#}").contains("config.gypi"), "{err:#}");
    assert!(!tree.stage().exists());
}

#[test]
fn relative_prefix_is_rejected() {
    let tree = BuildTreeBuilder::new()
        .with_variable("node_prefix", "usr/local")
        .build();
    let err = tree.install().unwrap_err();
    assert!(format!("{err:#}").contains("node_prefix"), "{err:#}");
    assert!(!tree.stage().exists());
}

#[test]
fn bad_command_fails_before_touching_disk() {
    let tree = BuildTreeBuilder::new().build();
    let output = Command::new(env!("CARGO_BIN_EXE_node-install"))
        .arg("frobnicate")
        .arg(tree.stage())
        .arg("--root")
        .arg(tree.root())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Bad command: frobnicate"), "{stderr}");
    assert!(!tree.stage().exists());
}
