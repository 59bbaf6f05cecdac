// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed build tree containing every manifest
// source and a staging directory, plus a fluent builder so each integration
// test can tune `config.gypi` without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use node_tools::commands::{self, InstallOptions};
use node_tools::install::manifest;
use node_tools::logging::Logger;
use node_tools::platform::Platform;

/// Contents of the bundled npm entry point before installation.
pub const NPM_CLI: &str = "#!/usr/bin/env node\n;(function () { require('../lib/npm.js') })()\n";

/// Write a placeholder for every fixed manifest source under `build`.
pub fn write_manifest_sources(build: &Path) {
    let groups = [
        manifest::headers(),
        manifest::uv_private_headers(),
        manifest::binary(),
        manifest::dtrace(),
        manifest::manpage(&Platform::detect()),
        manifest::waf(),
    ];
    for group in &groups {
        for entry in group.entries() {
            let path = build.join(&entry.source);
            std::fs::create_dir_all(path.parent().expect("source parent"))
                .expect("create source dir");
            std::fs::write(&path, entry.source.to_string_lossy().as_bytes())
                .expect("write source file");
        }
    }
}

/// Write a small npm source tree under `build/deps/npm`, including a test
/// suite that must not be mirrored.
pub fn write_npm_tree(build: &Path) {
    let npm = build.join("deps/npm");
    for (rel, content) in [
        ("package.json", "{ \"name\": \"npm\" }\n"),
        ("bin/npm-cli.js", NPM_CLI),
        ("lib/npm.js", "module.exports = {}\n"),
        ("node_modules/nopt/lib/nopt.js", "module.exports = {}\n"),
        ("node_modules/nopt/test/basic.js", "// test\n"),
        ("test/tap/install.js", "// test\n"),
    ] {
        let path = npm.join(rel);
        std::fs::create_dir_all(path.parent().expect("npm parent")).expect("create npm dir");
        std::fs::write(path, content).expect("write npm file");
    }
}

/// An isolated build tree and staging directory backed by a
/// [`tempfile::TempDir`].
pub struct BuildTree {
    /// Temporary directory holding `build/` and `stage/`.
    pub dir: tempfile::TempDir,
    portable: bool,
}

impl BuildTree {
    /// The build root (contains `config.gypi`).
    pub fn root(&self) -> PathBuf {
        self.dir.path().join("build")
    }

    /// The staging directory passed as destdir.
    pub fn stage(&self) -> PathBuf {
        self.dir.path().join("stage")
    }

    /// On-disk location of an absolute runtime path.
    pub fn staged(&self, path: &str) -> PathBuf {
        self.stage().join(path.trim_start_matches('/'))
    }

    /// Create the staged prefix and libdir, as they exist on a real system.
    pub fn create_roots(&self) {
        std::fs::create_dir_all(self.staged("/usr/local/lib")).expect("create roots");
    }

    /// Staged run options.
    pub fn options(&self) -> InstallOptions {
        InstallOptions {
            root: Some(self.root()),
            destdir: Some(self.stage()),
            dry_run: false,
            portable: self.portable,
        }
    }

    /// Run `install`, returning the logger for summary inspection.
    pub fn install(&self) -> anyhow::Result<Logger> {
        self.install_with(&self.options())
    }

    /// Run `install` with explicit options.
    pub fn install_with(&self, opts: &InstallOptions) -> anyhow::Result<Logger> {
        let log = Logger::new();
        commands::install::run(opts, &log)?;
        Ok(log)
    }

    /// Run `uninstall`, returning the logger for summary inspection.
    pub fn uninstall(&self) -> anyhow::Result<Logger> {
        let log = Logger::new();
        commands::uninstall::run(&self.options(), &log)?;
        Ok(log)
    }

    /// Every entry under the staging directory, keyed by relative path:
    /// file contents, `<dir>`, or `-> target` for symlinks.
    pub fn stage_listing(&self) -> BTreeMap<String, String> {
        let stage = self.stage();
        if !stage.exists() {
            return BTreeMap::new();
        }
        walkdir::WalkDir::new(&stage)
            .min_depth(1)
            .into_iter()
            .map(|entry| {
                let entry = entry.expect("walk stage");
                let rel = entry
                    .path()
                    .strip_prefix(&stage)
                    .expect("relative")
                    .to_string_lossy()
                    .replace('\\', "/");
                let value = if entry.path_is_symlink() {
                    let target = std::fs::read_link(entry.path()).expect("read link");
                    format!("-> {}", target.display())
                } else if entry.file_type().is_dir() {
                    "<dir>".to_string()
                } else {
                    std::fs::read_to_string(entry.path()).expect("read staged file")
                };
                (rel, value)
            })
            .collect()
    }
}

/// Fluent builder for [`BuildTree`].
pub struct BuildTreeBuilder {
    variables: Vec<(String, String)>,
    npm: bool,
    portable: bool,
}

impl BuildTreeBuilder {
    /// Begin building a tree with an empty variable set.
    pub fn new() -> Self {
        Self {
            variables: Vec::new(),
            npm: true,
            portable: false,
        }
    }

    /// Add a string variable to `config.gypi`.
    pub fn with_variable(mut self, key: &str, value: &str) -> Self {
        self.variables.push((key.to_string(), value.to_string()));
        self
    }

    /// Enable the waf and npm groups.
    pub fn with_bundles(self) -> Self {
        self.with_variable("node_install_waf", "true")
            .with_variable("node_install_npm", "true")
    }

    /// Leave `deps/npm` out of the build tree.
    pub fn without_npm_tree(mut self) -> Self {
        self.npm = false;
        self
    }

    /// Request the relocatable npm shebang.
    pub fn portable(mut self) -> Self {
        self.portable = true;
        self
    }

    /// Write the build tree and return it.
    pub fn build(self) -> BuildTree {
        let dir = tempfile::tempdir().expect("create temp dir");
        let build = dir.path().join("build");
        write_manifest_sources(&build);
        if self.npm {
            write_npm_tree(&build);
        }

        let variables: Vec<String> = self
            .variables
            .iter()
            .map(|(k, v)| format!("    '{k}': '{v}'"))
            .collect();
        let gypi = format!(
            "# Do not edit. Generated by the configure script.\n\
             {{ 'target_defaults': {{ 'cflags': [], 'defines': [] }},\n  \
             'variables': {{\n{}\n  }}\n}}\n",
            variables.join(",\n")
        );
        std::fs::write(build.join("config.gypi"), gypi).expect("write config.gypi");

        BuildTree {
            dir,
            portable: self.portable,
        }
    }
}
