//! Per-entry install and uninstall.
use super::Context;
use super::fs;
use super::manifest::Entry;
use crate::error::InstallError;
use crate::install::Action;

/// Applies the run's [`Action`] to manifest entries.
#[derive(Debug, Clone, Copy)]
pub struct Applier<'a> {
    ctx: Context<'a>,
}

impl<'a> Applier<'a> {
    /// Create an applier for one run.
    #[must_use]
    pub const fn new(ctx: &Context<'a>) -> Self {
        Self { ctx: *ctx }
    }

    /// Apply the action to every entry in order, returning how many were
    /// processed.
    ///
    /// # Errors
    ///
    /// Stops at the first entry that fails.
    pub fn apply_all(&self, entries: &[Entry]) -> Result<usize, InstallError> {
        for entry in entries {
            self.apply(entry)?;
        }
        Ok(entries.len())
    }

    /// Apply the action to a single entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination is unsafe or a filesystem
    /// operation fails for a reason other than the tolerated ones.
    pub fn apply(&self, entry: &Entry) -> Result<(), InstallError> {
        match self.ctx.action {
            Action::Install => self.install(entry),
            Action::Uninstall => self.uninstall(entry),
        }
    }

    fn install(&self, entry: &Entry) -> Result<(), InstallError> {
        let dest = self.ctx.roots.locate(&entry.source, &entry.rule)?;
        if self.ctx.dry_run {
            self.ctx
                .log
                .dry_run(&format!("would install {}", dest.display()));
            return Ok(());
        }

        self.ctx.log.info(&format!("installing {}", dest.display()));
        if let Some(parent) = dest.parent() {
            fs::ensure_dir(parent)?;
        }
        fs::remove_existing(&dest)?;
        fs::copy_with_metadata(&self.ctx.build_root.join(&entry.source), &dest)
    }

    fn uninstall(&self, entry: &Entry) -> Result<(), InstallError> {
        let dest = self.ctx.roots.locate(&entry.source, &entry.rule)?;
        if self.ctx.dry_run {
            self.ctx
                .log
                .dry_run(&format!("would remove {}", dest.display()));
            return Ok(());
        }

        self.ctx.log.info(&format!(
            "removing {} from {}",
            entry.source.display(),
            dest.display()
        ));
        if !fs::remove_existing(&dest)? {
            self.ctx
                .log
                .debug(&format!("already absent: {}", dest.display()));
        }
        if let Some(parent) = dest.parent() {
            let boundary = self.ctx.roots.root(entry.rule.root);
            let removed = fs::remove_empty_dirs(parent, &boundary)?;
            if removed > 0 {
                self.ctx
                    .log
                    .debug(&format!("pruned {removed} empty director(ies)"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::install::{RootKey, Roots, Rule, Target};
    use crate::logging::Logger;
    use std::path::Path;

    struct Scratch {
        dir: tempfile::TempDir,
        config: Config,
        roots: Roots,
        log: Logger,
    }

    impl Scratch {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let build = dir.path().join("build");
            std::fs::create_dir_all(build.join("src")).unwrap();
            std::fs::write(build.join("src/node.h"), "// node.h\n").unwrap();
            let roots = Roots::new(
                "/usr/local",
                "/usr/local/lib",
                Some(dir.path().join("stage")),
            )
            .unwrap();
            std::fs::create_dir_all(roots.root(RootKey::Prefix)).unwrap();
            Self {
                dir,
                config: Config::default(),
                roots,
                log: Logger::new(),
            }
        }

        fn build_root(&self) -> std::path::PathBuf {
            self.dir.path().join("build")
        }

        fn run(&self, action: Action, dry_run: bool, entry: &Entry) -> Result<(), InstallError> {
            let build_root = self.build_root();
            let ctx = Context {
                config: &self.config,
                roots: &self.roots,
                build_root: &build_root,
                action,
                dry_run,
                portable: false,
                log: &self.log,
            };
            Applier::new(&ctx).apply(entry)
        }

        fn staged(&self, rel: &str) -> std::path::PathBuf {
            self.roots.root(RootKey::Prefix).join(rel)
        }
    }

    fn header() -> Entry {
        Entry::new(
            "src/node.h",
            Rule::new(RootKey::Prefix, Target::dir("include/node")),
        )
    }

    #[test]
    fn install_copies_into_directory_target() {
        let s = Scratch::new();
        s.run(Action::Install, false, &header()).unwrap();
        let dest = s.staged("include/node/node.h");
        assert_eq!(std::fs::read_to_string(dest).unwrap(), "// node.h\n");
    }

    #[test]
    fn install_twice_is_idempotent() {
        let s = Scratch::new();
        s.run(Action::Install, false, &header()).unwrap();
        s.run(Action::Install, false, &header()).unwrap();
        assert!(s.staged("include/node/node.h").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn install_replaces_existing_symlink() {
        let s = Scratch::new();
        let dest = s.staged("include/node/node.h");
        std::fs::create_dir_all(dest.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink("/nonexistent", &dest).unwrap();

        s.run(Action::Install, false, &header()).unwrap();
        assert!(!fs::is_symlink(&dest));
        assert!(dest.is_file());
    }

    #[test]
    fn install_missing_source_fails() {
        let s = Scratch::new();
        let entry = Entry::new(
            "out/Release/node",
            Rule::new(RootKey::Prefix, Target::file("bin/node")),
        );
        let err = s.run(Action::Install, false, &entry).unwrap_err();
        assert!(matches!(err, InstallError::Filesystem { .. }), "{err}");
    }

    #[test]
    fn dry_run_install_touches_nothing() {
        let s = Scratch::new();
        s.run(Action::Install, true, &header()).unwrap();
        assert!(!s.staged("include").exists());
    }

    #[test]
    fn uninstall_removes_file_and_empty_parents() {
        let s = Scratch::new();
        s.run(Action::Install, false, &header()).unwrap();
        s.run(Action::Uninstall, false, &header()).unwrap();
        assert!(!s.staged("include").exists());
        assert!(s.roots.root(RootKey::Prefix).is_dir());
    }

    #[test]
    fn uninstall_keeps_non_empty_parent() {
        let s = Scratch::new();
        s.run(Action::Install, false, &header()).unwrap();
        std::fs::write(s.staged("include/node/other.h"), "").unwrap();

        s.run(Action::Uninstall, false, &header()).unwrap();
        assert!(!s.staged("include/node/node.h").exists());
        assert!(s.staged("include/node/other.h").is_file());
    }

    #[test]
    fn uninstall_of_absent_entry_succeeds() {
        let s = Scratch::new();
        s.run(Action::Uninstall, false, &header()).unwrap();
    }

    #[test]
    fn unsafe_target_is_rejected_before_touching_disk() {
        let s = Scratch::new();
        let entry = Entry::new(
            "src/node.h",
            Rule::new(RootKey::Prefix, Target::dir("../../escape")),
        );
        let err = s.run(Action::Install, false, &entry).unwrap_err();
        assert!(matches!(err, InstallError::UnsafeTarget { .. }));
        assert!(!Path::new(&s.dir.path().join("escape")).exists());
    }
}
