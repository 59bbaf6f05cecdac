//! The bundled npm package manager.
//!
//! npm ships far too many files to list by hand, so its source tree is
//! mirrored into `<libdir>/node_modules/npm`, skipping test suites. On install
//! the `bin/npm` entry point is linked to the mirrored `npm-cli.js` and the
//! script's interpreter directive is pointed at the installed runtime.
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use super::applier::Applier;
use super::fs;
use super::manifest::Entry;
use super::walk::{SourceTree, TreeFile};
use super::{Action, Context, RootKey, Roots, Rule, Step, StepResult, Target};
use crate::error::{FsOp, InstallError};

/// npm sources, relative to the build root.
pub const NPM_SOURCE: &str = "deps/npm";
/// Mirror location, relative to the library directory.
pub const NPM_TARGET: &str = "node_modules/npm";
/// Entry-point link, relative to the prefix.
pub const NPM_LINK: &str = "bin/npm";
/// Script the link points at, relative to the library directory.
pub const NPM_ENTRY_POINT: &str = "node_modules/npm/bin/npm-cli.js";
/// Configuration variable enabling the bundle.
pub const NPM_GATE: &str = "node_install_npm";

/// Interpreter directive for relocatable trees: a shell line that re-executes
/// the script with the `node` found next to it. The second line is a JS
/// comment so the runtime ignores it.
pub const PORTABLE_SHEBANG: &str =
    "/bin/sh\n// 2>/dev/null; exec \"`dirname \"$0\"`/node\" \"$0\" \"$@\"";

/// Directories never mirrored.
const EXCLUDED_DIR: &str = "test";

/// The npm bundle step.
#[derive(Debug, Clone, Copy, Default)]
pub struct NpmBundle;

impl Step for NpmBundle {
    fn name(&self) -> &str {
        "npm"
    }

    fn should_run(&self, ctx: &Context<'_>) -> bool {
        ctx.config.flag(NPM_GATE)
    }

    fn run(&self, ctx: &Context<'_>) -> Result<StepResult, InstallError> {
        let bundle = ctx.roots.root(RootKey::Libdir).join(NPM_TARGET);
        if fs::is_symlink(&bundle) {
            return Ok(StepResult::Skipped(format!(
                "{} is a symlink (development checkout)",
                bundle.display()
            )));
        }

        let applier = Applier::new(ctx);
        let mut files = applier.apply_all(&mirror_entries(ctx.build_root)?)?;
        match ctx.action {
            Action::Install => link_entry_point(ctx)?,
            Action::Uninstall => unlink_entry_point(ctx, &applier)?,
        }
        files += 1;
        Ok(StepResult::done(ctx, files))
    }
}

/// Manifest entries for every mirrored file under `build_root/deps/npm`.
///
/// # Errors
///
/// Returns [`InstallError::Filesystem`] if the source tree is missing or
/// cannot be walked.
pub fn mirror_entries(build_root: &Path) -> Result<Vec<Entry>, InstallError> {
    SourceTree::new(build_root.join(NPM_SOURCE))
        .exclude(|name: &OsStr| name == EXCLUDED_DIR)
        .files()
        .map(|file| file.map(|file| mirror_entry(&file)))
        .collect()
}

fn mirror_entry(file: &TreeFile) -> Entry {
    let dir = match file.relative.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Path::new(NPM_TARGET).join(parent),
        _ => PathBuf::from(NPM_TARGET),
    };
    Entry::new(
        Path::new(NPM_SOURCE).join(&file.relative),
        Rule::new(RootKey::Libdir, Target::Dir(dir)),
    )
}

/// The `bin/npm` link as a plain entry, for uninstall.
fn link_entry() -> Entry {
    Entry::new(NPM_LINK, Rule::new(RootKey::Prefix, Target::file(NPM_LINK)))
}

/// Interpreter the installed `npm-cli.js` should run under.
#[must_use]
pub fn shebang(roots: &Roots, portable: bool) -> String {
    if portable {
        PORTABLE_SHEBANG.to_string()
    } else {
        roots.prefix().join("bin/node").display().to_string()
    }
}

/// Replace the interpreter directive on the first line of `content`.
///
/// Returns `None` when the content does not start with `#!` or has no line
/// break after it.
#[must_use]
pub fn rewrite_shebang(content: &str, interpreter: &str) -> Option<String> {
    let (_, rest) = content.strip_prefix("#!")?.split_once('\n')?;
    Some(format!("#!{interpreter}\n{rest}"))
}

/// Create the `bin/npm` link and retarget the entry point's interpreter.
///
/// A link path that already is a symlink is left alone.
///
/// # Errors
///
/// Returns [`InstallError::Filesystem`] if the link cannot be created or the
/// entry point cannot be rewritten.
pub fn link_entry_point(ctx: &Context<'_>) -> Result<(), InstallError> {
    let link = ctx.roots.root(RootKey::Prefix).join(NPM_LINK);
    let value = ctx.roots.libdir().join(NPM_ENTRY_POINT);
    let script = ctx.roots.root(RootKey::Libdir).join(NPM_ENTRY_POINT);
    let interpreter = shebang(ctx.roots, ctx.portable);

    if ctx.dry_run {
        ctx.log.dry_run(&format!(
            "would link {} -> {}",
            link.display(),
            value.display()
        ));
        ctx.log.dry_run(&format!(
            "would update shebang of {} to {interpreter}",
            script.display()
        ));
        return Ok(());
    }

    if fs::is_symlink(&link) {
        ctx.log
            .debug(&format!("{} is already a symlink", link.display()));
    } else {
        ctx.log
            .info(&format!("linking {} -> {}", link.display(), value.display()));
        if let Some(parent) = link.parent() {
            fs::ensure_dir(parent)?;
        }
        fs::remove_existing(&link)?;
        fs::symlink(&value, &link)?;
    }

    update_shebang(ctx, &script, &interpreter)
}

/// Remove the `bin/npm` link unless it is a symlink pointing somewhere other
/// than the installed entry point.
///
/// # Errors
///
/// Returns [`InstallError::Filesystem`] if the link cannot be removed.
pub fn unlink_entry_point(ctx: &Context<'_>, applier: &Applier<'_>) -> Result<(), InstallError> {
    let entry = link_entry();
    let link = ctx.roots.root(RootKey::Prefix).join(NPM_LINK);
    if let Ok(value) = std::fs::read_link(&link) {
        let ours = ctx.roots.libdir().join(NPM_ENTRY_POINT);
        if value != ours {
            ctx.log.info(&format!(
                "keeping {} -> {} (not installed by this tree)",
                link.display(),
                value.display()
            ));
            return Ok(());
        }
    }
    applier.apply(&entry)
}

fn update_shebang(ctx: &Context<'_>, script: &Path, interpreter: &str) -> Result<(), InstallError> {
    let content = std::fs::read_to_string(script)
        .map_err(|e| InstallError::fs(FsOp::Read, script, e))?;
    match rewrite_shebang(&content, interpreter) {
        Some(updated) => {
            ctx.log.info(&format!(
                "updating shebang of {} to {interpreter}",
                script.display()
            ));
            std::fs::write(script, updated).map_err(|e| InstallError::fs(FsOp::Write, script, e))
        }
        None => {
            ctx.log
                .debug(&format!("{} has no interpreter directive", script.display()));
            Ok(())
        }
    }
}
