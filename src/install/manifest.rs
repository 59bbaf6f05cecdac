//! The static manifest groups.
use std::path::PathBuf;

use super::applier::Applier;
use super::{Context, RootKey, Rule, Step, StepResult, Target};
use crate::error::InstallError;
use crate::platform::Platform;

/// One manifest line: a source path relative to the build root and the rule
/// that places it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Path relative to the build root.
    pub source: PathBuf,
    /// Destination rule.
    pub rule: Rule,
}

impl Entry {
    /// Create an entry.
    pub fn new(source: impl Into<PathBuf>, rule: Rule) -> Self {
        Self {
            source: source.into(),
            rule,
        }
    }
}

/// A fixed list of entries applied as a unit, optionally gated by a
/// configuration flag.
#[derive(Debug, Clone)]
pub struct FileGroup {
    name: &'static str,
    gate: Option<&'static str>,
    entries: Vec<Entry>,
}

impl FileGroup {
    const fn new(name: &'static str, entries: Vec<Entry>) -> Self {
        Self {
            name,
            gate: None,
            entries,
        }
    }

    const fn gated(mut self, variable: &'static str) -> Self {
        self.gate = Some(variable);
        self
    }

    /// The configuration variable that enables the group, if any.
    #[must_use]
    pub const fn gate(&self) -> Option<&'static str> {
        self.gate
    }

    /// Entries in application order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

impl Step for FileGroup {
    fn name(&self) -> &str {
        self.name
    }

    fn should_run(&self, ctx: &Context<'_>) -> bool {
        self.gate.is_none_or(|variable| ctx.config.flag(variable))
    }

    fn run(&self, ctx: &Context<'_>) -> Result<StepResult, InstallError> {
        let files = Applier::new(ctx).apply_all(&self.entries)?;
        Ok(StepResult::done(ctx, files))
    }
}

fn into_dir(root: RootKey, dir: &str, sources: &[&str]) -> Vec<Entry> {
    sources
        .iter()
        .map(|source| Entry::new(*source, Rule::new(root, Target::dir(dir))))
        .collect()
}

/// Public headers for addon authors.
#[must_use]
pub fn headers() -> FileGroup {
    FileGroup::new(
        "headers",
        into_dir(
            RootKey::Prefix,
            "include/node",
            &[
                "deps/uv/include/ares.h",
                "deps/uv/include/ares_version.h",
                "deps/uv/include/uv.h",
                "deps/v8/include/v8-debug.h",
                "deps/v8/include/v8-preparser.h",
                "deps/v8/include/v8-profiler.h",
                "deps/v8/include/v8-testing.h",
                "deps/v8/include/v8.h",
                "deps/v8/include/v8stdint.h",
                "src/eio-emul.h",
                "src/ev-emul.h",
                "src/node.h",
                "src/node_buffer.h",
                "src/node_object_wrap.h",
                "src/node_version.h",
            ],
        ),
    )
}

/// Private libuv headers included by `uv.h`.
#[must_use]
pub fn uv_private_headers() -> FileGroup {
    FileGroup::new(
        "uv-private",
        into_dir(
            RootKey::Prefix,
            "include/node/uv-private",
            &[
                "deps/uv/include/uv-private/eio.h",
                "deps/uv/include/uv-private/ev.h",
                "deps/uv/include/uv-private/ngx-queue.h",
                "deps/uv/include/uv-private/tree.h",
                "deps/uv/include/uv-private/uv-unix.h",
                "deps/uv/include/uv-private/uv-win.h",
            ],
        ),
    )
}

/// The runtime binary.
#[must_use]
pub fn binary() -> FileGroup {
    FileGroup::new(
        "binary",
        vec![Entry::new(
            "out/Release/node",
            Rule::new(RootKey::Prefix, Target::file("bin/node")),
        )],
    )
}

/// DTrace provider script, installed on every platform since support cannot
/// be probed when cross-compiling.
#[must_use]
pub fn dtrace() -> FileGroup {
    FileGroup::new(
        "dtrace",
        into_dir(RootKey::Libdir, "dtrace", &["src/node.d"]),
    )
}

/// Manual page, placed where the platform's `man` looks for it.
#[must_use]
pub fn manpage(platform: &Platform) -> FileGroup {
    FileGroup::new(
        "manpage",
        into_dir(RootKey::Prefix, platform.man_dir(), &["doc/node.1"]),
    )
}

/// The waf build tool used by legacy addons.
#[must_use]
pub fn waf() -> FileGroup {
    let mut entries = vec![Entry::new(
        "tools/node-waf",
        Rule::new(RootKey::Prefix, Target::file("bin/node-waf")),
    )];
    entries.extend(into_dir(
        RootKey::Libdir,
        "node/wafadmin",
        &[
            "tools/wafadmin/ansiterm.py",
            "tools/wafadmin/Build.py",
            "tools/wafadmin/Configure.py",
            "tools/wafadmin/Constants.py",
            "tools/wafadmin/Environment.py",
            "tools/wafadmin/__init__.py",
            "tools/wafadmin/Logs.py",
            "tools/wafadmin/Node.py",
            "tools/wafadmin/Options.py",
            "tools/wafadmin/pproc.py",
            "tools/wafadmin/py3kfixes.py",
            "tools/wafadmin/Runner.py",
            "tools/wafadmin/Scripting.py",
            "tools/wafadmin/TaskGen.py",
            "tools/wafadmin/Task.py",
            "tools/wafadmin/Utils.py",
        ],
    ));
    entries.extend(into_dir(
        RootKey::Libdir,
        "node/wafadmin/Tools",
        &[
            "tools/wafadmin/Tools/ar.py",
            "tools/wafadmin/Tools/cc.py",
            "tools/wafadmin/Tools/ccroot.py",
            "tools/wafadmin/Tools/compiler_cc.py",
            "tools/wafadmin/Tools/compiler_cxx.py",
            "tools/wafadmin/Tools/compiler_d.py",
            "tools/wafadmin/Tools/config_c.py",
            "tools/wafadmin/Tools/cxx.py",
            "tools/wafadmin/Tools/dmd.py",
            "tools/wafadmin/Tools/d.py",
            "tools/wafadmin/Tools/gas.py",
            "tools/wafadmin/Tools/gcc.py",
            "tools/wafadmin/Tools/gdc.py",
            "tools/wafadmin/Tools/gnu_dirs.py",
            "tools/wafadmin/Tools/gob2.py",
            "tools/wafadmin/Tools/gxx.py",
            "tools/wafadmin/Tools/icc.py",
            "tools/wafadmin/Tools/icpc.py",
            "tools/wafadmin/Tools/__init__.py",
            "tools/wafadmin/Tools/intltool.py",
            "tools/wafadmin/Tools/libtool.py",
            "tools/wafadmin/Tools/misc.py",
            "tools/wafadmin/Tools/nasm.py",
            "tools/wafadmin/Tools/node_addon.py",
            "tools/wafadmin/Tools/osx.py",
            "tools/wafadmin/Tools/preproc.py",
            "tools/wafadmin/Tools/python.py",
            "tools/wafadmin/Tools/suncc.py",
            "tools/wafadmin/Tools/suncxx.py",
            "tools/wafadmin/Tools/unittestw.py",
            "tools/wafadmin/Tools/winres.py",
            "tools/wafadmin/Tools/xlc.py",
            "tools/wafadmin/Tools/xlcxx.py",
        ],
    ));
    FileGroup::new("waf", entries).gated("node_install_waf")
}
