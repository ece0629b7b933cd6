//! Executable-relative install paths and the runtime-library environment hint.
//!
//! DS9 ships as a relocatable bundle: the Tcl runtime library and the startup script sit
//! at fixed offsets from the binary. Everything here is derived from argv[0] alone, so it
//! works when the binary is started through a relative path, a symlink, or from any
//! working directory, and it must all be settled before an interpreter is created.

use crate::config::env_keys::runtime;
use crate::config::set_env_var;
use crate::slot::ProcessSlot;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Errors from install-path resolution.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("cannot resolve install path {}: {source}", path.display())]
    Unresolved {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("environment hint {key} was already applied in this process")]
    HintAlreadyApplied { key: String },

    #[error("install was already prepared in this process")]
    AlreadyPrepared,
}

/// What to do when a path cannot be canonicalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Warn and fall back to a lexically normalized absolute path.
    Lenient,
    /// Treat the failure as fatal.
    Strict,
}

/// Fixed offsets from the executable directory, plus the variable the interpreter reads
/// to find its library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallLayout {
    pub library_var: &'static str,
    pub runtime_library: &'static str,
    pub startup_script: &'static str,
}

impl InstallLayout {
    /// `bin/ds9` next to `lib/ds9/`.
    pub const DS9: Self = Self {
        library_var: runtime::TCL_LIBRARY,
        runtime_library: "../lib/ds9/tcl8.6",
        startup_script: "../lib/ds9/library/ds9.tcl",
    };
}

/// Absolute install locations, computed once from argv[0].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPaths {
    /// The running binary: argv[0] made absolute (not canonicalized: a symlinked binary
    /// keeps its link name). The host may replace it with the path it discovered.
    pub executable: PathBuf,
    pub executable_dir: PathBuf,
    pub runtime_library_dir: PathBuf,
    pub startup_script: PathBuf,
}

impl InstallPaths {
    pub fn resolve(
        argv0: impl AsRef<OsStr>,
        layout: &InstallLayout,
        policy: FallbackPolicy,
    ) -> Result<Self, InstallError> {
        let invocation = Path::new(argv0.as_ref());
        let executable_dir = executable_dir(invocation);
        let runtime_library_dir =
            canonical_or_lexical(&executable_dir.join(layout.runtime_library), policy)?;
        let startup_script =
            canonical_or_lexical(&executable_dir.join(layout.startup_script), policy)?;

        let paths = Self {
            executable: lexical_absolute(invocation),
            executable_dir: lexical_absolute(&executable_dir),
            runtime_library_dir,
            startup_script,
        };
        tracing::debug!(
            executable = %paths.executable.display(),
            runtime_library = %paths.runtime_library_dir.display(),
            startup_script = %paths.startup_script.display(),
            "Resolved install paths"
        );
        Ok(paths)
    }
}

/// Directory part of an invocation path; no separator means the current directory.
pub fn executable_dir(invocation: &Path) -> PathBuf {
    match invocation.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn canonical_or_lexical(path: &Path, policy: FallbackPolicy) -> Result<PathBuf, InstallError> {
    match fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        Err(source) if policy == FallbackPolicy::Strict => Err(InstallError::Unresolved {
            path: path.to_path_buf(),
            source,
        }),
        Err(err) => {
            let fallback = lexical_absolute(path);
            tracing::warn!(
                path = %path.display(),
                fallback = %fallback.display(),
                error = %err,
                "Install path does not resolve; continuing with the unverified path"
            );
            Ok(fallback)
        }
    }
}

/// Absolute path with `.` and `..` folded, without touching the filesystem.
///
/// Relative input is anchored at the current directory; if even that is unavailable the
/// path is only [`normalize`]d.
pub fn lexical_absolute(path: &Path) -> PathBuf {
    let anchored = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    normalize(&anchored)
}

/// Fold `.` and `..` lexically. `..` only cancels a preceding name: at the root it is
/// dropped, and leading `..` of a relative path are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let last = out.components().next_back();
                let follows_name = matches!(last, Some(Component::Normal(_)));
                let at_root = matches!(last, Some(Component::RootDir | Component::Prefix(_)));
                if follows_name {
                    out.pop();
                } else if !at_root {
                    out.push("..");
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// The `KEY=value` entry telling the interpreter where its runtime library lives.
///
/// The interpreter looks the variable up once, during its own initialization, so the
/// hint only has an effect when installed before the interpreter is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentHint {
    key: &'static str,
    value: PathBuf,
}

impl EnvironmentHint {
    pub fn new(key: &'static str, value: impl Into<PathBuf>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }

    pub fn for_install(layout: &InstallLayout, paths: &InstallPaths) -> Self {
        Self::new(layout.library_var, paths.runtime_library_dir.clone())
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn value(&self) -> &Path {
        &self.value
    }

    /// `NAME=absolute_path`, as it appears in the environment table.
    pub fn entry(&self) -> OsString {
        let mut entry = OsString::from(self.key);
        entry.push("=");
        entry.push(self.value.as_os_str());
        entry
    }

    /// Write the hint into the process environment. `slot` keeps it for the rest of the
    /// process and rejects any second installation.
    pub fn install(self, slot: &ProcessSlot<EnvironmentHint>) -> Result<&EnvironmentHint, InstallError> {
        let hint = slot.set(self).map_err(|rejected| InstallError::HintAlreadyApplied {
            key: rejected.key.to_string(),
        })?;
        set_env_var(hint.key, &hint.value);
        tracing::debug!(hint = %hint.entry().to_string_lossy(), "Installed environment hint");
        Ok(hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_LAYOUT: InstallLayout = InstallLayout {
        library_var: "DS9_TEST_INSTALL_LIBRARY",
        runtime_library: "../lib/app/rt",
        startup_script: "../lib/app/script",
    };

    #[test]
    fn test_executable_dir() {
        assert_eq!(executable_dir(Path::new("/opt/app/bin/app")), PathBuf::from("/opt/app/bin"));
        assert_eq!(executable_dir(Path::new("bin/app")), PathBuf::from("bin"));
        assert_eq!(executable_dir(Path::new("app")), PathBuf::from("."));
        assert_eq!(executable_dir(Path::new("")), PathBuf::from("."));
    }

    #[cfg(unix)]
    #[test]
    fn test_executable_dir_at_root() {
        assert_eq!(executable_dir(Path::new("/app")), PathBuf::from("/"));
    }

    #[cfg(unix)]
    #[test]
    fn test_lexical_absolute_folds_dots() {
        assert_eq!(
            lexical_absolute(Path::new("/opt/app/bin/../lib/./app/rt")),
            PathBuf::from("/opt/app/lib/app/rt")
        );
        assert_eq!(lexical_absolute(Path::new("/../..")), PathBuf::from("/"));
    }

    #[test]
    fn test_normalize_keeps_leading_parent_chain() {
        assert_eq!(normalize(Path::new("../../x")), PathBuf::from("../../x"));
        assert_eq!(normalize(Path::new("a/../../x")), PathBuf::from("../x"));
        assert_eq!(normalize(Path::new("../a/b/../c")), PathBuf::from("../a/c"));
        assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_lexical_absolute_anchors_relative_paths() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(lexical_absolute(Path::new("bin/../lib")), cwd.join("lib"));
        assert!(lexical_absolute(Path::new("x")).is_absolute());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_missing_bundle_is_lenient() {
        let paths =
            InstallPaths::resolve("/opt/app/bin/app", &TEST_LAYOUT, FallbackPolicy::Lenient)
                .unwrap();
        assert_eq!(paths.runtime_library_dir, PathBuf::from("/opt/app/lib/app/rt"));
        assert_eq!(paths.startup_script, PathBuf::from("/opt/app/lib/app/script"));
        assert_eq!(paths.executable_dir, PathBuf::from("/opt/app/bin"));
        assert_eq!(paths.executable, PathBuf::from("/opt/app/bin/app"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_missing_bundle_is_fatal_when_strict() {
        let err = InstallPaths::resolve("/opt/app/bin/app", &TEST_LAYOUT, FallbackPolicy::Strict)
            .unwrap_err();
        match err {
            InstallError::Unresolved { path, .. } => {
                assert_eq!(path, PathBuf::from("/opt/app/bin/../lib/app/rt"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn make_bundle(root: &Path) {
        fs::create_dir_all(root.join("bin")).unwrap();
        fs::create_dir_all(root.join("lib/app/rt")).unwrap();
        fs::write(root.join("lib/app/script"), "puts hello\n").unwrap();
        fs::write(root.join("bin/app"), "").unwrap();
    }

    #[test]
    fn test_resolve_real_bundle_canonicalizes() {
        let tmp = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(tmp.path()).unwrap();
        make_bundle(&root);

        let paths = InstallPaths::resolve(root.join("bin/app"), &TEST_LAYOUT, FallbackPolicy::Strict)
            .unwrap();
        assert_eq!(paths.runtime_library_dir, root.join("lib/app/rt"));
        assert_eq!(paths.startup_script, root.join("lib/app/script"));
        assert!(paths.runtime_library_dir.is_absolute());
    }

    #[test]
    fn test_resolve_path_with_spaces() {
        let tmp = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(tmp.path()).unwrap().join("My Apps");
        make_bundle(&root);

        let paths = InstallPaths::resolve(root.join("bin/app"), &TEST_LAYOUT, FallbackPolicy::Strict)
            .unwrap();
        assert_eq!(paths.startup_script, root.join("lib/app/script"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_through_symlinked_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(tmp.path()).unwrap();
        let real = root.join("real");
        make_bundle(&real);
        let link = root.join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let paths = InstallPaths::resolve(link.join("bin/app"), &TEST_LAYOUT, FallbackPolicy::Strict)
            .unwrap();
        assert_eq!(paths.runtime_library_dir, real.join("lib/app/rt"));
        assert_eq!(paths.executable_dir, link.join("bin"));
    }

    #[test]
    fn test_hint_entry_format() {
        let hint = EnvironmentHint::new("TCL_LIBRARY", "/opt/ds9/lib/ds9/tcl8.6");
        assert_eq!(hint.entry(), OsString::from("TCL_LIBRARY=/opt/ds9/lib/ds9/tcl8.6"));
        assert_eq!(hint.key(), "TCL_LIBRARY");
    }

    #[test]
    fn test_hint_installs_once() {
        let slot = ProcessSlot::new("test hint");
        let first = EnvironmentHint::new("DS9_TEST_INSTALL_HINT_ONCE", "/first");
        let installed = first.install(&slot).unwrap();
        assert_eq!(installed.value(), Path::new("/first"));
        assert_eq!(
            std::env::var_os("DS9_TEST_INSTALL_HINT_ONCE"),
            Some(OsString::from("/first"))
        );

        let second = EnvironmentHint::new("DS9_TEST_INSTALL_HINT_ONCE", "/second");
        assert!(matches!(
            second.install(&slot),
            Err(InstallError::HintAlreadyApplied { .. })
        ));
        assert_eq!(
            std::env::var_os("DS9_TEST_INSTALL_HINT_ONCE"),
            Some(OsString::from("/first"))
        );
    }

    #[test]
    fn test_ds9_layout() {
        assert_eq!(InstallLayout::DS9.library_var, "TCL_LIBRARY");
        assert!(InstallLayout::DS9.startup_script.ends_with("ds9.tcl"));
    }
}
