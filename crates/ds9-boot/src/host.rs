//! Work done before the interpreter exists.

use ds9_core::{EnvironmentHint, FallbackPolicy, InstallError, InstallLayout, InstallPaths, ProcessSlot};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// The embedding runtime's process-level entry points, usable before any interpreter has
/// been created.
pub trait Host {
    /// Platform discovery of the running executable. Must precede every other runtime
    /// call.
    fn find_executable(&mut self, argv0: &OsStr);

    /// Absolute path of the running binary as discovered by `find_executable`, which
    /// searches `PATH` when argv[0] carries no directory. `None` if discovery failed.
    fn name_of_executable(&self) -> Option<PathBuf>;

    /// The script the interpreter executes first once it is up.
    fn set_startup_script(&mut self, script: &Path);
}

/// Resolve the install, publish the library hint, and hand the startup script to the
/// host, in that order. Must complete before the host constructs its interpreter.
pub fn prepare<H: Host>(
    host: &mut H,
    argv0: &OsStr,
    layout: &InstallLayout,
    policy: FallbackPolicy,
    hint_slot: &ProcessSlot<EnvironmentHint>,
) -> Result<InstallPaths, InstallError> {
    host.find_executable(argv0);
    let discovered = host.name_of_executable();

    let mut paths = InstallPaths::resolve(argv0, layout, policy)?;
    if let Some(executable) = discovered {
        paths.executable = executable;
    }
    EnvironmentHint::for_install(layout, &paths).install(hint_slot)?;
    host.set_startup_script(&paths.startup_script);

    tracing::info!(
        startup_script = %paths.startup_script.display(),
        "Host prepared"
    );
    Ok(paths)
}
