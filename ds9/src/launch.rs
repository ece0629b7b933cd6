//! Glue between the process entry point, the configuration, and the bootstrap.
//!
//! The embedding runtime calls back into the host without a context parameter, so the
//! results of the pre-interpreter phase are parked in process slots here.

use anyhow::{anyhow, Result};
use ds9_boot::{BootError, BootPlan, Host, Interpreter, ModuleRegistry, Sequencer};
use ds9_core::config::InstallConfig;
use ds9_core::{EnvironmentHint, InstallError, InstallLayout, InstallPaths, ProcessSlot};
use std::any::Any;
use std::ffi::OsStr;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

pub static LIBRARY_HINT: ProcessSlot<EnvironmentHint> = ProcessSlot::new("TCL_LIBRARY hint");
pub static LAUNCH: ProcessSlot<Launch> = ProcessSlot::new("launch");

/// Start order of the DS9 boot plan: the virtual filesystem, the toolkit, then the
/// extensions. The image codecs follow `img`, and each format handler follows the codec
/// library it uses.
pub const DS9_MODULE_ORDER: [&str; 22] = [
    "zipfs", "Tk", "tkblt", "Tktable", "tls", "tksao", "tkhtml1", "Tclxpa", "Tclfitsy",
    "tkmpeg", "tksvg", "tkagif", "tclxml", "xmlrpc", "img", "zlibtcl", "jpegtcl", "jpeg",
    "tifftcl", "tiff", "window", "signal",
];

/// What the application-init callback needs from the pre-interpreter phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launch {
    pub paths: InstallPaths,
    pub archive: Option<PathBuf>,
}

impl Launch {
    pub fn new(paths: InstallPaths, config: &InstallConfig) -> Self {
        let archive = config.archive.as_ref().map(|a| a.locate(&paths));
        Self { paths, archive }
    }
}

/// Resolve the DS9 install from argv[0] using the environment configuration.
pub fn prepare<H: Host>(host: &mut H, argv0: &OsStr) -> Result<&'static Launch, InstallError> {
    prepare_with(
        host,
        argv0,
        &InstallLayout::DS9,
        &InstallConfig::from_env(),
        &LIBRARY_HINT,
        &LAUNCH,
    )
}

pub fn prepare_with<'s, H: Host>(
    host: &mut H,
    argv0: &OsStr,
    layout: &InstallLayout,
    config: &InstallConfig,
    hint_slot: &ProcessSlot<EnvironmentHint>,
    launch_slot: &'s ProcessSlot<Launch>,
) -> Result<&'s Launch, InstallError> {
    if launch_slot.is_set() {
        return Err(InstallError::AlreadyPrepared);
    }
    let paths = ds9_boot::prepare(host, argv0, layout, config.fallback_policy(), hint_slot)?;
    let launch = Launch::new(paths, config);
    if let Some(archive) = &launch.archive {
        tracing::debug!(archive = %archive.display(), "Resource archive selected");
    }
    launch_slot
        .set(launch)
        .map_err(|_| InstallError::AlreadyPrepared)
}

/// Run the boot plan, mounting the archive chosen during preparation.
pub fn boot<I: Interpreter>(
    interp: &mut I,
    plan: &BootPlan<'_, I::InitProc>,
    launch: Option<&Launch>,
    handle_slot: &ProcessSlot<I::Handle>,
) -> Result<ModuleRegistry<I::InitProc>, BootError> {
    Sequencer::<I>::new(plan, handle_slot)
        .with_archive(launch.and_then(|l| l.archive.clone()))
        .run(interp)
}

/// Run `f` so that neither its error nor a panic escapes unchecked; used at the FFI
/// boundary where unwinding is not allowed.
pub fn contained<T>(f: impl FnOnce() -> Result<T, BootError>) -> Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(anyhow::Error::new(err).context("interpreter bootstrap failed")),
        Err(payload) => Err(anyhow!(
            "interpreter bootstrap panicked: {}",
            panic_message(payload.as_ref())
        )),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
