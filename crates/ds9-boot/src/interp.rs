//! The embedded interpreter, as seen by the bootstrap.

use crate::error::InterpError;
use std::path::Path;

/// A live interpreter instance owned by the embedding runtime.
///
/// The bootstrap only borrows it for the duration of `Sequencer::run`; the runtime keeps
/// ownership and drives the event loop afterwards.
pub trait Interpreter {
    /// Extension entry point: takes the interpreter, reports success or failure.
    type InitProc: Copy + 'static;

    /// Cheap, copyable reference to this instance that outlives the borrow, for helpers
    /// that are called back without a context parameter.
    type Handle: Copy + 'static;

    /// Run an extension's entry point against this interpreter.
    fn call_init(&mut self, init: Self::InitProc) -> Result<(), InterpError>;

    /// Generic interpreter initialization (library search, `init.tcl`).
    fn init_core(&mut self) -> Result<(), InterpError>;

    /// Mount a resource archive into the virtual filesystem at `mount_point`.
    fn mount_archive(&mut self, archive: &Path, mount_point: &str) -> Result<(), InterpError>;

    /// Record a statically linked module so scripts can `package require` / `load` it
    /// without re-running its initializer.
    fn provide_static(
        &mut self,
        name: &'static str,
        init: Self::InitProc,
        safe_init: Option<Self::InitProc>,
    );

    fn handle(&self) -> Self::Handle;
}
