//! Fail-fast interpreter bootstrap.
//!
//! Order:
//! 1. publish the interpreter handle (once per process)
//! 2. virtual filesystem, then the optional resource archive
//! 3. interpreter core
//! 4. toolkit
//! 5. extensions, in table order
//!
//! The first failure aborts the run; nothing after it is attempted.

use crate::error::BootError;
use crate::interp::Interpreter;
use crate::registry::{ModuleRegistration, ModuleRegistry};
use ds9_core::ProcessSlot;
use std::collections::HashSet;
use std::iter;
use std::path::PathBuf;

/// Archives are mounted at the root of the virtual filesystem.
pub const ARCHIVE_MOUNT_POINT: &str = "";

/// The fixed module table, built at compile time.
pub struct BootPlan<'a, P> {
    /// Mounted before the core initializer, which searches for its own scripts through it.
    pub vfs: ModuleRegistration<P>,
    pub toolkit: ModuleRegistration<P>,
    pub extensions: &'a [ModuleRegistration<P>],
}

impl<'a, P: Copy> BootPlan<'a, P> {
    /// Every registration, in the order the sequencer starts them.
    pub fn registrations(&self) -> impl Iterator<Item = &ModuleRegistration<P>> + '_ {
        iter::once(&self.vfs)
            .chain(iter::once(&self.toolkit))
            .chain(self.extensions.iter())
    }

    pub fn module_names(&self) -> Vec<&'static str> {
        self.registrations().map(|r| r.name).collect()
    }

    /// Reject plans that name a module twice.
    pub fn check(&self) -> Result<(), BootError> {
        let mut seen = HashSet::new();
        for registration in self.registrations() {
            if !seen.insert(registration.name) {
                return Err(BootError::DuplicateModule(registration.name));
            }
        }
        Ok(())
    }
}

/// Runs a `BootPlan` against one interpreter.
pub struct Sequencer<'a, I: Interpreter> {
    plan: &'a BootPlan<'a, I::InitProc>,
    handle_slot: &'a ProcessSlot<I::Handle>,
    archive: Option<PathBuf>,
}

impl<'a, I: Interpreter> Sequencer<'a, I> {
    pub fn new(plan: &'a BootPlan<'a, I::InitProc>, handle_slot: &'a ProcessSlot<I::Handle>) -> Self {
        Self {
            plan,
            handle_slot,
            archive: None,
        }
    }

    /// Mount `archive` right after the virtual filesystem comes up.
    pub fn with_archive(mut self, archive: Option<PathBuf>) -> Self {
        self.archive = archive;
        self
    }

    pub fn run(&self, interp: &mut I) -> Result<ModuleRegistry<I::InitProc>, BootError> {
        self.plan.check()?;

        // Extensions may call back into helpers that need the handle while they initialize.
        if self.handle_slot.set(interp.handle()).is_err() {
            tracing::warn!(slot = self.handle_slot.name(), "Bootstrap requested twice; refusing");
            return Err(BootError::AlreadyBootstrapped);
        }

        let mut registry = ModuleRegistry::new();

        start(interp, &mut registry, &self.plan.vfs)?;
        if let Some(archive) = &self.archive {
            tracing::debug!(archive = %archive.display(), "Mounting resource archive");
            interp
                .mount_archive(archive, ARCHIVE_MOUNT_POINT)
                .map_err(|source| BootError::Archive {
                    path: archive.clone(),
                    source,
                })?;
        }

        interp.init_core().map_err(BootError::Core)?;

        start(interp, &mut registry, &self.plan.toolkit)?;
        for extension in self.plan.extensions {
            start(interp, &mut registry, extension)?;
        }

        tracing::info!(modules = registry.len(), "Interpreter bootstrap complete");
        Ok(registry)
    }
}

fn start<I: Interpreter>(
    interp: &mut I,
    registry: &mut ModuleRegistry<I::InitProc>,
    registration: &ModuleRegistration<I::InitProc>,
) -> Result<(), BootError> {
    tracing::debug!(module = registration.name, "Initializing module");
    interp
        .call_init(registration.init)
        .map_err(|source| BootError::Module {
            name: registration.name,
            source,
        })?;
    interp.provide_static(registration.name, registration.init, registration.safe_init);
    registry.record(*registration)
}
