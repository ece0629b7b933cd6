//! SAOImage DS9 host process.
//!
//! `launch` holds the runtime-independent glue; `tcl` and `modules` bind it to the
//! statically linked Tcl/Tk runtime and are only compiled with the `tk` feature.

pub mod launch;

#[cfg(feature = "tk")]
pub mod modules;
#[cfg(feature = "tk")]
pub mod tcl;
