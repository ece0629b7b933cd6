//! DS9 host core: everything that must be settled before an interpreter exists.
//!
//! - `config`: environment-driven settings (logging, install policy, archive mount)
//! - `install`: executable-relative path resolution and the library environment hint
//! - `observability`: tracing subscriber setup
//! - `slot`: single-assignment process-lifetime cells

pub mod config;
pub mod install;
pub mod observability;
pub mod slot;

pub use install::{EnvironmentHint, FallbackPolicy, InstallError, InstallLayout, InstallPaths};
pub use slot::ProcessSlot;
