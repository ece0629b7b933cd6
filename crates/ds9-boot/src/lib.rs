//! DS9 host bootstrap.
//!
//! Takes the process from "just started" to "interpreter ready to run the startup
//! script": `host::prepare` runs before any interpreter exists, `Sequencer::run` runs
//! inside the embedding runtime's application-init callback.

pub mod error;
pub mod host;
pub mod interp;
pub mod registry;
pub mod sequencer;

pub use error::{BootError, InterpError};
pub use host::{prepare, Host};
pub use interp::Interpreter;
pub use registry::{ModuleRegistration, ModuleRegistry};
pub use sequencer::{BootPlan, Sequencer};
