//! DS9 host configuration.
//!
//! Every environment read goes through this module; the rest of the host works with
//! the structured configs.
//!
//! - `loader`: `env_or`, `env_optional`, `env_bool` and the single `set_env_var` writer
//! - `schema`: `ObservabilityConfig`, `InstallConfig`, `ArchiveSetting`
//! - `env_keys`: variable names

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{env_bool, env_optional, env_or, set_env_var};
pub use schema::{ArchiveSetting, InstallConfig, ObservabilityConfig};
