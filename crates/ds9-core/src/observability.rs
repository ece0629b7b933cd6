//! Tracing initialization.
//!
//! Logs go to stderr: stdout belongs to the Tcl side (`puts`, console output).

use crate::config::ObservabilityConfig;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Filter directive for the given config. `DS9_QUIET` wins over `DS9_LOG_LEVEL`.
pub fn filter_directive(cfg: &ObservabilityConfig) -> String {
    if cfg.quiet {
        "error".to_string()
    } else {
        cfg.log_level.clone()
    }
}

/// Initialize tracing. Call once at process startup; later calls are no-ops.
/// `RUST_LOG` overrides `DS9_LOG_LEVEL` when set.
pub fn init_tracing() {
    let cfg = ObservabilityConfig::from_env();
    let level = filter_directive(cfg);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_overrides_level() {
        let cfg = ObservabilityConfig {
            quiet: true,
            log_level: "debug".into(),
            log_json: false,
        };
        assert_eq!(filter_directive(&cfg), "error");
        let cfg = ObservabilityConfig {
            quiet: false,
            ..cfg
        };
        assert_eq!(filter_directive(&cfg), "debug");
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing();
        init_tracing();
        tracing::info!("tracing initialized");
    }
}
