//! Structured configs, loaded from the environment.

use super::env_keys::{install as install_keys, observability as obv_keys};
use super::loader::{env_bool, env_optional, env_or};
use crate::install::{FallbackPolicy, InstallPaths};
use std::ffi::OsString;
use std::path::PathBuf;

/// Logging configuration: quiet, log_level, log_json
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| Self {
            quiet: env_bool(obv_keys::DS9_QUIET, false),
            log_level: env_or(obv_keys::DS9_LOG_LEVEL, || "warn".to_string()),
            log_json: env_bool(obv_keys::DS9_LOG_JSON, false),
        })
    }
}

/// Where the optional resource archive comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveSetting {
    /// `<executable>.zip`, next to the binary.
    Companion,
    /// An explicit archive; relative paths are taken from the executable directory.
    Path(PathBuf),
}

impl ArchiveSetting {
    /// `auto` (any case) selects the companion archive; blank input selects nothing.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            None
        } else if raw.eq_ignore_ascii_case("auto") {
            Some(Self::Companion)
        } else {
            Some(Self::Path(PathBuf::from(raw)))
        }
    }

    pub fn locate(&self, paths: &InstallPaths) -> PathBuf {
        match self {
            Self::Companion => {
                let mut name: OsString = paths.executable.clone().into_os_string();
                name.push(".zip");
                PathBuf::from(name)
            }
            Self::Path(p) if p.is_absolute() => p.clone(),
            Self::Path(p) => paths.executable_dir.join(p),
        }
    }
}

/// Install-time policy: canonicalization strictness and archive mount.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    pub strict: bool,
    pub archive: Option<ArchiveSetting>,
}

impl InstallConfig {
    pub fn from_env() -> Self {
        Self {
            strict: env_bool(install_keys::DS9_STRICT_INSTALL, false),
            archive: env_optional(install_keys::DS9_ZIP_ARCHIVE)
                .and_then(|raw| ArchiveSetting::parse(&raw)),
        }
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        if self.strict {
            FallbackPolicy::Strict
        } else {
            FallbackPolicy::Lenient
        }
    }
}
