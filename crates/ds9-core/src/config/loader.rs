//! Environment variable access helpers.

use std::env;
use std::ffi::OsStr;

/// Read `key`; empty values count as unset.
pub fn env_or<F>(key: &str, default: F) -> String
where
    F: FnOnce() -> String,
{
    env::var(key)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default)
}

/// Like [`env_or`] but returns `None` when nothing (non-blank) is set.
pub fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|s| {
        let s = s.trim().to_string();
        if s.is_empty() {
            None
        } else {
            Some(s)
        }
    })
}

/// Boolean variable: 0/false/no/off are false, any other value is true.
pub fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key).ok().as_deref() {
        Some(s) => !matches!(
            s.trim().to_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        None => default,
    }
}

/// The only place the host writes to the process environment.
///
/// Callers must run before any other thread exists; the host does so during bootstrap,
/// ahead of interpreter construction.
pub fn set_env_var(key: &str, value: impl AsRef<OsStr>) {
    env::set_var(key, value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_on_unset_or_empty() {
        assert_eq!(env_or("DS9_TEST_LOADER_UNSET", || "default".into()), "default");
        set_env_var("DS9_TEST_LOADER_EMPTY", "");
        assert_eq!(env_or("DS9_TEST_LOADER_EMPTY", || "default".into()), "default");
        set_env_var("DS9_TEST_LOADER_SET", "debug");
        assert_eq!(env_or("DS9_TEST_LOADER_SET", || "default".into()), "debug");
    }

    #[test]
    fn test_env_optional_blank_is_unset() {
        set_env_var("DS9_TEST_LOADER_BLANK", "   ");
        assert_eq!(env_optional("DS9_TEST_LOADER_BLANK"), None);
        set_env_var("DS9_TEST_LOADER_PADDED", "  auto ");
        assert_eq!(env_optional("DS9_TEST_LOADER_PADDED").as_deref(), Some("auto"));
    }

    #[test]
    fn test_env_bool() {
        assert!(env_bool("DS9_TEST_LOADER_BOOL_UNSET", true));
        assert!(!env_bool("DS9_TEST_LOADER_BOOL_UNSET", false));
        set_env_var("DS9_TEST_LOADER_BOOL_OFF", "Off");
        assert!(!env_bool("DS9_TEST_LOADER_BOOL_OFF", true));
        set_env_var("DS9_TEST_LOADER_BOOL_ON", "1");
        assert!(env_bool("DS9_TEST_LOADER_BOOL_ON", false));
    }
}
