//! Module registration records and the registry of modules that came up.

use crate::error::BootError;
use std::fmt;

/// One statically linked module: its package name, entry point, and optional entry point
/// for safe (sandboxed) interpreters.
#[derive(Clone, Copy)]
pub struct ModuleRegistration<P> {
    pub name: &'static str,
    pub init: P,
    pub safe_init: Option<P>,
}

impl<P> ModuleRegistration<P> {
    pub const fn new(name: &'static str, init: P) -> Self {
        Self {
            name,
            init,
            safe_init: None,
        }
    }

    pub const fn with_safe(name: &'static str, init: P, safe_init: P) -> Self {
        Self {
            name,
            init,
            safe_init: Some(safe_init),
        }
    }
}

impl<P> fmt::Debug for ModuleRegistration<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistration")
            .field("name", &self.name)
            .field("safe", &self.safe_init.is_some())
            .finish()
    }
}

/// Modules that initialized successfully, in registration order.
pub struct ModuleRegistry<P> {
    entries: Vec<ModuleRegistration<P>>,
}

impl<P: Copy> ModuleRegistry<P> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a module. A name can only be recorded once.
    pub fn record(&mut self, registration: ModuleRegistration<P>) -> Result<(), BootError> {
        if self.contains(registration.name) {
            return Err(BootError::DuplicateModule(registration.name));
        }
        self.entries.push(registration);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&ModuleRegistration<P>> {
        self.entries.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|r| r.name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleRegistration<P>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: Copy> Default for ModuleRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for ModuleRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Proc = fn() -> bool;

    fn yes() -> bool {
        true
    }

    fn no() -> bool {
        false
    }

    #[test]
    fn test_record_and_lookup() {
        let mut reg: ModuleRegistry<Proc> = ModuleRegistry::new();
        assert!(reg.is_empty());
        reg.record(ModuleRegistration::new("tkblt", yes as Proc)).unwrap();
        reg.record(ModuleRegistration::with_safe("Tk", yes as Proc, no as Proc))
            .unwrap();

        assert_eq!(reg.len(), 2);
        assert!(reg.contains("Tk"));
        assert!(!reg.contains("tk"));
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["tkblt", "Tk"]);

        let tk = reg.get("Tk").unwrap();
        assert!(tk.safe_init.is_some());
        assert!((tk.init)());
        assert!(!(tk.safe_init.unwrap())());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut reg: ModuleRegistry<Proc> = ModuleRegistry::new();
        reg.record(ModuleRegistration::new("img", yes as Proc)).unwrap();
        let err = reg
            .record(ModuleRegistration::new("img", no as Proc))
            .unwrap_err();
        assert!(matches!(err, BootError::DuplicateModule("img")));
        assert_eq!(reg.len(), 1);
        assert!((reg.get("img").unwrap().init)());
    }

    #[test]
    fn test_debug_shows_names_only() {
        let r = ModuleRegistration::with_safe("Tk", yes as Proc, no as Proc);
        assert_eq!(format!("{r:?}"), "ModuleRegistration { name: \"Tk\", safe: true }");
    }
}
