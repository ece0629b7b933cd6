use std::path::PathBuf;
use thiserror::Error;

/// A failure reported by the interpreter, carrying its result string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InterpError {
    message: String,
}

impl InterpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Every bootstrap error is fatal; there is no partial startup.
#[derive(Debug, Error)]
pub enum BootError {
    #[error("bootstrap already ran in this process")]
    AlreadyBootstrapped,

    #[error("module '{0}' appears more than once in the boot plan")]
    DuplicateModule(&'static str),

    #[error("interpreter core failed to initialize: {0}")]
    Core(#[source] InterpError),

    #[error(
        "unable to mount resource archive {}: {source}. If the ds9 program was moved, move the archive with it",
        path.display()
    )]
    Archive {
        path: PathBuf,
        #[source]
        source: InterpError,
    },

    #[error("module '{name}' failed to initialize: {source}")]
    Module {
        name: &'static str,
        #[source]
        source: InterpError,
    },
}

impl BootError {
    /// Name of the module that failed, if a module was at fault.
    pub fn module(&self) -> Option<&'static str> {
        match self {
            Self::Module { name, .. } | Self::DuplicateModule(name) => Some(*name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_error_names_module_and_cause() {
        let err = BootError::Module {
            name: "tksao",
            source: InterpError::new("can't find package tksao"),
        };
        assert_eq!(err.module(), Some("tksao"));
        assert_eq!(
            err.to_string(),
            "module 'tksao' failed to initialize: can't find package tksao"
        );
    }

    #[test]
    fn test_archive_error_explains_relocation() {
        let err = BootError::Archive {
            path: PathBuf::from("/opt/ds9/bin/ds9.zip"),
            source: InterpError::new("no such file"),
        };
        let text = err.to_string();
        assert!(text.contains("/opt/ds9/bin/ds9.zip"));
        assert!(text.contains("move the archive with it"));
        assert_eq!(err.module(), None);
    }
}
