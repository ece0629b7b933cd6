//! Environment variable names.
//!
//! `DS9_*` variables configure the host itself; the `runtime` group holds the names the
//! embedded interpreter reads during its own initialization.

/// Logging
pub mod observability {
    pub const DS9_QUIET: &str = "DS9_QUIET";
    pub const DS9_LOG_LEVEL: &str = "DS9_LOG_LEVEL";
    pub const DS9_LOG_JSON: &str = "DS9_LOG_JSON";
}

/// Install layout and resource mounting
pub mod install {
    /// "1" makes a path that cannot be canonicalized fatal instead of a warning.
    pub const DS9_STRICT_INSTALL: &str = "DS9_STRICT_INSTALL";
    /// "auto" mounts `<executable>.zip`; any other value is taken as the archive path.
    pub const DS9_ZIP_ARCHIVE: &str = "DS9_ZIP_ARCHIVE";
}

/// Read by the interpreter, never by the host.
pub mod runtime {
    pub const TCL_LIBRARY: &str = "TCL_LIBRARY";
}
