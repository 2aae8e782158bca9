//! Host error types.
//!
//! Two tiers, matching the failure taxonomy of the host: [`HostError`] for
//! fatal startup problems that abort the run, [`LoadError`] for recoverable
//! per-unit load failures that skip one candidate and continue.

use std::path::PathBuf;

/// Result type for host operations.
pub type Result<T> = std::result::Result<T, HostError>;

/// Fatal host errors.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The configured plugin directory is missing or unreadable.
    #[error("Plugin directory {path:?} is not readable: {source}")]
    PluginDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid host configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Per-unit load failures. Each skips one candidate; none abort the run.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The OS could not open or map the library.
    #[error("Failed to load library: {source}")]
    Open {
        #[source]
        source: libloading::Error,
    },

    /// The library does not export the `createPlugin` factory.
    #[error("Missing `createPlugin` export: {source}")]
    MissingSymbol {
        #[source]
        source: libloading::Error,
    },

    /// The factory returned a null instance.
    #[error("Factory returned a null plugin instance")]
    NullInstance,

    /// The descriptor was built against a different ABI version.
    #[error("ABI version mismatch: expected {expected}, found {found}")]
    AbiMismatch { expected: u32, found: u32 },

    /// The descriptor carries no run entry point.
    #[error("Descriptor has no run entry point")]
    MissingRunFn,

    /// The descriptor's name field is not valid UTF-8.
    #[error("Plugin name is not valid UTF-8")]
    InvalidName,
}
