//! Plugin error types.

/// Result type for plugin operations.
pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// Plugin error type.
///
/// `Failed` is what a plugin reports from its own `run`; the remaining
/// variants are the host-side views of a run that ended badly across the
/// FFI boundary.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// The plugin reported a failure from `run`.
    #[error("Execution failed: {0}")]
    Failed(String),

    /// The plugin's `run` export returned a non-zero status code.
    #[error("Plugin exited with status {0}")]
    ExitStatus(i32),

    /// The plugin panicked; the panic was contained at the FFI boundary.
    #[error("Plugin panicked during run")]
    Panicked,
}

impl PluginError {
    /// Create a `Failed` error from any message.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}
