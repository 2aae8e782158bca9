//! Plugbay Plugin SDK
//!
//! This SDK provides the capability contract, the C-compatible ABI and the
//! export macro for building dynamic plugbay plugins.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use plugbay_sdk::prelude::*;
//!
//! #[derive(Default)]
//! struct MyPlugin;
//!
//! impl Plugin for MyPlugin {
//!     fn name(&self) -> &str {
//!         "my-plugin"
//!     }
//!
//!     fn run(&mut self) -> PluginResult<()> {
//!         println!("hello from my-plugin");
//!         Ok(())
//!     }
//! }
//!
//! export_plugin!(MyPlugin);
//! ```
//!
//! Build with `crate-type = ["cdylib"]` and drop the resulting library into
//! the host's plugin directory.

pub mod abi;
pub mod error;
#[macro_use]
pub mod macros;

pub use abi::{CreatePluginFn, RawPlugin, CREATE_PLUGIN_SYMBOL, PLUGIN_ABI_VERSION};
pub use error::{PluginError, PluginResult};

/// The capability contract every plugin must satisfy.
///
/// The single hard operation is [`run`](Plugin::run); [`name`](Plugin::name)
/// is metadata the host uses for logging and the run summary.
pub trait Plugin: Send {
    /// Display name of the plugin.
    fn name(&self) -> &str;

    /// Execute the plugin's capability exactly once.
    fn run(&mut self) -> PluginResult<()>;
}

/// Prelude module with common imports.
pub mod prelude {
    pub use crate::abi::{RawPlugin, CREATE_PLUGIN_SYMBOL, PLUGIN_ABI_VERSION};
    pub use crate::error::{PluginError, PluginResult};
    pub use crate::export_plugin;
    pub use crate::Plugin;
}
