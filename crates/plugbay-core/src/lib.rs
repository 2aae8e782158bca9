//! Plugin host core for plugbay.
//!
//! This crate implements the dynamic plugin loading-and-execution subsystem:
//! discovery of loadable libraries in a configured directory, the
//! load/symbol-resolution protocol against the `createPlugin` factory export,
//! the ownership pairing between a loaded library and the instance it
//! produced, and the concurrent run/join model.
//!
//! ## Pipeline
//!
//! [`scanner`] produces candidate paths → [`loader`] turns each into a
//! [`LoadedPlugin`] or a typed, per-unit failure → [`PluginRegistry`] retains
//! the successes → [`executor`] runs every entry concurrently and joins →
//! [`Host`] sequences the whole run and reports a [`RunReport`].
//!
//! A corrupt or incompatible plugin never aborts the run; only a missing or
//! unreadable plugin directory is fatal.

pub mod config;
pub mod error;
pub mod executor;
pub mod host;
pub mod loader;
pub mod registry;
pub mod scanner;

pub use config::HostConfig;
pub use error::{HostError, LoadError, Result};
pub use executor::{run_all, RunOutcome, RunStatus};
pub use host::{Host, LoadFailure, RunReport};
pub use loader::{load, LoadedPlugin, PluginHandle};
pub use registry::PluginRegistry;
pub use scanner::{is_plugin_file, scan};
