//! In-memory registry of successfully loaded plugins.

use tracing::info;

use crate::loader::LoadedPlugin;

/// Per-run collection of loaded plugins.
///
/// Each entry keeps its instance and its library mapping paired, so no
/// instance can be referenced without its resource remaining alive. Entries
/// are never removed individually mid-run; the whole registry is handed to
/// the executor and torn down entry-by-entry at end-of-run.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    entries: Vec<LoadedPlugin>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a successfully loaded plugin.
    pub fn register(&mut self, plugin: LoadedPlugin) {
        info!(plugin = %plugin.name(), path = %plugin.path().display(), "registered plugin");
        self.entries.push(plugin);
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate the registered plugins, read-only.
    pub fn iter(&self) -> impl Iterator<Item = &LoadedPlugin> {
        self.entries.iter()
    }

    /// Consume the registry, yielding ownership of every entry to the
    /// execution scheduler.
    pub fn into_entries(self) -> Vec<LoadedPlugin> {
        self.entries
    }
}
