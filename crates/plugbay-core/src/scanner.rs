//! Directory scanner for loadable plugin libraries.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{HostError, Result};

/// Check if a path looks like a plugin library on the current platform.
pub fn is_plugin_file(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str());
    match std::env::consts::OS {
        "macos" => ext == Some("dylib"),
        "linux" => ext == Some("so"),
        "windows" => ext == Some("dll"),
        _ => false,
    }
}

/// Enumerate candidate plugin libraries in a directory.
///
/// Non-matching entries and subdirectories are skipped silently; the order
/// follows filesystem enumeration and is not stable. A missing or unreadable
/// directory is fatal configuration and fails the whole run.
pub fn scan(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| HostError::PluginDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut candidates = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && is_plugin_file(&path) {
            candidates.push(path);
        } else {
            trace!(path = %path.display(), "skipping non-plugin entry");
        }
    }

    debug!(dir = %dir.display(), count = candidates.len(), "scan complete");
    Ok(candidates)
}
