//! Library loader and the loaded-library/instance ownership pairing.
//!
//! [`load`] is the only operation in the host with genuine memory-safety
//! risk: it maps foreign code into the process and trusts the `createPlugin`
//! export to honor the ABI in [`plugbay_sdk::abi`]. Every failure it can
//! detect is returned as a typed [`LoadError`] so one bad candidate never
//! aborts the run.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use libloading::{Library, Symbol};
use tracing::debug;

use plugbay_sdk::abi::{
    CreatePluginFn, RawPlugin, CREATE_PLUGIN_SYMBOL, PLUGIN_ABI_VERSION, RUN_OK, RUN_PANICKED,
};
use plugbay_sdk::{Plugin, PluginError, PluginResult};

use crate::error::LoadError;

/// Host-side owner of one dynamically created plugin instance.
///
/// Holds the raw descriptor and its entry points; `Drop` invokes the
/// plugin's `destroy` export. The handle alone is not safe to keep around:
/// it must never outlive the [`Library`] the instance came from, which is
/// why [`LoadedPlugin`] bundles the two and this type offers no public
/// constructor from a raw library.
pub struct PluginHandle {
    name: String,
    ctx: *mut (),
    run: unsafe extern "C" fn(*mut ()) -> i32,
    destroy: Option<unsafe extern "C" fn(*mut RawPlugin)>,
    raw: *mut RawPlugin,
}

// SAFETY: the handle is the sole owner of the instance; the contract requires
// plugin instances to be transferable across threads, and the host never
// shares a handle between tasks.
unsafe impl Send for PluginHandle {}

impl PluginHandle {
    /// Take ownership of a descriptor returned by a factory export.
    ///
    /// # Safety
    /// `raw` must be the untouched return value of a `createPlugin` call
    /// from a library that is still mapped.
    unsafe fn from_raw(raw: *mut RawPlugin) -> Result<Self, LoadError> {
        if raw.is_null() {
            return Err(LoadError::NullInstance);
        }

        let abi_version = (*raw).abi_version;
        if abi_version != PLUGIN_ABI_VERSION {
            // The layout past the version field cannot be trusted, so the
            // destroy pointer must not be called. The instance is leaked.
            return Err(LoadError::AbiMismatch {
                expected: PLUGIN_ABI_VERSION,
                found: abi_version,
            });
        }

        let destroy = (*raw).destroy;

        // Destroys a descriptor rejected after the version check passed.
        let release = |raw: *mut RawPlugin| {
            if let Some(destroy) = destroy {
                unsafe { destroy(raw) };
            }
        };

        let Some(run) = (*raw).run else {
            release(raw);
            return Err(LoadError::MissingRunFn);
        };

        let (name_ptr, name_len) = ((*raw).name, (*raw).name_len);
        let name = if name_ptr.is_null() || name_len == 0 {
            String::from("unnamed")
        } else {
            let bytes = std::slice::from_raw_parts(name_ptr, name_len);
            match std::str::from_utf8(bytes) {
                Ok(name) => name.to_string(),
                Err(_) => {
                    release(raw);
                    return Err(LoadError::InvalidName);
                }
            }
        };

        Ok(Self {
            name,
            ctx: (*raw).ctx,
            run,
            destroy,
            raw,
        })
    }
}

impl Plugin for PluginHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self) -> PluginResult<()> {
        // SAFETY: ctx and run come from a descriptor this handle owns, and
        // the paired library is still mapped (enforced by LoadedPlugin).
        let status = unsafe { (self.run)(self.ctx) };
        match status {
            RUN_OK => Ok(()),
            RUN_PANICKED => Err(PluginError::Panicked),
            code => Err(PluginError::ExitStatus(code)),
        }
    }
}

impl Drop for PluginHandle {
    fn drop(&mut self) {
        if let Some(destroy) = self.destroy {
            // SAFETY: the handle owns the descriptor and nothing uses it
            // after this point.
            unsafe { destroy(self.raw) };
        }
    }
}

impl std::fmt::Debug for PluginHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// One successfully loaded plugin: the instance and the library mapping it
/// depends on, owned as a single unit.
#[derive(Debug)]
pub struct LoadedPlugin {
    // Field order is load-bearing: fields drop in declaration order, so the
    // instance is destroyed strictly before its library is unmapped.
    handle: PluginHandle,
    path: PathBuf,
    loaded_at: DateTime<Utc>,
    _library: Library,
}

impl LoadedPlugin {
    /// Display name reported by the plugin.
    pub fn name(&self) -> &str {
        self.handle.name()
    }

    /// Path the plugin was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the plugin was loaded.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

impl Plugin for LoadedPlugin {
    fn name(&self) -> &str {
        self.handle.name()
    }

    fn run(&mut self) -> PluginResult<()> {
        self.handle.run()
    }
}

/// Load one candidate library and construct its plugin instance.
///
/// Opens the library, resolves the `createPlugin` export and invokes it
/// exactly once. If the symbol is absent the just-opened library is dropped
/// on the error return, releasing the mapping instead of leaking it.
pub fn load(path: &Path) -> Result<LoadedPlugin, LoadError> {
    let library =
        unsafe { Library::new(path) }.map_err(|source| LoadError::Open { source })?;

    let create: Symbol<CreatePluginFn> = unsafe { library.get(CREATE_PLUGIN_SYMBOL) }
        .map_err(|source| LoadError::MissingSymbol { source })?;
    let create = *create;

    // SAFETY: the symbol was resolved from `library`, which stays alive
    // inside the returned LoadedPlugin.
    let raw = unsafe { create() };
    let handle = unsafe { PluginHandle::from_raw(raw)? };

    debug!(plugin = %handle.name, path = %path.display(), "plugin instance created");

    Ok(LoadedPlugin {
        handle,
        path: path.to_path_buf(),
        loaded_at: Utc::now(),
        _library: library,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugbay_sdk::abi::into_raw;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_load_nonexistent_path() {
        let err = load(Path::new("/nonexistent/libplugin.so")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }

    #[test]
    fn test_load_invalid_library_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.so");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"this is not a shared object").unwrap();
        drop(file);

        let err = load(&path).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }

    #[derive(Clone)]
    struct DropLog(Arc<Mutex<Vec<&'static str>>>);

    struct RecordingPlugin(DropLog);

    impl Plugin for RecordingPlugin {
        fn name(&self) -> &str {
            "recording"
        }

        fn run(&mut self) -> PluginResult<()> {
            Ok(())
        }
    }

    impl Drop for RecordingPlugin {
        fn drop(&mut self) {
            self.0 .0.lock().unwrap().push("instance");
        }
    }

    struct ResourceStandIn(DropLog);

    impl Drop for ResourceStandIn {
        fn drop(&mut self) {
            self.0 .0.lock().unwrap().push("resource");
        }
    }

    // Regression test for the teardown ordering invariant: the pairing type
    // relies on declaration-order drops, so the instance handle must be
    // destroyed before the library resource declared after it.
    #[test]
    fn test_instance_drops_before_resource() {
        struct Pair {
            handle: PluginHandle,
            _resource: ResourceStandIn,
        }

        let log = DropLog(Arc::new(Mutex::new(Vec::new())));

        let raw = into_raw(Box::new(RecordingPlugin(log.clone())));
        let handle = unsafe { PluginHandle::from_raw(raw) }.unwrap();

        let pair = Pair {
            handle,
            _resource: ResourceStandIn(log.clone()),
        };
        drop(pair);

        assert_eq!(*log.0.lock().unwrap(), vec!["instance", "resource"]);
    }

    #[test]
    fn test_handle_runs_and_reports_name() {
        let log = DropLog(Arc::new(Mutex::new(Vec::new())));
        let raw = into_raw(Box::new(RecordingPlugin(log)));
        let mut handle = unsafe { PluginHandle::from_raw(raw) }.unwrap();

        assert_eq!(handle.name(), "recording");
        assert!(handle.run().is_ok());
    }

    #[test]
    fn test_abi_mismatch_rejected() {
        let raw = into_raw(Box::new(RecordingPlugin(DropLog(Arc::new(Mutex::new(
            Vec::new(),
        ))))));
        unsafe { (*raw).abi_version = PLUGIN_ABI_VERSION + 1 };

        let err = unsafe { PluginHandle::from_raw(raw) }.unwrap_err();
        assert!(matches!(err, LoadError::AbiMismatch { found, .. } if found == PLUGIN_ABI_VERSION + 1));
    }

    #[test]
    fn test_missing_run_fn_rejected() {
        let drops = DropLog(Arc::new(Mutex::new(Vec::new())));
        let raw = into_raw(Box::new(RecordingPlugin(drops.clone())));
        unsafe { (*raw).run = None };

        let err = unsafe { PluginHandle::from_raw(raw) }.unwrap_err();
        assert!(matches!(err, LoadError::MissingRunFn));
        // The rejected instance must still have been destroyed.
        assert_eq!(*drops.0.lock().unwrap(), vec!["instance"]);
    }

    #[test]
    fn test_null_instance_rejected() {
        let err = unsafe { PluginHandle::from_raw(std::ptr::null_mut()) }.unwrap_err();
        assert!(matches!(err, LoadError::NullInstance));
    }
}
