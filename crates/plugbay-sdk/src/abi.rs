//! The C-compatible plugin ABI.
//!
//! Every plugin library exports a single unmangled factory symbol named
//! [`CREATE_PLUGIN_SYMBOL`] (`createPlugin`). It takes no arguments and
//! returns a newly allocated [`RawPlugin`] with ownership transferred to the
//! caller. The symbol name, the layout of `RawPlugin` and the meaning of the
//! run status codes are the bit-exact compatibility surface between the host
//! and every independently compiled plugin.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::Plugin;

/// Current plugin ABI version.
///
/// The host refuses descriptors whose leading version field does not match.
pub const PLUGIN_ABI_VERSION: u32 = 1;

/// Name of the factory symbol every plugin library must export.
pub const CREATE_PLUGIN_SYMBOL: &[u8] = b"createPlugin";

/// Function type of the factory export.
pub type CreatePluginFn = unsafe extern "C" fn() -> *mut RawPlugin;

/// Status code: `run` completed successfully.
pub const RUN_OK: i32 = 0;
/// Status code: `run` reported an error.
pub const RUN_FAILED: i32 = 1;
/// Status code: `run` panicked and the panic was contained.
pub const RUN_PANICKED: i32 = 2;

/// Plugin descriptor returned by the `createPlugin` factory export.
///
/// `abi_version` is deliberately the first field so the host can check it
/// before trusting the rest of the layout.
#[repr(C)]
pub struct RawPlugin {
    /// ABI version - must match [`PLUGIN_ABI_VERSION`].
    pub abi_version: u32,

    /// Plugin display name (UTF-8, not null-terminated).
    pub name: *const u8,
    pub name_len: usize,

    /// Opaque instance state, owned by the plugin library.
    pub ctx: *mut (),

    /// Invoke the plugin's capability once. Returns one of the `RUN_*` codes.
    pub run: Option<unsafe extern "C" fn(ctx: *mut ()) -> i32>,

    /// Destroy the instance and the descriptor itself.
    pub destroy: Option<unsafe extern "C" fn(raw: *mut RawPlugin)>,
}

/// Instance state behind `RawPlugin::ctx`.
///
/// Owns the boxed plugin and the name buffer that `RawPlugin::name` points
/// into, so both live exactly as long as the descriptor.
struct PluginCell {
    name: String,
    plugin: Box<dyn Plugin>,
}

/// Wrap a plugin instance into an owned raw descriptor.
///
/// This is what [`export_plugin!`](crate::export_plugin) calls inside the
/// generated `createPlugin` export. The returned pointer is owned by the
/// caller and must be released through the descriptor's `destroy` function.
pub fn into_raw(plugin: Box<dyn Plugin>) -> *mut RawPlugin {
    let cell = Box::new(PluginCell {
        name: plugin.name().to_string(),
        plugin,
    });
    let name = cell.name.as_ptr();
    let name_len = cell.name.len();
    let ctx = Box::into_raw(cell) as *mut ();

    Box::into_raw(Box::new(RawPlugin {
        abi_version: PLUGIN_ABI_VERSION,
        name,
        name_len,
        ctx,
        run: Some(run_shim),
        destroy: Some(destroy_shim),
    }))
}

/// # Safety
/// `ctx` must be the pointer produced by [`into_raw`] and must not be in use
/// by any other thread.
unsafe extern "C" fn run_shim(ctx: *mut ()) -> i32 {
    let cell = &mut *(ctx as *mut PluginCell);

    // Panics must not unwind across the FFI boundary.
    match catch_unwind(AssertUnwindSafe(|| cell.plugin.run())) {
        Ok(Ok(())) => RUN_OK,
        Ok(Err(_)) => RUN_FAILED,
        Err(_) => RUN_PANICKED,
    }
}

/// # Safety
/// `raw` must be the pointer produced by [`into_raw`], and neither it nor its
/// `ctx` may be used afterwards.
unsafe extern "C" fn destroy_shim(raw: *mut RawPlugin) {
    if raw.is_null() {
        return;
    }
    let raw = Box::from_raw(raw);
    if !raw.ctx.is_null() {
        drop(Box::from_raw(raw.ctx as *mut PluginCell));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PluginResult;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingPlugin {
        counter: Arc<AtomicUsize>,
        fail: bool,
    }

    impl Plugin for CountingPlugin {
        fn name(&self) -> &str {
            "counting"
        }

        fn run(&mut self) -> PluginResult<()> {
            self.counter.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(crate::PluginError::failed("asked to fail"))
            } else {
                Ok(())
            }
        }
    }

    struct PanickyPlugin;

    impl Plugin for PanickyPlugin {
        fn name(&self) -> &str {
            "panicky"
        }

        fn run(&mut self) -> PluginResult<()> {
            panic!("deliberate test panic");
        }
    }

    struct DropProbe(Arc<AtomicUsize>);

    impl Plugin for DropProbe {
        fn name(&self) -> &str {
            "drop-probe"
        }

        fn run(&mut self) -> PluginResult<()> {
            Ok(())
        }
    }

    impl Drop for DropProbe {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_raw_round_trip() {
        let counter = Arc::new(AtomicUsize::new(0));
        let raw = into_raw(Box::new(CountingPlugin {
            counter: counter.clone(),
            fail: false,
        }));

        unsafe {
            assert_eq!((*raw).abi_version, PLUGIN_ABI_VERSION);

            let name = std::slice::from_raw_parts((*raw).name, (*raw).name_len);
            assert_eq!(std::str::from_utf8(name).unwrap(), "counting");

            let run = (*raw).run.unwrap();
            assert_eq!(run((*raw).ctx), RUN_OK);
            assert_eq!(run((*raw).ctx), RUN_OK);
            assert_eq!(counter.load(Ordering::SeqCst), 2);

            ((*raw).destroy.unwrap())(raw);
        }
    }

    #[test]
    fn test_failure_status() {
        let counter = Arc::new(AtomicUsize::new(0));
        let raw = into_raw(Box::new(CountingPlugin {
            counter,
            fail: true,
        }));

        unsafe {
            assert_eq!(((*raw).run.unwrap())((*raw).ctx), RUN_FAILED);
            ((*raw).destroy.unwrap())(raw);
        }
    }

    #[test]
    fn test_panic_contained() {
        let raw = into_raw(Box::new(PanickyPlugin));

        unsafe {
            assert_eq!(((*raw).run.unwrap())((*raw).ctx), RUN_PANICKED);
            ((*raw).destroy.unwrap())(raw);
        }
    }

    #[test]
    fn test_destroy_drops_instance() {
        let drops = Arc::new(AtomicUsize::new(0));
        let raw = into_raw(Box::new(DropProbe(drops.clone())));

        unsafe {
            ((*raw).destroy.unwrap())(raw);
        }
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }
}
