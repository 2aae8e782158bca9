//! Export macro for plugin libraries.

/// Export a plugin type from a cdylib.
///
/// Generates the unmangled `createPlugin` factory symbol the host resolves.
/// The one-argument form constructs the plugin with `Default::default()`;
/// the two-argument form accepts a constructor path.
///
/// # Example
///
/// ```rust,ignore
/// use plugbay_sdk::prelude::*;
///
/// #[derive(Default)]
/// struct MyPlugin;
///
/// impl Plugin for MyPlugin {
///     fn name(&self) -> &str { "my-plugin" }
///     fn run(&mut self) -> PluginResult<()> { Ok(()) }
/// }
///
/// export_plugin!(MyPlugin);
/// // or, with an explicit constructor:
/// // export_plugin!(MyPlugin, MyPlugin::new);
/// ```
#[macro_export]
macro_rules! export_plugin {
    ($ty:ty) => {
        /// Factory export resolved by the plugbay host.
        #[allow(non_snake_case)]
        #[no_mangle]
        pub extern "C" fn createPlugin() -> *mut $crate::abi::RawPlugin {
            let plugin: $ty = ::core::default::Default::default();
            $crate::abi::into_raw(::std::boxed::Box::new(plugin))
        }
    };
    ($ty:ty, $ctor:path) => {
        /// Factory export resolved by the plugbay host.
        #[allow(non_snake_case)]
        #[no_mangle]
        pub extern "C" fn createPlugin() -> *mut $crate::abi::RawPlugin {
            let plugin: $ty = $ctor();
            $crate::abi::into_raw(::std::boxed::Box::new(plugin))
        }
    };
}
