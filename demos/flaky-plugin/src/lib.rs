//! Demo plugin: always fails its run.
//!
//! Exercises the host's per-plugin failure path: the failure is logged and
//! reported, siblings keep running and the host exits cleanly.

use plugbay_sdk::prelude::*;

#[derive(Default)]
struct FlakyPlugin;

impl Plugin for FlakyPlugin {
    fn name(&self) -> &str {
        "flaky"
    }

    fn run(&mut self) -> PluginResult<()> {
        Err(PluginError::failed("flaky plugin always fails"))
    }
}

export_plugin!(FlakyPlugin);
