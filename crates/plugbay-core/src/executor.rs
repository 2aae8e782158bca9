//! Concurrent execution scheduler.
//!
//! One blocking task per plugin, a single join barrier, no cancellation and
//! no concurrency cap. A failed task is terminal and never affects siblings.

use serde::Serialize;
use tracing::{error, info, warn};

use plugbay_sdk::Plugin;

/// Terminal state of one plugin task.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunStatus {
    /// `run` returned success.
    Completed,
    /// `run` reported an error, or the task itself aborted.
    Failed { error: String },
}

impl RunStatus {
    /// Whether this outcome is a success.
    pub fn is_completed(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }
}

/// Outcome of one plugin's run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// Plugin display name.
    pub plugin: String,
    /// Terminal state the task reached.
    pub status: RunStatus,
}

/// Run every plugin concurrently and wait for all of them to finish.
///
/// Each plugin is moved into its own `spawn_blocking` task (plugin `run`
/// bodies may block or compute for arbitrary time) and invoked exactly once.
/// The returned vector has one terminal outcome per input plugin; no task is
/// dropped, and the function only returns once every task has finished. Each
/// plugin is also dropped inside its task, so teardown happens entry by
/// entry as tasks finish.
pub async fn run_all<P>(plugins: Vec<P>) -> Vec<RunOutcome>
where
    P: Plugin + 'static,
{
    let mut tasks = Vec::with_capacity(plugins.len());
    for mut plugin in plugins {
        let name = plugin.name().to_string();
        let task_name = name.clone();

        let handle = tokio::task::spawn_blocking(move || {
            info!(plugin = %task_name, "plugin started");
            let status = match plugin.run() {
                Ok(()) => {
                    info!(plugin = %task_name, "plugin completed");
                    RunStatus::Completed
                }
                Err(err) => {
                    warn!(plugin = %task_name, error = %err, "plugin failed");
                    RunStatus::Failed {
                        error: err.to_string(),
                    }
                }
            };
            RunOutcome {
                plugin: task_name,
                status,
            }
        });

        tasks.push((name, handle));
    }

    // Join barrier: every task reaches a terminal state before we return.
    let mut outcomes = Vec::with_capacity(tasks.len());
    for (name, handle) in tasks {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => {
                error!(plugin = %name, error = %err, "plugin task aborted");
                outcomes.push(RunOutcome {
                    plugin: name,
                    status: RunStatus::Failed {
                        error: err.to_string(),
                    },
                });
            }
        }
    }
    outcomes
}
